use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::config::{ServiceConfig, MAIL_GOOGLE_COM_SCOPE};
use crate::error::Result;
use crate::gmail_api::{setup_gmail_service, ConsolePrompt, SetupOutcome};

/// Authorize inboxer against a Gmail account and cache the token.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the OAuth client credentials JSON downloaded from Google Cloud.
    pub credentials: PathBuf,

    /// Where to cache the token. Defaults to ~/.credentials/gmail-token.json.
    #[clap(long)]
    pub token_path: Option<PathBuf>,
}

impl Cli {
    pub fn service_config(&self) -> Result<ServiceConfig> {
        match &self.token_path {
            Some(path) => Ok(ServiceConfig::from_token_path(path)),
            None => ServiceConfig::new(),
        }
    }
}

pub async fn handle_setup(cli: &Cli) -> Result<SetupOutcome> {
    let config = cli.service_config()?;
    let outcome = setup_gmail_service(
        &cli.credentials,
        &[MAIL_GOOGLE_COM_SCOPE],
        &config,
        &ConsolePrompt,
    )
    .await?;
    info!("token cache: {}", config.token_path.display());
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_argument_is_required() {
        let err = Cli::try_parse_from(["inboxer-setup"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_token_path_override() {
        let cli =
            Cli::try_parse_from(["inboxer-setup", "creds.json", "--token-path", "/tmp/t.json"])
                .unwrap();
        assert_eq!(cli.credentials, PathBuf::from("creds.json"));
        assert_eq!(
            cli.service_config().unwrap().token_path,
            PathBuf::from("/tmp/t.json")
        );
    }
}
