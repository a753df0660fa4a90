use std::path::PathBuf;

use crate::error::{Error, Result};

/// File name of the token cache, url-encoded when joined to the cache dir.
pub const TOKEN_FILE: &str = "gmail-token.json";
const TOKEN_DIR: &str = ".credentials";

pub const DEFAULT_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";
/// Gmail's alias for the authenticated user.
pub const DEFAULT_USER_ID: &str = "me";

pub const MAIL_GOOGLE_COM_SCOPE: &str = "https://mail.google.com/";
pub const GMAIL_MODIFY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.modify";
pub const GMAIL_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";
pub const GMAIL_LABELS_SCOPE: &str = "https://www.googleapis.com/auth/gmail.labels";

/// Where the token lives and which API endpoint to talk to.
///
/// Passed explicitly to setup and to [`crate::Service::new`], so two handles in
/// one process can use different token caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub token_path: PathBuf,
    pub api_base: String,
    pub user_id: String,
}

impl ServiceConfig {
    /// Configuration with the token cached under `~/.credentials`.
    pub fn new() -> Result<Self> {
        Ok(Self::from_token_path(default_token_path()?))
    }

    pub fn from_token_path(token_path: impl Into<PathBuf>) -> Self {
        Self {
            token_path: token_path.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }

    pub fn with_token_path(mut self, token_path: impl Into<PathBuf>) -> Self {
        self.token_path = token_path.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }
}

impl Default for ServiceConfig {
    /// Falls back to a cache dir relative to the working directory when there
    /// is no home directory.
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            Self::from_token_path(PathBuf::from(TOKEN_DIR).join(encoded_token_file()))
        })
    }
}

/// `~/.credentials/<urlencoded TOKEN_FILE>`
pub fn default_token_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(Error::HomeDirNotFound)?;
    Ok(home.join(TOKEN_DIR).join(encoded_token_file()))
}

fn encoded_token_file() -> String {
    url::form_urlencoded::byte_serialize(TOKEN_FILE.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = ServiceConfig::from_token_path("/tmp/token.json")
            .with_api_base("http://127.0.0.1:9000/gmail/v1/")
            .with_user_id("someone@example.com");
        assert_eq!(config.token_path, PathBuf::from("/tmp/token.json"));
        assert_eq!(config.api_base, "http://127.0.0.1:9000/gmail/v1");
        assert_eq!(config.user_id, "someone@example.com");
    }

    #[test]
    fn test_default_token_file_name() {
        let config = ServiceConfig::default();
        assert!(config.token_path.ends_with(".credentials/gmail-token.json"));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.user_id, DEFAULT_USER_ID);
    }
}
