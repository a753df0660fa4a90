use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use url::Url;
use yup_oauth2::ApplicationSecret;

use super::token_store::{Token, TokenStore};
use crate::config::ServiceConfig;
use crate::error::{Error, Result};

/// Opaque `state` value sent with the authorization request.
const AUTH_STATE: &str = "state-token";
const DEFAULT_REDIRECT_URI: &str = "http://localhost";

/// Client credentials plus the scopes to request.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub secret: ApplicationSecret,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    pub fn new(secret: ApplicationSecret, scopes: Vec<String>) -> Self {
        Self { secret, scopes }
    }

    /// Reads a Google client credentials file (`installed` or `web` flavour).
    pub async fn from_file<S: AsRef<str>>(path: impl AsRef<Path>, scopes: &[S]) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let secret = yup_oauth2::parse_application_secret(content)
            .map_err(|e| Error::Credentials(e, path.to_path_buf()))?;
        debug!("loaded client credentials from {}", path.display());
        Ok(Self::new(
            secret,
            scopes.iter().map(|s| s.as_ref().to_string()).collect(),
        ))
    }

    pub fn redirect_uri(&self) -> &str {
        self.secret
            .redirect_uris
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_REDIRECT_URI)
    }

    /// URL the user opens to grant offline access and obtain a code.
    pub fn auth_code_url(&self, state: &str) -> Result<Url> {
        let mut url = Url::parse(&self.secret.auth_uri)?;
        url.query_pairs_mut()
            .append_pair("access_type", "offline")
            .append_pair("client_id", &self.secret.client_id)
            .append_pair("redirect_uri", self.redirect_uri())
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scopes.join(" "))
            .append_pair("state", state);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_token(self, previous_refresh: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string)),
            expiry: self
                .expires_in
                .filter(|secs| *secs > 0)
                .map(|secs| Utc::now() + Duration::seconds(secs)),
        }
    }
}

// Posts a grant to the token endpoint. Failures are reported as the
// endpoint's error_description when it sends one.
async fn request_token(
    client: &reqwest::Client,
    oauth: &OAuthConfig,
    form: &[(&str, &str)],
) -> std::result::Result<TokenResponse, String> {
    let response = client
        .post(&oauth.secret.token_uri)
        .form(form)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    let body = response.text().await.map_err(|e| e.to_string())?;
    if !status.is_success() {
        let value: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
        let reason = value
            .get("error_description")
            .and_then(|v| v.as_str())
            .or_else(|| value.get("error").and_then(|v| v.as_str()))
            .unwrap_or("unknown error");
        return Err(format!("{status}: {reason}"));
    }

    serde_json::from_str(&body).map_err(|e| e.to_string())
}

/// Exchanges an authorization code for a token.
pub async fn exchange_code(
    client: &reqwest::Client,
    oauth: &OAuthConfig,
    code: &str,
) -> Result<Token> {
    let form = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", oauth.redirect_uri()),
        ("client_id", oauth.secret.client_id.as_str()),
        ("client_secret", oauth.secret.client_secret.as_str()),
    ];
    let response = request_token(client, oauth, &form)
        .await
        .map_err(Error::Exchange)?;
    Ok(response.into_token(None))
}

/// Trades the refresh token for a new access token. The old refresh token is
/// kept when the endpoint does not rotate it.
pub async fn refresh_token(
    client: &reqwest::Client,
    oauth: &OAuthConfig,
    token: &Token,
) -> Result<Token> {
    let refresh = token
        .refresh_token
        .as_deref()
        .ok_or_else(|| Error::Refresh("token has no refresh token".to_string()))?;
    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh),
        ("client_id", oauth.secret.client_id.as_str()),
        ("client_secret", oauth.secret.client_secret.as_str()),
    ];
    match request_token(client, oauth, &form).await {
        Ok(response) => Ok(response.into_token(Some(refresh))),
        Err(e) => {
            warn!("token refresh failed: {e}");
            Err(Error::Refresh(e))
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodePrompt: Send + Sync {
    /// Shows `auth_url` to the user and returns the code they paste back.
    async fn authorization_code(&self, auth_url: &Url) -> Result<String>;
}

/// Prints the URL to stdout and reads the code from one line of stdin.
pub struct ConsolePrompt;

#[async_trait]
impl CodePrompt for ConsolePrompt {
    async fn authorization_code(&self, auth_url: &Url) -> Result<String> {
        println!(
            "Go to the following link in your browser then type the authorization code:\n{auth_url}"
        );
        print!("Type the code you got on the URL: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(Error::ReadAuthorizationCode)?;
        Ok(line.trim().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    /// A token was already cached, nothing was done.
    AlreadyConfigured,
    /// A new token was obtained and cached.
    Authorized,
}

/// Caches a token for later [`crate::Service::new`] calls.
///
/// Needs a human in the loop (through `prompt`) unless a token is already
/// cached at `config.token_path`, in which case it returns immediately.
pub async fn setup_gmail_service<S, P>(
    credentials_path: impl AsRef<Path>,
    scopes: &[S],
    config: &ServiceConfig,
    prompt: &P,
) -> Result<SetupOutcome>
where
    S: AsRef<str>,
    P: CodePrompt + ?Sized,
{
    let store = TokenStore::new(&config.token_path);
    match store.load().await {
        Ok(Some(_)) => {
            info!("gmail service credentials already set");
            return Ok(SetupOutcome::AlreadyConfigured);
        }
        Ok(None) => {}
        Err(e) => warn!(
            "ignoring unreadable token cache {}: {e}",
            store.path().display()
        ),
    }

    let oauth = OAuthConfig::from_file(credentials_path, scopes).await?;
    let auth_url = oauth.auth_code_url(AUTH_STATE)?;

    let code = prompt.authorization_code(&auth_url).await?;
    if code.is_empty() {
        return Err(Error::EmptyAuthorizationCode);
    }

    let token = exchange_code(&reqwest::Client::new(), &oauth, &code).await?;
    info!("saving credential file to: {}", store.path().display());
    store.save(&token).await?;
    info!("gmail service credentials set");
    Ok(SetupOutcome::Authorized)
}
