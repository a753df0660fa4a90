use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::Result;

/// Tokens are treated as expired this long before their real expiry.
const EXPIRY_DELTA_SECS: i64 = 10;

/// A cached OAuth2 token.
///
/// The field names match the JSON token files written by Google's own
/// client libraries, so an existing cache can be reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Token {
    /// A token without an expiry (or with the zero time some writers emit) never expires.
    pub fn is_expired(&self) -> bool {
        match self.expiry.filter(|exp| exp.timestamp() > 0) {
            Some(exp) => Utc::now() >= exp - Duration::seconds(EXPIRY_DELTA_SECS),
            None => false,
        }
    }
}

/// JSON file holding the single cached [`Token`].
///
/// There is no locking. Two processes saving at once race and the last write wins.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `Ok(None)` when no token has been cached yet.
    pub async fn load(&self) -> Result<Option<Token>> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let token: Token = serde_json::from_slice(&content)?;
        debug!(
            "loaded token from {} (expiry={:?})",
            self.path.display(),
            token.expiry
        );
        Ok(Some(token))
    }

    /// Writes the token with owner-only permissions, creating the cache dir as needed.
    pub async fn save(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            let mut builder = tokio::fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            builder.mode(0o700);
            builder.create(parent).await?;
        }

        let content = serde_json::to_vec(token)?;
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&self.path).await?;
        file.write_all(&content).await?;
        file.flush().await?;
        // mode only applies on creation, an existing file keeps its old bits
        set_owner_only(&self.path).await?;

        debug!("saved token to {}", self.path.display());
        Ok(())
    }
}

#[cfg(unix)]
async fn set_owner_only(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn set_owner_only(_path: &Path) -> Result<()> {
    Ok(())
}
