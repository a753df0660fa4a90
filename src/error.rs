use std::path::PathBuf;

use thiserror::Error;

use crate::types::Message;

/// The crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while talking to Gmail or handling tokens.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("cannot parse credentials file {}", .1.display())]
    Credentials(#[source] std::io::Error, PathBuf),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("cannot find the user's home directory")]
    HomeDirNotFound,
    #[error("no cached token at {}, run inboxer-setup first", .0.display())]
    TokenNotFound(PathBuf),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("cannot build url")]
    Url(#[from] url::ParseError),
    #[error("gmail api returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("cannot read authorization code")]
    ReadAuthorizationCode(#[source] std::io::Error),
    #[error("authorization code is empty")]
    EmptyAuthorizationCode,
    #[error("cannot exchange authorization code for a token: {0}")]
    Exchange(String),
    #[error("cannot refresh access token: {0}")]
    Refresh(String),

    #[error("cannot decode base64url body")]
    Base64(#[from] base64::DecodeError),
    #[error("message has no id")]
    MissingMessageId,
    #[error("couldn't read body")]
    BodyNotFound,

    #[error("fetch stopped after {} message(s)", .fetched.len())]
    PartialFetch {
        fetched: Vec<Message>,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Messages fetched before a per-message fetch failed.
    ///
    /// Empty for every error other than [`Error::PartialFetch`].
    pub fn partial_messages(&self) -> &[Message] {
        match self {
            Self::PartialFetch { fetched, .. } => fetched,
            _ => &[],
        }
    }
}
