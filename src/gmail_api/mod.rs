//! Gmail API access split into logical submodules
//!
//! - auth: credentials, the authorization code flow and token refresh
//! - token_store: the on-disk token cache
//! - labels: label listing and unread counts
//! - messages: querying and fetching messages
//! - operations: label changes (mark as read)

pub mod auth;
pub mod labels;
pub mod messages;
pub mod operations;
pub mod token_store;

pub use auth::{setup_gmail_service, CodePrompt, ConsolePrompt, OAuthConfig, SetupOutcome};
pub use labels::UNREAD_LABEL;
pub use token_store::{Token, TokenStore};
