//! Check, read and mark Gmail messages through the Gmail REST API.
//!
//! Run the `inboxer-setup` binary once to cache an OAuth token, then build a
//! [`Service`] from the same credentials file:
//!
//! ```no_run
//! use inboxer::{email_content, get_partial_metadata, Service, ServiceConfig};
//!
//! # async fn run() -> inboxer::Result<()> {
//! let service = Service::new(
//!     "credentials.json",
//!     &[inboxer::MAIL_GOOGLE_COM_SCOPE],
//!     ServiceConfig::new()?,
//! )
//! .await?;
//!
//! for msg in service.query("in:inbox is:unread").await? {
//!     let meta = get_partial_metadata(&msg);
//!     let body = email_content::get_body(&msg, email_content::TEXT_PLAIN)?;
//!     println!("{}: {}\n{}", meta.from, meta.subject, body);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod email_content;
pub mod error;
pub mod gmail_api;
pub mod metadata;
pub mod service;
pub mod types;

pub use config::{ServiceConfig, MAIL_GOOGLE_COM_SCOPE};
pub use error::{Error, Result};
pub use gmail_api::{setup_gmail_service, SetupOutcome, Token, TokenStore};
pub use metadata::{get_partial_metadata, PartialMetadata};
pub use service::Service;
