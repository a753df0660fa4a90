use reqwest::Method;
use tracing::debug;

use super::labels::UNREAD_LABEL;
use crate::error::{Error, Result};
use crate::service::Service;
use crate::types::{Message, ModifyMessageRequest};

impl Service {
    /// Applies a label change to a single message and returns the updated message.
    pub async fn mark_as(&self, msg: &Message, req: &ModifyMessageRequest) -> Result<Message> {
        let id = msg.id.as_deref().ok_or(Error::MissingMessageId)?;
        let url = self.user_url(&format!("messages/{id}/modify"));
        let request = self.request(Method::POST, &url).await?.json(req);
        self.send_json(request).await
    }

    /// Removes the `UNREAD` label from every unread message.
    ///
    /// Stops at the first failure. Messages already marked stay marked.
    pub async fn mark_all_as_read(&self) -> Result<()> {
        let req = ModifyMessageRequest::remove_labels([UNREAD_LABEL]);
        let msgs = self.query("label:UNREAD").await?;
        debug!("marking {} message(s) as read", msgs.len());

        for msg in &msgs {
            self.mark_as(msg, &req).await?;
        }
        Ok(())
    }
}
