use reqwest::Method;
use tracing::debug;

use crate::error::{Error, Result};
use crate::service::Service;
use crate::types::{ListMessagesResponse, Message};

impl Service {
    /// Queries the mailbox using Gmail's search syntax, e.g.
    /// `"in:sent after:2017/01/01 before:2017/01/30"`, and fetches every hit in full.
    pub async fn query(&self, query: &str) -> Result<Vec<Message>> {
        let request = self
            .request(Method::GET, &self.user_url("messages"))
            .await?
            .query(&[("q", query)]);
        let inbox: ListMessagesResponse = self.send_json(request).await?;
        self.messages_by_id(&inbox).await
    }

    /// Fetches up to `how_many` of the most recent messages.
    pub async fn get_messages(&self, how_many: u32) -> Result<Vec<Message>> {
        let request = self
            .request(Method::GET, &self.user_url("messages"))
            .await?
            .query(&[("maxResults", how_many)]);
        let inbox: ListMessagesResponse = self.send_json(request).await?;
        self.messages_by_id(&inbox).await
    }

    /// Fetches every listed message individually, since listings carry ids only.
    ///
    /// Stops at the first failed fetch with [`Error::PartialFetch`], which
    /// still carries the messages fetched before it.
    pub async fn messages_by_id(&self, list: &ListMessagesResponse) -> Result<Vec<Message>> {
        let refs = list.messages.as_deref().unwrap_or_default();
        debug!("fetching {} message(s) by id", refs.len());

        let mut fetched = Vec::with_capacity(refs.len());
        for msg_ref in refs {
            let Some(id) = msg_ref.id.as_deref() else {
                debug!("skipping listing entry without an id");
                continue;
            };
            match self.get_message(id).await {
                Ok(message) => fetched.push(message),
                Err(source) => {
                    return Err(Error::PartialFetch {
                        fetched,
                        source: Box::new(source),
                    })
                }
            }
        }
        Ok(fetched)
    }

    /// Fetches a single message with its full payload.
    pub async fn get_message(&self, id: &str) -> Result<Message> {
        let request = self
            .request(Method::GET, &self.user_url(&format!("messages/{id}")))
            .await?
            .query(&[("format", "full")]);
        self.send_json(request).await
    }
}
