use reqwest::Method;

use crate::error::Result;
use crate::service::Service;
use crate::types::{Label, ListLabelsResponse};

pub const UNREAD_LABEL: &str = "UNREAD";

impl Service {
    /// Lists the labels in the user's mailbox.
    pub async fn get_labels(&self) -> Result<Vec<Label>> {
        let request = self.request(Method::GET, &self.user_url("labels")).await?;
        let labels: ListLabelsResponse = self.send_json(request).await?;
        Ok(labels.labels.unwrap_or_default())
    }

    pub async fn get_label(&self, label_id: &str) -> Result<Label> {
        let url = self.user_url(&format!("labels/{label_id}"));
        let request = self.request(Method::GET, &url).await?;
        self.send_json(request).await
    }

    /// Checks for mail labeled `UNREAD`.
    ///
    /// Gmail often reports thousands of forgotten unread messages. For the
    /// count to be meaningful, mark everything read first, either in Gmail or
    /// with [`Service::mark_all_as_read`].
    pub async fn check_for_unread(&self) -> Result<i64> {
        self.check_for_unread_by_label(UNREAD_LABEL).await
    }

    /// Unread messages plus unread threads under `label_id`. Zero is a valid count.
    pub async fn check_for_unread_by_label(&self, label_id: &str) -> Result<i64> {
        let label = self.get_label(label_id).await?;
        Ok(label.messages_unread.unwrap_or(0) + label.threads_unread.unwrap_or(0))
    }
}
