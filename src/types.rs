use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Clone)]
pub struct ListLabelsResponse {
    pub labels: Option<Vec<Label>>,
}

/// A Gmail label together with its aggregate counts.
///
/// Counts are only populated by `labels.get`, `labels.list` leaves them out.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub label_type: Option<String>,
    pub messages_total: Option<i64>,
    pub messages_unread: Option<i64>,
    pub threads_total: Option<i64>,
    pub threads_unread: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesResponse {
    pub messages: Option<Vec<MessageRef>>,
    pub next_page_token: Option<String>,
    pub result_size_estimate: Option<u32>,
}

/// Entry of a message listing. Listings carry ids only, never payloads.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: Option<String>,
    pub thread_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Option<String>,
    pub thread_id: Option<String>,
    pub label_ids: Option<Vec<String>>,
    pub snippet: Option<String>,
    pub history_id: Option<String>,
    /// Milliseconds since the epoch, encoded as a decimal string.
    pub internal_date: Option<String>,
    pub payload: Option<MessagePart>,
    pub size_estimate: Option<i64>,
    pub raw: Option<String>,
}

impl Message {
    /// When Gmail received the message, if the listing carried a usable date.
    pub fn received_time(&self) -> Option<DateTime<Utc>> {
        let millis = self.internal_date.as_deref()?.parse::<i64>().ok()?;
        crate::email_content::received_time(millis)
    }
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    pub part_id: Option<String>,
    pub mime_type: Option<String>,
    pub filename: Option<String>,
    pub headers: Option<Vec<Header>>,
    pub body: Option<MessagePartBody>,
    pub parts: Option<Vec<MessagePart>>,
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
pub struct Header {
    pub name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessagePartBody {
    pub attachment_id: Option<String>,
    pub size: Option<i64>,
    pub data: Option<String>,
}

/// Body of `messages.modify`.
#[derive(Debug, Default, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModifyMessageRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_label_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove_label_ids: Vec<String>,
}

impl ModifyMessageRequest {
    pub fn remove_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            add_label_ids: Vec::new(),
            remove_label_ids: labels.into_iter().map(Into::into).collect(),
        }
    }
}
