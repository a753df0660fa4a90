use crate::types::Message;

/// Email metadata pulled out of the message headers.
///
/// Some fields look redundant but come from different contexts, e.g. `sender`
/// versus `from` on mailing list traffic. Headers that may legitimately repeat
/// are collected as lists.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PartialMetadata {
    /// The entity that originally created and sent the message.
    pub sender: String,
    /// The entity that delivered the message to you (e.g. googlegroups).
    pub from: String,
    pub subject: String,
    /// Name of the mailing list the email was posted to, if any.
    pub mailing_list: String,
    pub cc: Vec<String>,
    pub to: Vec<String>,
    pub thread_topic: Vec<String>,
    /// Every address the message was delivered to, more than one when forwarded.
    pub delivered_to: Vec<String>,
}

/// Extracts [`PartialMetadata`] from the message headers.
///
/// Header names match exactly and case-sensitively. Scalar fields keep the
/// last occurrence, list fields keep every occurrence in order.
pub fn get_partial_metadata(msg: &Message) -> PartialMetadata {
    let mut info = PartialMetadata::default();
    let headers = msg
        .payload
        .as_ref()
        .and_then(|payload| payload.headers.as_deref())
        .unwrap_or_default();

    for header in headers {
        let Some(name) = header.name.as_deref() else {
            continue;
        };
        let value = header.value.clone().unwrap_or_default();
        match name {
            "Sender" => info.sender = value,
            "From" => info.from = value,
            "Subject" => info.subject = value,
            "Mailing-list" => info.mailing_list = value,
            "CC" => info.cc.push(value),
            "To" => info.to.push(value),
            "Thread-Topic" => info.thread_topic.push(value),
            "Delivered-To" => info.delivered_to.push(value),
            _ => {}
        }
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Header, MessagePart};

    fn message_with_headers(headers: &[(&str, &str)]) -> Message {
        Message {
            payload: Some(MessagePart {
                headers: Some(
                    headers
                        .iter()
                        .map(|(name, value)| Header {
                            name: Some(name.to_string()),
                            value: Some(value.to_string()),
                        })
                        .collect(),
                ),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_unknown_headers_yield_empty_metadata() {
        let msg = message_with_headers(&[("Date", "Tue, 10 Jun 2025"), ("X-Mailer", "mutt")]);
        assert_eq!(get_partial_metadata(&msg), PartialMetadata::default());
    }

    #[test]
    fn test_missing_payload_yields_empty_metadata() {
        assert_eq!(
            get_partial_metadata(&Message::default()),
            PartialMetadata::default()
        );
    }

    #[test]
    fn test_list_headers_keep_every_value_in_order() {
        let msg = message_with_headers(&[
            ("To", "a@example.com"),
            ("Delivered-To", "me@example.com"),
            ("To", "b@example.com"),
            ("CC", "c@example.com"),
            ("Delivered-To", "me@example.com"),
            ("Thread-Topic", "lunch"),
        ]);
        let info = get_partial_metadata(&msg);
        assert_eq!(info.to, vec!["a@example.com", "b@example.com"]);
        assert_eq!(info.cc, vec!["c@example.com"]);
        assert_eq!(info.delivered_to, vec!["me@example.com", "me@example.com"]);
        assert_eq!(info.thread_topic, vec!["lunch"]);
    }

    #[test]
    fn test_scalar_headers_last_occurrence_wins() {
        let msg = message_with_headers(&[
            ("Subject", "first"),
            ("From", "list@googlegroups.com"),
            ("Sender", "alice@example.com"),
            ("Mailing-list", "list rust-users"),
            ("Subject", "second"),
        ]);
        let info = get_partial_metadata(&msg);
        assert_eq!(info.subject, "second");
        assert_eq!(info.from, "list@googlegroups.com");
        assert_eq!(info.sender, "alice@example.com");
        assert_eq!(info.mailing_list, "list rust-users");
    }

    #[test]
    fn test_header_names_are_case_sensitive() {
        let msg = message_with_headers(&[("subject", "lower"), ("Cc", "x@example.com")]);
        let info = get_partial_metadata(&msg);
        assert!(info.subject.is_empty());
        assert!(info.cc.is_empty());
    }
}
