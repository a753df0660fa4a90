use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::{DecodePaddingMode, Engine};
use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::types::{Message, MessagePart};

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_HTML: &str = "text/html";
const MULTIPART_ALTERNATIVE: &str = "multipart/alternative";

// Gmail emits padded base64url, but hand-built payloads often drop the padding
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes a base64url payload into text. Invalid UTF-8 is replaced, not rejected.
pub fn from_base64(data: &str) -> Result<String> {
    let decoded = URL_SAFE_LENIENT.decode(data)?;
    Ok(String::from_utf8_lossy(&decoded).into_owned())
}

/// Converts Gmail's millisecond `internalDate` into a timestamp truncated to seconds.
pub fn received_time(internal_date_ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(internal_date_ms.div_euclid(1000), 0)
}

/// Gets, decodes, and returns the body of the email for `mime_type`
/// ([`TEXT_PLAIN`] or [`TEXT_HTML`]).
///
/// Only the top-level parts and the children of a top-level
/// `multipart/alternative` part are searched. Deeper nesting is not visited.
pub fn get_body(msg: &Message, mime_type: &str) -> Result<String> {
    let parts = msg
        .payload
        .as_ref()
        .and_then(|payload| payload.parts.as_deref())
        .unwrap_or_default();

    for part in parts {
        if part.mime_type.as_deref() == Some(MULTIPART_ALTERNATIVE) {
            let children = part.parts.as_deref().unwrap_or_default();
            if let Some(found) = children.iter().find(|p| is_readable(p, mime_type)) {
                return decode_part(found);
            }
        }
        if is_readable(part, mime_type) {
            return decode_part(part);
        }
    }

    Err(Error::BodyNotFound)
}

fn is_readable(part: &MessagePart, mime_type: &str) -> bool {
    part.mime_type.as_deref() == Some(mime_type)
        && part
            .body
            .as_ref()
            .and_then(|b| b.size)
            .is_some_and(|size| size >= 1)
}

fn decode_part(part: &MessagePart) -> Result<String> {
    let data = part
        .body
        .as_ref()
        .and_then(|b| b.data.as_deref())
        .unwrap_or_default();
    from_base64(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessagePartBody;
    use base64::engine::general_purpose::URL_SAFE;

    fn create_message_part(
        mime_type: &str,
        data: Option<&str>,
        parts: Option<Vec<MessagePart>>,
    ) -> MessagePart {
        MessagePart {
            mime_type: Some(mime_type.to_string()),
            body: data.map(|d| MessagePartBody {
                size: Some(d.len() as i64),
                data: Some(URL_SAFE.encode(d)),
                ..Default::default()
            }),
            parts,
            ..Default::default()
        }
    }

    fn create_message(parts: Vec<MessagePart>) -> Message {
        Message {
            id: Some("msg1".to_string()),
            payload: Some(MessagePart {
                mime_type: Some("multipart/mixed".to_string()),
                parts: Some(parts),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_get_body_top_level_plain() {
        let msg = create_message(vec![create_message_part(
            TEXT_PLAIN,
            Some("Hello, world!"),
            None,
        )]);
        assert_eq!(get_body(&msg, TEXT_PLAIN).unwrap(), "Hello, world!");
    }

    #[test]
    fn test_get_body_inside_alternative() {
        let alternative = create_message_part(
            MULTIPART_ALTERNATIVE,
            None,
            Some(vec![
                create_message_part(TEXT_PLAIN, Some("Inner plain text."), None),
                create_message_part(TEXT_HTML, Some("<b>Inner HTML</b>"), None),
            ]),
        );
        let msg = create_message(vec![alternative]);
        assert_eq!(get_body(&msg, TEXT_PLAIN).unwrap(), "Inner plain text.");
        assert_eq!(get_body(&msg, TEXT_HTML).unwrap(), "<b>Inner HTML</b>");
    }

    #[test]
    fn test_get_body_skips_empty_plain_part() {
        let alternative = create_message_part(
            MULTIPART_ALTERNATIVE,
            None,
            Some(vec![
                create_message_part(TEXT_PLAIN, Some(""), None),
                create_message_part(TEXT_HTML, Some("<p>only html</p>"), None),
            ]),
        );
        let msg = create_message(vec![alternative]);
        assert_eq!(get_body(&msg, TEXT_HTML).unwrap(), "<p>only html</p>");
        assert!(matches!(
            get_body(&msg, TEXT_PLAIN),
            Err(Error::BodyNotFound)
        ));
    }

    #[test]
    fn test_get_body_ignores_second_level_nesting() {
        let nested = create_message_part(
            "multipart/related",
            None,
            Some(vec![create_message_part(
                MULTIPART_ALTERNATIVE,
                None,
                Some(vec![create_message_part(TEXT_PLAIN, Some("deep"), None)]),
            )]),
        );
        let msg = create_message(vec![nested]);
        assert!(matches!(
            get_body(&msg, TEXT_PLAIN),
            Err(Error::BodyNotFound)
        ));
    }

    #[test]
    fn test_get_body_without_payload() {
        assert!(matches!(
            get_body(&Message::default(), TEXT_HTML),
            Err(Error::BodyNotFound)
        ));
    }

    #[test]
    fn test_get_body_first_match_wins() {
        let msg = create_message(vec![
            create_message_part(TEXT_PLAIN, Some("first"), None),
            create_message_part(TEXT_PLAIN, Some("second"), None),
        ]);
        assert_eq!(get_body(&msg, TEXT_PLAIN).unwrap(), "first");
    }

    #[test]
    fn test_from_base64_accepts_unpadded_input() {
        assert_eq!(from_base64("aGk").unwrap(), "hi");
        assert_eq!(from_base64("aGk=").unwrap(), "hi");
        assert!(from_base64("not base64!").is_err());
    }

    #[test]
    fn test_received_time_truncates_millis() {
        let time = received_time(1_500_000_000_999).unwrap();
        assert_eq!(time.timestamp(), 1_500_000_000);

        let msg = Message {
            internal_date: Some("1500000000123".to_string()),
            ..Default::default()
        };
        assert_eq!(msg.received_time(), Some(time));
    }
}
