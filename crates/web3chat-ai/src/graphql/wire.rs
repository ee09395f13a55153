//! Response payload shapes for the GraphQL operations.
//!
//! Every field is optional on the way in; missing pieces are handled by the
//! callers rather than failing deserialization outright.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use web3chat_common::ChatMessage;

use crate::{AiError, Completion};

/// Shown when a successful reply carries no content.
pub(crate) const EMPTY_REPLY_TEXT: &str = "(the assistant returned an empty reply)";

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlErrorEntry {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSessionData {
    pub create_session: Option<CreateSessionPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSessionPayload {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetAiResponseData {
    #[serde(rename = "getAIResponse")]
    pub get_ai_response: Option<MessagePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendMessageData {
    pub send_message: Option<MessagePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatHistoryData {
    #[serde(default)]
    pub chat_history: Option<Vec<HistoryEntry>>,
}

/// Shape shared by `getAIResponse` and `sendMessage`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MessagePayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl MessagePayload {
    /// Fail with the server's reason (or `fallback`) unless `success` is set.
    pub fn ensure_success(&self, fallback: &str) -> Result<(), AiError> {
        if self.success {
            return Ok(());
        }
        let reason = self
            .error
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(fallback);
        Err(AiError::Unsuccessful(reason.to_string()))
    }

    pub fn into_completion(self) -> Completion {
        Completion {
            id: self.id,
            content: self
                .content
                .unwrap_or_else(|| EMPTY_REPLY_TEXT.to_string()),
            timestamp: self.timestamp.as_ref().and_then(parse_timestamp),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub is_user: bool,
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
}

impl HistoryEntry {
    pub fn into_message(self) -> ChatMessage {
        let mut message = if self.is_user {
            ChatMessage::user(self.content.unwrap_or_default())
        } else {
            ChatMessage::assistant(self.content.unwrap_or_default())
        };
        if let Some(id) = self.id.filter(|id| !id.is_empty()) {
            message.id = id;
        }
        if let Some(ts) = self.timestamp.as_ref().and_then(parse_timestamp) {
            message.timestamp = ts;
        }
        message
    }
}

/// Accept RFC 3339 strings, epoch-millisecond numbers, or numeric strings.
pub(crate) fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<i64>().ok().and_then(from_millis)),
        serde_json::Value::Number(n) => n.as_i64().and_then(from_millis),
        _ => None,
    }
}

fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_rfc3339_timestamp() {
        let ts = parse_timestamp(&json!("2024-05-01T12:30:00.000Z")).unwrap();
        assert_eq!(ts.timestamp(), 1_714_566_600);
    }

    #[test]
    fn parses_epoch_millis() {
        let ts = parse_timestamp(&json!(1_714_566_600_000_i64)).unwrap();
        assert_eq!(ts.timestamp(), 1_714_566_600);
        let ts = parse_timestamp(&json!("1714566600000")).unwrap();
        assert_eq!(ts.timestamp(), 1_714_566_600);
    }

    #[test]
    fn rejects_garbage_timestamp() {
        assert!(parse_timestamp(&json!("yesterday")).is_none());
        assert!(parse_timestamp(&json!(null)).is_none());
        assert!(parse_timestamp(&json!({"t": 1})).is_none());
    }

    #[test]
    fn unsuccessful_payload_uses_server_reason() {
        let payload: MessagePayload =
            serde_json::from_value(json!({"success": false, "error": "quota exceeded"})).unwrap();
        let err = payload.ensure_success("AI response failed").unwrap_err();
        assert_eq!(err.to_string(), "request unsuccessful: quota exceeded");
    }

    #[test]
    fn unsuccessful_payload_without_reason_uses_fallback() {
        let payload: MessagePayload =
            serde_json::from_value(json!({"success": false, "error": null})).unwrap();
        let err = payload.ensure_success("AI response failed").unwrap_err();
        assert!(err.to_string().contains("AI response failed"));
    }

    #[test]
    fn missing_content_gets_placeholder() {
        let payload: MessagePayload =
            serde_json::from_value(json!({"success": true, "id": "a1"})).unwrap();
        let completion = payload.into_completion();
        assert_eq!(completion.content, EMPTY_REPLY_TEXT);
        assert_eq!(completion.id.as_deref(), Some("a1"));
        assert!(completion.timestamp.is_none());
    }

    #[test]
    fn history_entry_maps_fields() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "id": "m-3",
            "content": "hello",
            "isUser": true,
            "timestamp": "2024-05-01T12:30:00Z"
        }))
        .unwrap();
        let message = entry.into_message();
        assert_eq!(message.id, "m-3");
        assert!(message.is_user);
        assert_eq!(message.content, "hello");
        assert_eq!(message.timestamp.timestamp(), 1_714_566_600);
    }
}
