use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{new_id, SessionId};

/// Id of the hardcoded welcome entry seeded at the top of every history.
/// Entries with this id are never sent upstream.
pub const WELCOME_MESSAGE_ID: &str = "1";

/// A single entry in the conversation history. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// A user turn stamped now with a fresh id.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            content: content.into(),
            is_user: true,
            timestamp: Utc::now(),
        }
    }

    /// An assistant turn stamped now with a fresh id.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            content: content.into(),
            is_user: false,
            timestamp: Utc::now(),
        }
    }

    pub fn welcome(content: impl Into<String>) -> Self {
        Self {
            id: WELCOME_MESSAGE_ID.to_string(),
            ..Self::assistant(content)
        }
    }

    pub fn is_welcome(&self) -> bool {
        self.id == WELCOME_MESSAGE_ID
    }
}

/// Where the held session id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOrigin {
    /// Issued by the remote service.
    Remote,
    /// Synthesized after session creation failed.
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub origin: SessionOrigin,
}

impl SessionInfo {
    pub fn is_local(&self) -> bool {
        self.origin == SessionOrigin::Local
    }
}

/// Everything the presentation layer needs to render a conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    /// `None` until the first session acquisition.
    pub session: Option<SessionInfo>,
    pub history: Vec<ChatMessage>,
    pub pending: bool,
    pub last_error: Option<String>,
    /// Content of the last failed send, offered back to the user for retry.
    pub retry_content: Option<String>,
}
