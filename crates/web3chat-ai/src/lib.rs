//! Remote completion service adapters and the conversation session manager.
//!
//! Provides:
//! - `GraphQlClient`: session creation, AI responses, and the remote
//!   history operations over a GraphQL endpoint
//! - `CompletionsClient`: the plain chat-completions HTTP variant
//! - `SessionManager`: session identity, optimistic history, and
//!   pending/error state for a presentation layer

pub mod completions;
pub mod endpoint;
pub mod graphql;
pub mod session;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use web3chat_common::{ChatMessage, SessionId};

pub use completions::CompletionsClient;
pub use endpoint::EndpointConfig;
pub use graphql::GraphQlClient;
pub use session::{ConversationSettings, SendError, SendOutcome, SessionManager};

/// The remote service that answers conversations.
///
/// Injected into `SessionManager` as `Arc<dyn CompletionService>` so tests
/// and alternate transports can stand in for the real endpoint.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Ask the service for a new session identifier.
    async fn create_session(&self) -> Result<SessionGrant, AiError>;

    /// Produce the assistant reply for a full conversation.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AiError>;
}

/// Server-side message store used by the two-round-trip send variant.
#[async_trait]
pub trait RemoteHistory: Send + Sync {
    /// Record a user message under `session` before asking for a reply.
    async fn record_message(&self, session: &SessionId, content: &str) -> Result<(), AiError>;

    /// Fetch the stored conversation for `session`, oldest first.
    async fn fetch_history(&self, session: &SessionId) -> Result<Vec<ChatMessage>, AiError>;
}

/// One upstream conversation turn.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Fixed generation parameters attached to every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

/// Body of the "get AI response" call (`ChatInput` on the GraphQL side).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>, params: &GenerationParams) -> Self {
        Self {
            messages,
            model: params.model.clone(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        }
    }
}

/// A successful assistant reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Server-assigned message id, if the service returns one.
    pub id: Option<String>,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Completion {
    /// Turn the reply into a history entry, filling a missing id or
    /// timestamp locally.
    pub fn into_message(self) -> ChatMessage {
        let mut message = ChatMessage::assistant(self.content);
        if let Some(id) = self.id.filter(|id| !id.is_empty()) {
            message.id = id;
        }
        if let Some(timestamp) = self.timestamp {
            message.timestamp = timestamp;
        }
        message
    }
}

/// Result of a "create session" call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub session_id: String,
    pub success: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("rate limited")]
    RateLimited,
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("GraphQL error: {0}")]
    GraphQl(String),
    #[error("request unsuccessful: {0}")]
    Unsuccessful(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("not supported by this transport: {0}")]
    Unsupported(&'static str),
}

impl AiError {
    /// Whether the failure happened below the protocol (network, status, timeout).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout | Self::RateLimited | Self::Status { .. }
        )
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}
