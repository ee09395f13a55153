use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{ChatMessage, SessionInfo};

/// State changes published by the session manager. The presentation layer
/// re-renders from these instead of polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ConversationEvent {
    SessionStarted(SessionInfo),
    MessageAppended(ChatMessage),
    PendingChanged(bool),
    ErrorRaised(String),
    ErrorDismissed,
    HistoryReplaced,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<ConversationEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ConversationEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
