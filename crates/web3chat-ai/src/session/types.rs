//! Session types and the in-flight guard.

use std::sync::atomic::{AtomicBool, Ordering};

use web3chat_common::{ChatMessage, ConversationEvent, EventBus};

use crate::{AiError, GenerationParams};

/// Behaviour knobs for a `SessionManager`.
#[derive(Debug, Clone)]
pub struct ConversationSettings {
    pub generation: GenerationParams,
    /// Seeded as the first history entry when set.
    pub welcome_message: Option<String>,
    /// Content of the synthetic assistant entry appended on failure.
    pub error_message: String,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            generation: GenerationParams::default(),
            welcome_message: Some(
                "Hello! I'm your AI assistant. Ready to explore the digital future?".to_string(),
            ),
            error_message: "Sorry, something went wrong. Please try again.".to_string(),
        }
    }
}

/// Both sides of a completed exchange.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub user_message: ChatMessage,
    pub ai_message: ChatMessage,
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("a message is already being sent")]
    Busy,
    #[error("no failed message to retry")]
    NothingToRetry,
    #[error(transparent)]
    Remote(#[from] AiError),
}

/// Guard that clears the pending flag on drop, so it is released on every
/// exit path including early returns and a dropped future.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
    events: &'a EventBus,
}

impl<'a> BusyGuard<'a> {
    /// Attempt to mark the manager pending. Returns `Busy` if already pending.
    pub(crate) fn acquire(flag: &'a AtomicBool, events: &'a EventBus) -> Result<Self, SendError> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(SendError::Busy);
        }
        events.publish(ConversationEvent::PendingChanged(true));
        Ok(Self { flag, events })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        self.events.publish(ConversationEvent::PendingChanged(false));
    }
}
