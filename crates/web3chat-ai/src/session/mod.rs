//! Conversation session management.
//!
//! A `SessionManager` owns the session identity, the ordered message
//! history, and the pending/error flags that a presentation layer renders.
//! All mutation goes through its own operations.

mod chat;
mod manager;
mod types;

#[cfg(test)]
mod tests;

pub use manager::{build_upstream_messages, SessionManager};
pub use types::{ConversationSettings, SendError, SendOutcome};
