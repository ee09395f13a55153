//! Conversation session texts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seeded as the first assistant entry; empty disables it.
    pub welcome_message: String,
    /// Content of the synthetic assistant entry appended when a send fails.
    pub error_message: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            welcome_message: "Hello! I'm your AI assistant. Ready to explore the digital future?"
                .into(),
            error_message: "Sorry, something went wrong. Please try again.".into(),
        }
    }
}

impl SessionConfig {
    pub fn welcome(&self) -> Option<&str> {
        let text = self.welcome_message.trim();
        (!text.is_empty()).then_some(text)
    }
}
