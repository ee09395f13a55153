//! Terminal rendering options.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub title: String,
    pub subtitle: String,
    pub show_timestamps: bool,
    /// Disable to print plain text (also honoured via `NO_COLOR`).
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Web3 AI Assistant".into(),
            subtitle: "Next-generation conversation".into(),
            show_timestamps: true,
            color: true,
        }
    }
}
