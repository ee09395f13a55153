//! Fixed generation parameters sent with every completion request.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    /// Valid range: 0.0-2.0.
    pub temperature: f64,
    /// Valid range: 1-32768.
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".into(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}
