//! Remote completion service configuration.

use serde::{Deserialize, Serialize};

/// Default GraphQL endpoint of the hosted completion proxy.
pub const DEFAULT_ENDPOINT: &str = "https://openai-workers-proxy.leonaries9527.workers.dev/graphql";

/// Wire protocol used to reach the completion service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// GraphQL mutations (`createSession`, `getAIResponse`, ...).
    #[default]
    #[serde(rename = "graphql")]
    GraphQl,
    /// Plain chat-completions style HTTP POST.
    Http,
}

/// Where conversation history is sourced from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// Accumulated locally; one round trip per send.
    #[default]
    Local,
    /// Recorded on the server first, then answered; two round trips per send.
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub transport: Transport,
    pub endpoint: String,
    pub history: HistoryMode,
    /// Name of the environment variable holding an optional API key.
    pub api_key_env: String,
    /// Valid range: 1-120.
    pub connect_timeout_secs: u32,
    /// Valid range: 1-600.
    pub request_timeout_secs: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            transport: Transport::GraphQl,
            endpoint: DEFAULT_ENDPOINT.into(),
            history: HistoryMode::Local,
            api_key_env: "WEB3CHAT_API_KEY".into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }
}

impl ServiceConfig {
    /// Read the API key from the configured environment variable, if set.
    pub fn api_key(&self) -> Option<String> {
        if self.api_key_env.is_empty() {
            return None;
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
