//! Chat-completions client struct, request building, and response parsing.

use chrono::{TimeZone, Utc};

use crate::endpoint::EndpointConfig;
use crate::{AiError, Completion, CompletionRequest};

/// Chat-completions HTTP client.
pub struct CompletionsClient {
    pub(crate) config: EndpointConfig,
    pub(crate) http: reqwest::Client,
}

impl CompletionsClient {
    pub fn new(config: EndpointConfig) -> Result<Self, AiError> {
        let http = config.build_http()?;
        Ok(Self { config, http })
    }

    /// Build the JSON request body. Streaming is always off.
    pub(crate) fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "messages": request.messages,
            "model": request.model,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": false,
        })
    }

    /// Parse a chat-completion envelope.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<Completion, AiError> {
        if let Some(error) = json.get("error").filter(|e| !e.is_null()) {
            let reason = error["message"]
                .as_str()
                .or_else(|| error.as_str())
                .unwrap_or("completion failed");
            return Err(AiError::Unsuccessful(reason.to_string()));
        }

        let choices = json["choices"]
            .as_array()
            .ok_or_else(|| AiError::Malformed("no choices in response".to_string()))?;

        let first = choices
            .first()
            .ok_or_else(|| AiError::Malformed("empty choices".to_string()))?;

        let content = first["message"]["content"]
            .as_str()
            .ok_or_else(|| AiError::Malformed("choice has no message content".to_string()))?
            .to_string();

        let timestamp = json["created"]
            .as_i64()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

        Ok(Completion {
            id: json["id"].as_str().map(String::from),
            content,
            timestamp,
        })
    }
}
