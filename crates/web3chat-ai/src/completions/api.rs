//! CompletionService implementation for CompletionsClient.

use async_trait::async_trait;
use tracing::debug;

use crate::endpoint::check_status;
use crate::{AiError, Completion, CompletionRequest, CompletionService, SessionGrant};

use super::client::CompletionsClient;

#[async_trait]
impl CompletionService for CompletionsClient {
    async fn create_session(&self) -> Result<SessionGrant, AiError> {
        Err(AiError::Unsupported("session creation"))
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AiError> {
        let body = self.build_request_body(request);

        debug!(
            model = %request.model,
            turns = request.messages.len(),
            "chat completion request"
        );

        let response = self.config.post(&self.http).json(&body).send().await?;
        let response = check_status(response).await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::Malformed(e.to_string()))?;

        self.parse_response(json)
    }
}
