//! CompletionService and RemoteHistory implementations for GraphQlClient.

use async_trait::async_trait;
use tracing::debug;
use web3chat_common::{ChatMessage, SessionId};

use crate::{AiError, Completion, CompletionRequest, CompletionService, RemoteHistory, SessionGrant};

use super::client::GraphQlClient;
use super::queries::{CREATE_SESSION, GET_AI_RESPONSE, GET_CHAT_HISTORY, SEND_MESSAGE};
use super::wire::{ChatHistoryData, CreateSessionData, GetAiResponseData, SendMessageData};

#[async_trait]
impl CompletionService for GraphQlClient {
    async fn create_session(&self) -> Result<SessionGrant, AiError> {
        let data: CreateSessionData = self
            .execute("createSession", CREATE_SESSION, serde_json::json!({}))
            .await?;

        let payload = data
            .create_session
            .ok_or_else(|| AiError::Malformed("createSession: missing payload".into()))?;

        Ok(SessionGrant {
            session_id: payload.session_id.unwrap_or_default(),
            success: payload.success,
        })
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AiError> {
        debug!(
            model = %request.model,
            turns = request.messages.len(),
            "requesting AI response"
        );

        let data: GetAiResponseData = self
            .execute(
                "getAIResponse",
                GET_AI_RESPONSE,
                serde_json::json!({ "input": request }),
            )
            .await?;

        let payload = data
            .get_ai_response
            .ok_or_else(|| AiError::Malformed("getAIResponse: missing payload".into()))?;
        payload.ensure_success("AI response failed")?;

        Ok(payload.into_completion())
    }
}

#[async_trait]
impl RemoteHistory for GraphQlClient {
    async fn record_message(&self, session: &SessionId, content: &str) -> Result<(), AiError> {
        let data: SendMessageData = self
            .execute(
                "sendMessage",
                SEND_MESSAGE,
                serde_json::json!({
                    "input": {
                        "sessionId": session.as_str(),
                        "content": content,
                        "isUser": true,
                    }
                }),
            )
            .await?;

        data.send_message
            .ok_or_else(|| AiError::Malformed("sendMessage: missing payload".into()))?
            .ensure_success("failed to record message")
    }

    async fn fetch_history(&self, session: &SessionId) -> Result<Vec<ChatMessage>, AiError> {
        let data: ChatHistoryData = self
            .execute(
                "chatHistory",
                GET_CHAT_HISTORY,
                serde_json::json!({ "sessionId": session.as_str() }),
            )
            .await?;

        Ok(data
            .chat_history
            .unwrap_or_default()
            .into_iter()
            .map(|entry| entry.into_message())
            .collect())
    }
}
