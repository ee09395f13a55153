#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use web3chat_ai::EndpointConfig;

/// Mock GraphQL endpoint. Operations are told apart by the field name in
/// the posted query document.
pub struct GraphQlMockServer {
    server: MockServer,
}

impl GraphQlMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn endpoint(&self) -> EndpointConfig {
        EndpointConfig::new(format!("{}/graphql", self.server.uri()))
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Respond to `operation` with a `{ "data": { operation: payload } }` envelope.
    pub async fn mock_data(&self, operation: &str, payload: Value) {
        self.mock_envelope(operation, json!({ "data": { operation: payload } }))
            .await;
    }

    pub async fn mock_envelope(&self, operation: &str, envelope: Value) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains(operation))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_status(&self, operation: &str, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains(operation))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_session(&self, session_id: &str) {
        self.mock_data(
            "createSession",
            json!({ "sessionId": session_id, "success": true }),
        )
        .await;
    }

    pub async fn mock_reply(&self, content: &str) {
        self.mock_data(
            "getAIResponse",
            json!({
                "id": "ai-42",
                "content": content,
                "isUser": false,
                "timestamp": "2024-05-01T12:30:00.000Z",
                "success": true,
                "error": null
            }),
        )
        .await;
    }

    /// Bodies of every request received so far, in arrival order.
    pub async fn received_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| request.body_json::<Value>().ok())
            .collect()
    }
}

/// Mock chat-completions endpoint.
pub struct CompletionsMockServer {
    server: MockServer,
}

impl CompletionsMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn endpoint(&self) -> EndpointConfig {
        EndpointConfig::new(format!("{}/v1/chat/completions", self.server.uri()))
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    pub fn completion_body(content: &str) -> Value {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1_714_566_600,
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }
}
