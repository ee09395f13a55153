//! Operation documents sent to the GraphQL endpoint.

pub const CREATE_SESSION: &str = r#"
mutation CreateSession {
  createSession {
    sessionId
    success
  }
}
"#;

pub const GET_AI_RESPONSE: &str = r#"
mutation GetAIResponse($input: ChatInput!) {
  getAIResponse(input: $input) {
    id
    content
    isUser
    timestamp
    success
    error
  }
}
"#;

pub const SEND_MESSAGE: &str = r#"
mutation SendMessage($input: MessageInput!) {
  sendMessage(input: $input) {
    id
    content
    isUser
    timestamp
    success
    error
  }
}
"#;

pub const GET_CHAT_HISTORY: &str = r#"
query GetChatHistory($sessionId: String) {
  chatHistory(sessionId: $sessionId) {
    id
    content
    isUser
    timestamp
  }
}
"#;
