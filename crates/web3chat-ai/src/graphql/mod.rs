//! GraphQL transport for the completion service.
//!
//! Implements both `CompletionService` (`createSession`, `getAIResponse`)
//! and `RemoteHistory` (`sendMessage`, `chatHistory`) against a single
//! GraphQL endpoint.

mod api;
mod client;
pub mod queries;
mod wire;

pub use client::GraphQlClient;
