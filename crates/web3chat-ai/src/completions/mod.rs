//! Plain HTTP chat-completions transport.
//!
//! POSTs `{ messages, model, temperature, max_tokens, stream: false }` and
//! reads `choices[0].message.content`. There is no session endpoint, so
//! `create_session` reports `Unsupported` and the manager falls back to a
//! local session id.

mod api;
mod client;

pub use client::CompletionsClient;
