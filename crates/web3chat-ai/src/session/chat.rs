//! Async conversation operations for SessionManager (send, retry, refresh).

use tracing::{debug, info, warn};
use web3chat_common::{ChatMessage, ConversationEvent, SessionId};

use crate::{AiError, Completion, CompletionRequest};

use super::manager::{build_upstream_messages, SessionManager};
use super::types::{BusyGuard, SendError, SendOutcome};

impl SessionManager {
    /// Send a user message and merge the assistant's reply into history.
    ///
    /// The user message is appended before any network call. On failure a
    /// synthetic assistant error entry is appended, `last_error` is set, and
    /// the content is kept for `retry`.
    pub async fn send(&self, content: &str) -> Result<SendOutcome, SendError> {
        if content.trim().is_empty() {
            debug!("ignoring empty message");
            return Err(SendError::EmptyMessage);
        }
        let _guard = BusyGuard::acquire(&self.pending, &self.events)?;

        let user_message = ChatMessage::user(content);
        let (messages, cleared_error) = {
            let mut state = self.lock_state();
            let cleared_error = state.last_error.take().is_some();
            state.retry_content = None;
            let messages = build_upstream_messages(&state.history, content);
            state.history.push(user_message.clone());
            (messages, cleared_error)
        };
        if cleared_error {
            self.events.publish(ConversationEvent::ErrorDismissed);
        }
        self.events
            .publish(ConversationEvent::MessageAppended(user_message.clone()));

        let session = self.ensure_session().await;
        let request = CompletionRequest::new(messages, &self.settings.generation);

        match self.dispatch(&session.id, content, &request).await {
            Ok(completion) => {
                let ai_message = completion.into_message();
                self.push_message(ai_message.clone());
                info!(session = %session.id, turns = request.messages.len(), "reply received");
                Ok(SendOutcome {
                    user_message,
                    ai_message,
                })
            }
            Err(e) => {
                warn!(session = %session.id, error = %e, "send failed");
                let reason = e.to_string();
                let error_message = ChatMessage::assistant(self.settings.error_message.clone());
                {
                    let mut state = self.lock_state();
                    state.history.push(error_message.clone());
                    state.last_error = Some(reason.clone());
                    state.retry_content = Some(content.to_string());
                }
                self.events
                    .publish(ConversationEvent::MessageAppended(error_message));
                self.events.publish(ConversationEvent::ErrorRaised(reason));
                Err(SendError::Remote(e))
            }
        }
    }

    /// Re-send the content of the last failed send.
    pub async fn retry(&self) -> Result<SendOutcome, SendError> {
        let content = self
            .lock_state()
            .retry_content
            .clone()
            .ok_or(SendError::NothingToRetry)?;
        self.send(&content).await
    }

    /// Replace local history with the server's copy (welcome entry kept).
    ///
    /// Only available with remote history; refused while a send is pending.
    pub async fn refresh_history(&self) -> Result<usize, SendError> {
        let remote = self
            .remote_history
            .clone()
            .ok_or(SendError::Remote(AiError::Unsupported("history query")))?;
        let _guard = BusyGuard::acquire(&self.pending, &self.events)?;

        let session = self.ensure_session().await;
        let fetched = remote.fetch_history(&session.id).await?;
        let count = fetched.len();

        {
            let mut state = self.lock_state();
            let welcome = state.history.iter().find(|m| m.is_welcome()).cloned();
            state.history = welcome
                .into_iter()
                .chain(fetched.into_iter().filter(|m| !m.is_welcome()))
                .collect();
        }
        self.events.publish(ConversationEvent::HistoryReplaced);
        info!(session = %session.id, count, "history refreshed");
        Ok(count)
    }

    /// One round trip, or two when history is recorded server-side first.
    /// A failed record aborts before the reply is requested.
    async fn dispatch(
        &self,
        session: &SessionId,
        content: &str,
        request: &CompletionRequest,
    ) -> Result<Completion, AiError> {
        if let Some(remote) = &self.remote_history {
            remote.record_message(session, content).await?;
            debug!(session = %session, "user message recorded");
        }
        self.service.complete(request).await
    }
}
