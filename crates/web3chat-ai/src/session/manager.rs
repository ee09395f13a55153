//! SessionManager struct, state access, and session acquisition.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::{info, warn};
use web3chat_common::{
    ChatMessage, ConversationEvent, ConversationState, EventBus, SessionId, SessionInfo,
    SessionOrigin,
};

use crate::{CompletionService, Message, RemoteHistory};

use super::types::ConversationSettings;

/// Owns one conversation: session identity, history, pending and error state.
///
/// Shared as `Arc<SessionManager>`; every operation takes `&self`.
pub struct SessionManager {
    pub(super) service: Arc<dyn CompletionService>,
    /// Set when history is recorded server-side before each reply.
    pub(super) remote_history: Option<Arc<dyn RemoteHistory>>,
    pub(super) settings: ConversationSettings,
    /// Never held across an `.await`.
    pub(super) state: Mutex<ConversationState>,
    pub(super) pending: AtomicBool,
    /// Serializes session acquisition so concurrent callers share one request.
    pub(super) session_lock: tokio::sync::Mutex<()>,
    pub(super) events: EventBus,
}

impl SessionManager {
    pub fn new(service: Arc<dyn CompletionService>, settings: ConversationSettings) -> Self {
        let history = settings
            .welcome_message
            .as_deref()
            .map(ChatMessage::welcome)
            .into_iter()
            .collect();

        Self {
            service,
            remote_history: None,
            settings,
            state: Mutex::new(ConversationState {
                history,
                ..ConversationState::default()
            }),
            pending: AtomicBool::new(false),
            session_lock: tokio::sync::Mutex::new(()),
            events: EventBus::default(),
        }
    }

    /// Record each user message on the server before asking for a reply.
    pub fn with_remote_history(mut self, history: Arc<dyn RemoteHistory>) -> Self {
        self.remote_history = Some(history);
        self
    }

    /// Copy of the full state for rendering.
    pub fn snapshot(&self) -> ConversationState {
        let mut snapshot = self.lock_state().clone();
        snapshot.pending = self.is_pending();
        snapshot
    }

    pub fn history(&self) -> Vec<ChatMessage> {
        self.lock_state().history.clone()
    }

    pub fn session(&self) -> Option<SessionInfo> {
        self.lock_state().session.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock_state().last_error.clone()
    }

    pub fn uses_remote_history(&self) -> bool {
        self.remote_history.is_some()
    }

    /// Receive a `ConversationEvent` for every state change.
    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.events.subscribe()
    }

    /// Clear the error notice. The failed content stays available to `retry`.
    pub fn dismiss_error(&self) {
        let had_error = self.lock_state().last_error.take().is_some();
        if had_error {
            self.events.publish(ConversationEvent::ErrorDismissed);
        }
    }

    /// Return the held session, creating one on first use.
    ///
    /// If the service cannot issue a session, a local id is synthesized and
    /// the session is marked `Local`; no error is raised.
    pub async fn ensure_session(&self) -> SessionInfo {
        let _acquiring = self.session_lock.lock().await;

        let existing = self.lock_state().session.clone();
        if let Some(session) = existing {
            return session;
        }

        let session = match self.service.create_session().await {
            Ok(grant) if grant.success && !grant.session_id.trim().is_empty() => {
                info!(session = %grant.session_id, "session created");
                SessionInfo {
                    id: SessionId::from(grant.session_id),
                    origin: SessionOrigin::Remote,
                }
            }
            Ok(_) => {
                warn!("session creation unsuccessful, using a local session id");
                local_session()
            }
            Err(e) => {
                warn!(error = %e, "session creation failed, using a local session id");
                local_session()
            }
        };

        self.lock_state().session = Some(session.clone());
        self.events
            .publish(ConversationEvent::SessionStarted(session.clone()));
        session
    }

    pub(super) fn push_message(&self, message: ChatMessage) {
        self.lock_state().history.push(message.clone());
        self.events
            .publish(ConversationEvent::MessageAppended(message));
    }

    pub(super) fn lock_state(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn local_session() -> SessionInfo {
    SessionInfo {
        id: SessionId::local(),
        origin: SessionOrigin::Local,
    }
}

/// Map prior history plus the new user content into upstream turns.
///
/// User entries become `user`, everything else `assistant`; the welcome
/// sentinel is dropped.
pub fn build_upstream_messages(history: &[ChatMessage], content: &str) -> Vec<Message> {
    history
        .iter()
        .filter(|m| !m.is_welcome())
        .map(|m| {
            if m.is_user {
                Message::user(m.content.clone())
            } else {
                Message::assistant(m.content.clone())
            }
        })
        .chain(std::iter::once(Message::user(content)))
        .collect()
}
