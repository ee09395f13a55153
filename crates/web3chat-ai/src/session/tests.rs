//! Tests for SessionManager against in-memory service doubles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Notify;
use web3chat_common::{ChatMessage, ConversationEvent, SessionId, SessionOrigin, WELCOME_MESSAGE_ID};

use super::*;
use crate::{
    AiError, Completion, CompletionRequest, CompletionService, Message, RemoteHistory, Role,
    SessionGrant,
};

#[derive(Clone, Copy)]
enum SessionReply {
    Grant(&'static str),
    Unsuccessful,
    Fail,
}

#[derive(Clone, Copy)]
enum Reply {
    Content(&'static str),
    Unsuccessful,
    Network,
}

struct MockService {
    session_reply: SessionReply,
    reply: Reply,
    session_calls: AtomicUsize,
    complete_calls: AtomicUsize,
    last_request: Mutex<Option<CompletionRequest>>,
    /// Notified when `complete` is entered.
    entered: Notify,
    /// When set, `complete` waits for a permit before answering.
    gate: Option<Notify>,
}

impl MockService {
    fn new(reply: Reply) -> Self {
        Self {
            session_reply: SessionReply::Grant("srv-session"),
            reply,
            session_calls: AtomicUsize::new(0),
            complete_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            entered: Notify::new(),
            gate: None,
        }
    }

    fn with_session_reply(mut self, session_reply: SessionReply) -> Self {
        self.session_reply = session_reply;
        self
    }

    fn gated(mut self) -> Self {
        self.gate = Some(Notify::new());
        self
    }

    fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    fn last_request(&self) -> CompletionRequest {
        self.last_request.lock().unwrap().clone().unwrap()
    }
}

#[async_trait]
impl CompletionService for MockService {
    async fn create_session(&self) -> Result<SessionGrant, AiError> {
        self.session_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        match self.session_reply {
            SessionReply::Grant(id) => Ok(SessionGrant {
                session_id: id.to_string(),
                success: true,
            }),
            SessionReply::Unsuccessful => Ok(SessionGrant {
                session_id: String::new(),
                success: false,
            }),
            SessionReply::Fail => Err(AiError::Network("connection refused".into())),
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AiError> {
        self.complete_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.entered.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match self.reply {
            Reply::Content(text) => Ok(Completion {
                id: Some("ai-1".into()),
                content: text.to_string(),
                timestamp: Some(fixed_time()),
            }),
            Reply::Unsuccessful => Err(AiError::Unsuccessful("AI response failed".into())),
            Reply::Network => Err(AiError::Network("connection reset".into())),
        }
    }
}

struct MockHistory {
    fail_record: bool,
    record_calls: AtomicUsize,
    recorded: Mutex<Vec<(String, String)>>,
    stored: Vec<ChatMessage>,
}

impl MockHistory {
    fn new(fail_record: bool) -> Self {
        Self {
            fail_record,
            record_calls: AtomicUsize::new(0),
            recorded: Mutex::new(Vec::new()),
            stored: Vec::new(),
        }
    }
}

#[async_trait]
impl RemoteHistory for MockHistory {
    async fn record_message(&self, session: &SessionId, content: &str) -> Result<(), AiError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_record {
            return Err(AiError::GraphQl("session not found".into()));
        }
        self.recorded
            .lock()
            .unwrap()
            .push((session.to_string(), content.to_string()));
        Ok(())
    }

    async fn fetch_history(&self, _session: &SessionId) -> Result<Vec<ChatMessage>, AiError> {
        Ok(self.stored.clone())
    }
}

fn fixed_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T12:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn manager(service: &Arc<MockService>) -> SessionManager {
    SessionManager::new(service.clone(), ConversationSettings::default())
}

// -- session acquisition --

#[tokio::test]
async fn ensure_session_adopts_remote_id() {
    let service = Arc::new(MockService::new(Reply::Content("hi")));
    let mgr = manager(&service);

    let session = mgr.ensure_session().await;
    assert_eq!(session.id.as_str(), "srv-session");
    assert_eq!(session.origin, SessionOrigin::Remote);
    assert_eq!(mgr.session(), Some(session));
}

#[tokio::test]
async fn ensure_session_is_idempotent() {
    let service = Arc::new(MockService::new(Reply::Content("hi")));
    let mgr = manager(&service);

    let first = mgr.ensure_session().await;
    let second = mgr.ensure_session().await;
    assert_eq!(first, second);
    assert_eq!(service.session_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_ensure_session_makes_one_call() {
    let service = Arc::new(MockService::new(Reply::Content("hi")));
    let mgr = Arc::new(manager(&service));

    let (a, b) = tokio::join!(mgr.ensure_session(), mgr.ensure_session());
    assert_eq!(a, b);
    assert_eq!(service.session_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn session_failure_falls_back_to_local_id() {
    let service =
        Arc::new(MockService::new(Reply::Content("hi")).with_session_reply(SessionReply::Fail));
    let mgr = manager(&service);

    let session = mgr.ensure_session().await;
    assert!(session.is_local());
    assert!(session.id.as_str().starts_with("session_"));
    // Silent: no error notice for the fallback
    assert!(mgr.last_error().is_none());
}

#[tokio::test]
async fn unsuccessful_session_grant_falls_back_to_local_id() {
    let service = Arc::new(
        MockService::new(Reply::Content("hi")).with_session_reply(SessionReply::Unsuccessful),
    );
    let mgr = manager(&service);

    let session = mgr.ensure_session().await;
    assert_eq!(session.origin, SessionOrigin::Local);

    // The local id sticks; no second attempt.
    let again = mgr.ensure_session().await;
    assert_eq!(session, again);
    assert_eq!(service.session_calls.load(Ordering::SeqCst), 1);
}

// -- send --

#[tokio::test]
async fn new_manager_seeds_welcome_entry() {
    let service = Arc::new(MockService::new(Reply::Content("hi")));
    let mgr = manager(&service);

    let history = mgr.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, WELCOME_MESSAGE_ID);
    assert!(!history[0].is_user);
}

#[tokio::test]
async fn welcome_entry_can_be_disabled() {
    let service = Arc::new(MockService::new(Reply::Content("hi")));
    let settings = ConversationSettings {
        welcome_message: None,
        ..ConversationSettings::default()
    };
    let mgr = SessionManager::new(service, settings);
    assert!(mgr.history().is_empty());
}

#[tokio::test]
async fn successful_send_appends_user_and_assistant() {
    let service = Arc::new(MockService::new(Reply::Content("hi")));
    let mgr = manager(&service);

    let outcome = mgr.send("hello").await.unwrap();
    assert_eq!(outcome.user_message.content, "hello");
    assert!(outcome.user_message.is_user);
    assert_eq!(outcome.ai_message.content, "hi");
    assert_eq!(outcome.ai_message.id, "ai-1");
    assert_eq!(outcome.ai_message.timestamp, fixed_time());

    let history = mgr.history();
    assert_eq!(history.len(), 3);
    let assistant: Vec<_> = history
        .iter()
        .filter(|m| !m.is_user && !m.is_welcome())
        .collect();
    assert_eq!(assistant.len(), 1);
    assert_eq!(assistant[0].content, "hi");
    assert!(mgr.last_error().is_none());
}

#[tokio::test]
async fn send_creates_session_lazily() {
    let service = Arc::new(MockService::new(Reply::Content("hi")));
    let mgr = manager(&service);
    assert!(mgr.session().is_none());

    mgr.send("hello").await.unwrap();
    mgr.send("again").await.unwrap();
    assert!(mgr.session().is_some());
    assert_eq!(service.session_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn request_carries_generation_params_and_excludes_welcome() {
    let service = Arc::new(MockService::new(Reply::Content("hi")));
    let mgr = manager(&service);

    mgr.send("first").await.unwrap();
    mgr.send("second").await.unwrap();

    let request = service.last_request();
    assert_eq!(request.model, "gpt-3.5-turbo");
    assert!((request.temperature - 0.7).abs() < f64::EPSILON);
    assert_eq!(request.max_tokens, 1000);
    assert_eq!(
        request.messages,
        vec![
            Message::user("first"),
            Message::assistant("hi"),
            Message::user("second"),
        ]
    );
}

#[tokio::test]
async fn empty_or_whitespace_send_is_a_no_op() {
    let service = Arc::new(MockService::new(Reply::Content("hi")));
    let mgr = manager(&service);
    let before = mgr.history();

    for input in ["", "   ", "\n\t "] {
        let err = mgr.send(input).await.unwrap_err();
        assert!(matches!(err, SendError::EmptyMessage));
    }

    assert_eq!(mgr.history(), before);
    assert_eq!(service.session_calls.load(Ordering::SeqCst), 0);
    assert_eq!(service.complete_calls.load(Ordering::SeqCst), 0);
    assert!(!mgr.is_pending());
}

#[tokio::test]
async fn failed_send_appends_one_error_entry() {
    let service = Arc::new(MockService::new(Reply::Unsuccessful));
    let mgr = manager(&service);

    let err = mgr.send("hello").await.unwrap_err();
    assert!(matches!(err, SendError::Remote(AiError::Unsuccessful(_))));

    let history = mgr.history();
    // welcome + user + synthetic error
    assert_eq!(history.len(), 3);
    assert!(history[1].is_user);
    assert!(!history[2].is_user);
    assert_eq!(
        history[2].content,
        ConversationSettings::default().error_message
    );

    let state = mgr.snapshot();
    assert_eq!(
        state.last_error.as_deref(),
        Some("request unsuccessful: AI response failed")
    );
    assert_eq!(state.retry_content.as_deref(), Some("hello"));
    assert!(!state.pending);
}

#[tokio::test]
async fn transport_error_is_surfaced() {
    let service = Arc::new(MockService::new(Reply::Network));
    let mgr = manager(&service);

    let err = mgr.send("hello").await.unwrap_err();
    assert!(matches!(err, SendError::Remote(ref e) if e.is_transport()));
    assert!(err.to_string().contains("connection reset"));
    assert!(!mgr.is_pending());
}

#[tokio::test]
async fn user_message_is_visible_before_reply_arrives() {
    let service = Arc::new(MockService::new(Reply::Content("hi")).gated());
    let mgr = Arc::new(manager(&service));

    let task = {
        let mgr = mgr.clone();
        tokio::spawn(async move { mgr.send("hello").await })
    };

    service.entered.notified().await;
    let mid_flight = mgr.snapshot();
    assert!(mid_flight.pending);
    assert_eq!(mid_flight.history.len(), 2);
    assert!(mid_flight.history[1].is_user);
    assert_eq!(mid_flight.history[1].content, "hello");

    service.release();
    task.await.unwrap().unwrap();

    let settled = mgr.snapshot();
    assert!(!settled.pending);
    assert_eq!(settled.history.len(), 3);
}

#[tokio::test]
async fn concurrent_send_is_rejected_while_pending() {
    let service = Arc::new(MockService::new(Reply::Content("hi")).gated());
    let mgr = Arc::new(manager(&service));

    let task = {
        let mgr = mgr.clone();
        tokio::spawn(async move { mgr.send("first").await })
    };
    service.entered.notified().await;

    let err = mgr.send("second").await.unwrap_err();
    assert!(matches!(err, SendError::Busy));
    assert_eq!(service.complete_calls.load(Ordering::SeqCst), 1);

    service.release();
    task.await.unwrap().unwrap();

    // welcome + first + reply; the rejected send left no trace
    assert_eq!(mgr.history().len(), 3);
    assert!(!mgr.is_pending());
}

#[tokio::test]
async fn dropped_send_releases_pending() {
    let service = Arc::new(MockService::new(Reply::Content("hi")).gated());
    let mgr = Arc::new(manager(&service));

    let task = {
        let mgr = mgr.clone();
        tokio::spawn(async move { mgr.send("hello").await })
    };
    service.entered.notified().await;
    assert!(mgr.is_pending());

    task.abort();
    let _ = task.await;
    assert!(!mgr.is_pending());
}

#[tokio::test]
async fn pending_events_bracket_each_send() {
    let service = Arc::new(MockService::new(Reply::Content("hi")));
    let mgr = manager(&service);
    let mut rx = mgr.subscribe();

    mgr.send("hello").await.unwrap();

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert!(matches!(events.first(), Some(ConversationEvent::PendingChanged(true))));
    assert!(matches!(events.last(), Some(ConversationEvent::PendingChanged(false))));
    let appended = events
        .iter()
        .filter(|e| matches!(e, ConversationEvent::MessageAppended(_)))
        .count();
    assert_eq!(appended, 2);
    assert!(events
        .iter()
        .any(|e| matches!(e, ConversationEvent::SessionStarted(_))));
}

// -- retry / dismiss --

#[tokio::test]
async fn retry_without_failure_is_rejected() {
    let service = Arc::new(MockService::new(Reply::Content("hi")));
    let mgr = manager(&service);
    let err = mgr.retry().await.unwrap_err();
    assert!(matches!(err, SendError::NothingToRetry));
    assert_eq!(service.complete_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn retry_resends_failed_content() {
    let service = Arc::new(MockService::new(Reply::Network));
    let mgr = manager(&service);

    mgr.send("hello").await.unwrap_err();
    mgr.retry().await.unwrap_err();

    assert_eq!(service.complete_calls.load(Ordering::SeqCst), 2);
    let last = service.last_request();
    assert_eq!(last.messages.last(), Some(&Message::user("hello")));
    assert_eq!(mgr.snapshot().retry_content.as_deref(), Some("hello"));
}

#[tokio::test]
async fn dismiss_error_clears_notice_but_keeps_retry() {
    let service = Arc::new(MockService::new(Reply::Network));
    let mgr = manager(&service);

    mgr.send("hello").await.unwrap_err();
    assert!(mgr.last_error().is_some());

    mgr.dismiss_error();
    let state = mgr.snapshot();
    assert!(state.last_error.is_none());
    assert_eq!(state.retry_content.as_deref(), Some("hello"));
}

// -- remote history --

#[tokio::test]
async fn remote_history_records_before_reply() {
    let service = Arc::new(MockService::new(Reply::Content("hi")));
    let history = Arc::new(MockHistory::new(false));
    let mgr = manager(&service).with_remote_history(history.clone());
    assert!(mgr.uses_remote_history());

    mgr.send("hello").await.unwrap();

    let recorded = history.recorded.lock().unwrap().clone();
    assert_eq!(
        recorded,
        vec![("srv-session".to_string(), "hello".to_string())]
    );
    assert_eq!(service.complete_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_record_aborts_before_reply() {
    let service = Arc::new(MockService::new(Reply::Content("hi")));
    let history = Arc::new(MockHistory::new(true));
    let mgr = manager(&service).with_remote_history(history.clone());

    let err = mgr.send("hello").await.unwrap_err();
    assert!(matches!(err, SendError::Remote(AiError::GraphQl(_))));
    assert_eq!(history.record_calls.load(Ordering::SeqCst), 1);
    assert_eq!(service.complete_calls.load(Ordering::SeqCst), 0);
    // welcome + user + synthetic error
    assert_eq!(mgr.history().len(), 3);
}

#[tokio::test]
async fn refresh_history_replaces_local_entries() {
    let service = Arc::new(MockService::new(Reply::Content("hi")));
    let mut history = MockHistory::new(false);
    history.stored = vec![ChatMessage::user("old question"), ChatMessage::assistant("old answer")];
    let mgr = manager(&service).with_remote_history(Arc::new(history));

    mgr.send("hello").await.unwrap();
    let count = mgr.refresh_history().await.unwrap();
    assert_eq!(count, 2);

    let entries = mgr.history();
    assert_eq!(entries.len(), 3);
    assert!(entries[0].is_welcome());
    assert_eq!(entries[1].content, "old question");
    assert_eq!(entries[2].content, "old answer");
}

#[tokio::test]
async fn refresh_history_requires_remote_source() {
    let service = Arc::new(MockService::new(Reply::Content("hi")));
    let mgr = manager(&service);
    let err = mgr.refresh_history().await.unwrap_err();
    assert!(matches!(err, SendError::Remote(AiError::Unsupported(_))));
}

// -- payload building --

#[test]
fn role_mapping_excludes_welcome_sentinel() {
    let history = vec![
        ChatMessage::welcome("Welcome!"),
        ChatMessage::user("a"),
        ChatMessage::assistant("b"),
    ];
    let messages = build_upstream_messages(&history, "c");
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "a");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "b");
    assert_eq!(messages[2], Message::user("c"));
}

#[test]
fn role_mapping_of_empty_history_is_just_the_new_turn() {
    let messages = build_upstream_messages(&[], "first");
    assert_eq!(messages, vec![Message::user("first")]);
}
