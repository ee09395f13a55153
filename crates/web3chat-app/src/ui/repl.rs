//! Interactive chat loop and the one-shot send.

use std::process::ExitCode;
use std::sync::Arc;

use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use web3chat_ai::{AiError, SendError, SessionManager};
use web3chat_common::{ConversationEvent, Web3ChatError};
use web3chat_config::DisplayConfig;

use super::command::Command;
use super::render;

/// Send `content`, print the reply on stdout, and report the outcome.
pub async fn run_once(manager: &SessionManager, content: &str) -> ExitCode {
    match manager.send(content).await {
        Ok(outcome) => {
            println!("{}", outcome.ai_message.content);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Print the header and chat over stdin until EOF or `/quit`.
pub async fn run_interactive(
    manager: Arc<SessionManager>,
    display: DisplayConfig,
) -> Result<(), Web3ChatError> {
    println!("{}", render::header(&display));
    let history = manager.history();
    if !history.is_empty() {
        println!("{}", render::transcript(&history, display.show_timestamps));
    }
    println!(
        "{}",
        render::notice("type a message and press Enter; /help lists commands")
    );

    chat_loop(
        manager,
        display.show_timestamps,
        BufReader::new(tokio::io::stdin()),
    )
    .await
}

/// Dispatch input lines until EOF or `/quit`.
///
/// Requests run on their own tasks so input stays responsive; all
/// conversation output comes from the manager's event stream. Before
/// returning, every in-flight request is awaited and the renderer drains
/// the events they published.
pub(crate) async fn chat_loop<R>(
    manager: Arc<SessionManager>,
    show_timestamps: bool,
    input: R,
) -> Result<(), Web3ChatError>
where
    R: AsyncBufRead + Unpin,
{
    let (stop, stopped) = oneshot::channel();
    let renderer = tokio::spawn(render_events(
        manager.clone(),
        manager.subscribe(),
        show_timestamps,
        stopped,
    ));

    let mut requests = JoinSet::new();
    let mut lines = input.lines();
    let read_result = loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        };
        while requests.try_join_next().is_some() {}

        match Command::parse(&line) {
            Command::Empty => {}
            Command::Send(content) => spawn_send(&mut requests, &manager, Some(content)),
            Command::Retry => spawn_send(&mut requests, &manager, None),
            Command::Dismiss => manager.dismiss_error(),
            Command::History => spawn_refresh(&mut requests, &manager),
            Command::Session => println!("{}", render::session_line(manager.session().as_ref())),
            Command::Help => println!("{}", render::help()),
            Command::Unknown(cmd) => println!(
                "{}",
                render::notice(&format!("unknown command {cmd}; /help lists commands"))
            ),
            Command::Quit => break Ok(()),
        }
    };

    if !requests.is_empty() {
        info!(in_flight = requests.len(), "waiting for in-flight requests");
    }
    while let Some(joined) = requests.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "request task ended abnormally");
        }
    }

    let _ = stop.send(());
    if let Err(e) = renderer.await {
        warn!(error = %e, "renderer ended abnormally");
    }
    read_result.map_err(Web3ChatError::from)
}

/// `None` resends the last failed message.
fn spawn_send(
    requests: &mut JoinSet<()>,
    manager: &Arc<SessionManager>,
    content: Option<String>,
) {
    let manager = Arc::clone(manager);
    requests.spawn(async move {
        let result = match content {
            Some(content) => manager.send(&content).await,
            None => manager.retry().await,
        };
        match result {
            Ok(_) => {}
            // Already rendered from the event stream.
            Err(SendError::Remote(e)) => debug!(error = %e, "send failed"),
            Err(SendError::Busy) => println!(
                "{}",
                render::notice("still waiting for the previous reply")
            ),
            Err(SendError::NothingToRetry) => println!("{}", render::notice("nothing to retry")),
            Err(SendError::EmptyMessage) => {}
        }
    });
}

fn spawn_refresh(requests: &mut JoinSet<()>, manager: &Arc<SessionManager>) {
    let manager = Arc::clone(manager);
    requests.spawn(async move {
        match manager.refresh_history().await {
            Ok(count) => debug!(count, "history reloaded"),
            Err(SendError::Remote(AiError::Unsupported(_))) => println!(
                "{}",
                render::notice("history is kept locally; set service.history = \"remote\" to load it")
            ),
            Err(SendError::Busy) => println!(
                "{}",
                render::notice("still waiting for the previous reply")
            ),
            Err(e) => println!("{}", render::error_notice(&e.to_string())),
        }
    });
}

/// Render events until `stop` fires, then drain what is already queued.
/// Returns the number of events received.
async fn render_events(
    manager: Arc<SessionManager>,
    mut events: broadcast::Receiver<ConversationEvent>,
    show_timestamps: bool,
    mut stop: oneshot::Receiver<()>,
) -> usize {
    let mut received = 0;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    received += 1;
                    render_event(&manager, event, show_timestamps);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "renderer fell behind, redrawing");
                    println!(
                        "{}",
                        render::transcript(&manager.history(), show_timestamps)
                    );
                }
                Err(RecvError::Closed) => return received,
            },
            _ = &mut stop => break,
        }
    }

    loop {
        match events.try_recv() {
            Ok(event) => {
                received += 1;
                render_event(&manager, event, show_timestamps);
            }
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "renderer fell behind while draining");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => return received,
        }
    }
}

fn render_event(manager: &SessionManager, event: ConversationEvent, show_timestamps: bool) {
    match event {
        ConversationEvent::MessageAppended(msg) => {
            println!("{}", render::message(&msg, show_timestamps));
            if msg.is_user && manager.is_pending() {
                println!("{}", render::thinking());
            }
        }
        ConversationEvent::ErrorRaised(reason) => println!("{}", render::error_notice(&reason)),
        ConversationEvent::ErrorDismissed => println!("{}", render::notice("error dismissed")),
        ConversationEvent::SessionStarted(info) if info.is_local() => {
            println!("{}", render::session_line(Some(&info)))
        }
        ConversationEvent::HistoryReplaced => {
            println!("{}", render::transcript(&manager.history(), show_timestamps))
        }
        ConversationEvent::SessionStarted(_)
        | ConversationEvent::PendingChanged(_)
        | ConversationEvent::Unknown => {}
    }
}
