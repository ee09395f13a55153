//! Line formatting for the terminal conversation view.
//!
//! Every function returns a `String` so output can be tested; color is
//! controlled globally through `colored::control`.

use chrono::Local;
use colored::Colorize;
use web3chat_common::{ChatMessage, SessionInfo, SessionOrigin};
use web3chat_config::DisplayConfig;

pub fn header(display: &DisplayConfig) -> String {
    let rule = "─".repeat(display.title.chars().count().max(24) + 4);
    format!(
        "{}\n  {}  {}\n  {}\n{}",
        rule.dimmed(),
        display.title.bold(),
        "● online".green(),
        display.subtitle.dimmed(),
        rule.dimmed()
    )
}

/// `[HH:MM] you › text` or `[HH:MM] ai  › text`, timestamps in local time.
pub fn message(msg: &ChatMessage, show_timestamps: bool) -> String {
    let stamp = if show_timestamps {
        let time = msg.timestamp.with_timezone(&Local).format("%H:%M");
        format!("{} ", format!("[{time}]").dimmed())
    } else {
        String::new()
    };

    if msg.is_user {
        format!("{stamp}{} {}", "you ›".cyan().bold(), msg.content)
    } else {
        format!("{stamp}{} {}", "ai  ›".magenta().bold(), msg.content)
    }
}

pub fn transcript(history: &[ChatMessage], show_timestamps: bool) -> String {
    history
        .iter()
        .map(|msg| message(msg, show_timestamps))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn thinking() -> String {
    "  thinking...".dimmed().italic().to_string()
}

pub fn error_notice(reason: &str) -> String {
    format!(
        "{} {}  {}",
        "!".red().bold(),
        reason.red(),
        "(/retry to resend, /dismiss to hide)".dimmed()
    )
}

pub fn notice(text: &str) -> String {
    format!("{} {}", "·".yellow(), text.yellow())
}

pub fn session_line(session: Option<&SessionInfo>) -> String {
    match session {
        None => notice("no session yet; one is created with the first message"),
        Some(info) => match info.origin {
            SessionOrigin::Remote => notice(&format!("session {}", info.id)),
            SessionOrigin::Local => notice(&format!(
                "session {} (local; the service did not issue one)",
                info.id
            )),
        },
    }
}

pub fn help() -> String {
    [
        ("/retry", "resend the last failed message"),
        ("/dismiss", "hide the current error notice"),
        ("/history", "reload the conversation from the server"),
        ("/session", "show the current session id"),
        ("/help", "show this list"),
        ("/quit", "exit"),
    ]
    .iter()
    .map(|(cmd, text)| format!("  {:<10} {}", cmd.bold(), text))
    .collect::<Vec<_>>()
    .join("\n")
}
