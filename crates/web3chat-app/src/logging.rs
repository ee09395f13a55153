use tracing_subscriber::EnvFilter;
use web3chat_config::{LogLevel, LoggingConfig};

/// Pick the filter directive: CLI flag, then `RUST_LOG`, then config.
pub fn filter_directive(
    cli_level: Option<LogLevel>,
    rust_log: Option<String>,
    config: &LoggingConfig,
) -> String {
    if let Some(level) = cli_level {
        return LoggingConfig { level }.directive();
    }
    match rust_log {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ => config.directive(),
    }
}

/// Install the stderr subscriber. Stdout is reserved for the conversation.
pub fn init(cli_level: Option<LogLevel>, config: &LoggingConfig) {
    let directive = filter_directive(cli_level, std::env::var("RUST_LOG").ok(), config);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("invalid log filter {directive:?} ({e}), using config level");
        EnvFilter::new(config.directive())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(level: LogLevel) -> LoggingConfig {
        LoggingConfig { level }
    }

    #[test]
    fn cli_flag_wins() {
        let directive = filter_directive(
            Some(LogLevel::Debug),
            Some("warn".into()),
            &config(LogLevel::Error),
        );
        assert!(directive.contains("web3chat_ai=debug"));
    }

    #[test]
    fn rust_log_beats_config() {
        let directive = filter_directive(None, Some("hyper=trace".into()), &config(LogLevel::Info));
        assert_eq!(directive, "hyper=trace");
    }

    #[test]
    fn config_is_the_fallback() {
        let directive = filter_directive(None, Some("  ".into()), &config(LogLevel::Warn));
        assert_eq!(directive, config(LogLevel::Warn).directive());
        let directive = filter_directive(None, None, &config(LogLevel::Warn));
        assert!(directive.contains("web3chat=warn"));
    }
}
