use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use web3chat_config::{LogLevel, Transport, Web3ChatConfig};

/// web3chat: a terminal chat client for a remote AI completion service.
#[derive(Parser, Debug)]
#[command(name = "web3chat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Completion service endpoint URL.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Wire protocol used to reach the endpoint.
    #[arg(long, value_enum)]
    pub transport: Option<TransportArg>,

    /// Model name sent with every request.
    #[arg(long)]
    pub model: Option<String>,

    /// Log level override. Takes precedence over RUST_LOG.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Send a single message, print the reply, and exit.
    #[arg(short = 'm', long)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    Graphql,
    Http,
}

impl From<TransportArg> for Transport {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Graphql => Transport::GraphQl,
            TransportArg::Http => Transport::Http,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevelArg {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Trace => LogLevel::Trace,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Error => LogLevel::Error,
        }
    }
}

impl Args {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut Web3ChatConfig) {
        if let Some(ref endpoint) = self.endpoint {
            config.service.endpoint = endpoint.clone();
        }
        if let Some(transport) = self.transport {
            config.service.transport = transport.into();
        }
        if let Some(ref model) = self.model {
            config.generation.model = model.clone();
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
