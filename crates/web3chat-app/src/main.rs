mod cli;
mod logging;
mod services;
mod ui;

use std::process::ExitCode;
use std::sync::Arc;

use web3chat_common::{ConfigError, Web3ChatError};
use web3chat_config::Web3ChatConfig;

fn load_config(args: &cli::Args) -> (Web3ChatConfig, Option<ConfigError>) {
    let loaded = match args.config {
        Some(ref path) => web3chat_config::load_config_from(path),
        None => web3chat_config::load_config(),
    };
    match loaded {
        Ok(config) => (config, None),
        Err(e) => (Web3ChatConfig::default(), Some(e)),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let args = cli::parse();

    let (mut config, load_error) = load_config(&args);
    args.apply_overrides(&mut config);

    logging::init(args.log_level.map(Into::into), &config.logging);
    tracing::info!("web3chat v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Some(e) = load_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    match run(&args, config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("web3chat: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &cli::Args, config: Web3ChatConfig) -> Result<ExitCode, Web3ChatError> {
    // Command-line overrides can invalidate an otherwise valid file
    web3chat_config::validation::validate(&config)?;

    colored::control::set_override(config.display.color);

    let manager = match services::build_manager(&config) {
        Ok(manager) => Arc::new(manager),
        Err(e) => {
            tracing::error!("Failed to set up completion service: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if let Some(ref message) = args.message {
        return Ok(ui::run_once(&manager, message).await);
    }

    ui::run_interactive(manager, config.display).await?;
    tracing::info!("Shutdown complete");
    Ok(ExitCode::SUCCESS)
}
