//! web3chat configuration system.
//!
//! TOML-based configuration with full validation. All config sections use
//! sensible defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use web3chat_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("model: {}", config.generation.model);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    DisplayConfig, GenerationConfig, HistoryMode, LogLevel, LoggingConfig, ServiceConfig,
    SessionConfig, Transport, Web3ChatConfig, CONFIG_SCHEMA_VERSION,
};

use std::path::Path;

use web3chat_common::ConfigError;

/// Load config from the platform default path.
///
/// Creates a commented default file if none exists, then validates.
pub fn load_config() -> Result<Web3ChatConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path (the `--config` override).
pub fn load_config_from(path: &Path) -> Result<Web3ChatConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}
