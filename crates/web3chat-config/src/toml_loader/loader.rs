//! Config file parsing with fallback-to-default on invalid values.

use std::path::Path;

use tracing::{info, warn};
use web3chat_common::ConfigError;

use super::paths::{create_default_config, default_config_path};
use crate::schema::Web3ChatConfig;
use crate::validation;

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// If the parsed config fails validation, a warning is logged and the
/// default config is returned.
pub fn load_from_path(path: &Path) -> Result<Web3ChatConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: Web3ChatConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
        warn!("falling back to default config");
        return Ok(Web3ChatConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// If the file does not exist, writes the commented template and returns defaults.
pub fn load_default() -> Result<Web3ChatConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(Web3ChatConfig::default());
    }

    load_from_path(&path)
}
