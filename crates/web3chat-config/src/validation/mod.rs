//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod generation;
mod helpers;
mod service;


use web3chat_common::ConfigError;

use crate::schema::Web3ChatConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &Web3ChatConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    service::validate_service(&mut errors, config);
    generation::validate_generation(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
