//! Where the config file lives, and seeding it with the commented template.

use std::path::{Path, PathBuf};

use tracing::info;
use web3chat_common::ConfigError;

use super::template::default_config_toml;

const APP_DIR: &str = "web3chat";
const FILE_NAME: &str = "config.toml";

/// `<config_dir>/web3chat/config.toml`, with `<config_dir>` from `dirs`
/// (`$XDG_CONFIG_HOME` or `~/.config` on Linux).
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| base.join(APP_DIR).join(FILE_NAME))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Write the template to `path`, creating parent directories. Overwrites
/// whatever is there; callers only invoke it when the file is missing.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_failure = |action: &str, target: &Path, e: std::io::Error| {
        ConfigError::ParseError(format!("cannot {action} {}: {e}", target.display()))
    };

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_failure("create directory", dir, e))?;
    }
    std::fs::write(path, default_config_toml())
        .map_err(|e| io_failure("write template to", path, e))?;

    info!(path = %path.display(), "wrote default config");
    Ok(())
}
