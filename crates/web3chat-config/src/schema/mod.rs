//! Configuration schema types for web3chat.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod display;
mod generation;
mod service;
mod session;
mod system;

pub use display::*;
pub use generation::*;
pub use service::*;
pub use session::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Web3ChatConfig {
    pub service: ServiceConfig,
    pub generation: GenerationConfig,
    pub session: SessionConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}
