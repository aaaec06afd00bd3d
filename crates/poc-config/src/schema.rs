//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod chat;
mod leads;
mod logging;

pub use chat::*;
pub use leads::*;
pub use logging::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PocConfig {
    pub chat: ChatConfig,
    pub leads: LeadsConfig,
    pub logging: LoggingConfig,
}
