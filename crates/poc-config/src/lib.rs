//! Configuration for the Proof of Concept chat client.
//!
//! Provides TOML-based configuration with validation. All sections use
//! sensible defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use poc_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("chat endpoint: {}", config.chat.endpoint);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::PocConfig;

use poc_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, creating it on first run.
pub fn load_config() -> Result<PocConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path (the `--config` override).
pub fn load_config_from(path: &Path) -> Result<PocConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}
