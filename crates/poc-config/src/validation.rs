//! Full configuration validation.
//!
//! Each check pushes a message into a shared list; all problems are
//! reported together in a single `ConfigError`.

mod helpers;


use crate::schema::PocConfig;
use poc_common::ConfigError;

pub use helpers::is_http_url;

use helpers::{validate_one_of, validate_range, validate_url};

/// Accepted values for `logging.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &PocConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_url(&mut errors, "chat.endpoint", &config.chat.endpoint);
    validate_range(
        &mut errors,
        "chat.typing_interval_ms",
        config.chat.typing_interval_ms,
        1,
        1000,
    );
    validate_range(
        &mut errors,
        "chat.connect_timeout_secs",
        config.chat.connect_timeout_secs,
        1,
        120,
    );
    if config.chat.api_key_env.trim().is_empty() {
        errors.push("chat.api_key_env must not be empty".into());
    }

    if config.leads.enabled {
        validate_url(&mut errors, "leads.endpoint", &config.leads.endpoint);
    }

    validate_one_of(&mut errors, "logging.level", &config.logging.level, LOG_LEVELS);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
