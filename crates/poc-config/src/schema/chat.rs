//! Chat endpoint and typing animation settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat assistant configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// URL of the streaming chat endpoint.
    pub endpoint: String,
    /// Name of the environment variable holding the bearer credential.
    pub api_key_env: String,
    /// Delay between revealed characters.
    pub typing_interval_ms: u32,
    pub connect_timeout_secs: u32,
}

impl ChatConfig {
    pub fn typing_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.typing_interval_ms))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_secs))
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:54321/functions/v1/chat".into(),
            api_key_env: "POC_CHAT_API_KEY".into(),
            typing_interval_ms: 20,
            connect_timeout_secs: 10,
        }
    }
}
