//! Lead capture settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadsConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for LeadsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://localhost:54321/functions/v1/leads".into(),
        }
    }
}
