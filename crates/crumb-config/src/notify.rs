//! Alert delivery configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NotifyConfig {
    /// Group-bot webhook receiving degradation alerts. Empty means log-only.
    #[serde(default)]
    pub webhook_url: String,
}

impl NotifyConfig {
    pub fn is_configured(&self) -> bool {
        !self.webhook_url.is_empty()
    }
}
