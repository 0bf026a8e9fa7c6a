//! The remote cookie source seam.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// One cookie as delivered by a remote source.
///
/// Sources usually send more attributes (`domain`, `path`, `expirationDate`, ...);
/// only the pair below takes part in resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CookieRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl CookieRecord {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Cookies grouped by the domain key the source stored them under.
pub type CookieMap = HashMap<String, Vec<CookieRecord>>;

/// A remote service that can hand out the cookies synced from a browser.
///
/// Implementations own their transport settings (timeouts, TLS) per instance.
pub trait CookieSource: Send + Sync {
    /// Human-readable name used in logs and alerts.
    fn name(&self) -> &str {
        "remote"
    }

    /// Fetch every domain's cookies. `target_domain` is a hint for logging and for
    /// sources able to filter server-side; the resolver does the matching itself.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Unavailable` on transport failures and
    /// `FetchError::EmptyResponse` when the source has nothing stored.
    fn fetch_domain_cookies(&self, target_domain: &str) -> Result<CookieMap, FetchError>;
}
