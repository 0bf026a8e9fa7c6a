//! CookieCloud remote source configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Domain whose cookies carry the downstream credentials.
pub const DEFAULT_TARGET_DOMAIN: &str = ".duolainc.com";

/// Cookie holding the bearer token.
pub const DEFAULT_AUTH_COOKIE_NAME: &str = "PROD_AUTH_TOKEN";

fn default_target_domain() -> String {
    DEFAULT_TARGET_DOMAIN.to_string()
}

fn default_auth_cookie_name() -> String {
    DEFAULT_AUTH_COOKIE_NAME.to_string()
}

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CookieCloudConfig {
    /// Whether the remote source participates in resolution at all.
    #[serde(default)]
    pub enabled: bool,

    /// Server base URL (e.g., `https://cookiecloud.example.com`).
    #[serde(default)]
    pub url: String,

    /// Sync identifier configured in the browser extension.
    #[serde(default)]
    pub uuid: String,

    /// End-to-end password configured in the browser extension.
    #[serde(default)]
    pub password: String,

    /// Cookie domain to extract (leading dot optional).
    #[serde(default = "default_target_domain")]
    pub target_domain: String,

    /// Name of the cookie holding the bearer token.
    #[serde(default = "default_auth_cookie_name")]
    pub auth_cookie_name: String,

    /// Whole-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Skip TLS certificate verification for this client only (self-signed servers).
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for CookieCloudConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            uuid: String::new(),
            password: String::new(),
            target_domain: default_target_domain(),
            auth_cookie_name: default_auth_cookie_name(),
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}

impl CookieCloudConfig {
    /// Check if the connection triple is present.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.uuid.is_empty() && !self.password.is_empty()
    }

    /// Names of the connection fields that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("url", &self.url),
            ("uuid", &self.uuid),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
