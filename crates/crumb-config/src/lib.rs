//! # crumb-config
//!
//! Layered configuration loading for crumb using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CRUMB_*` prefix, `__` as separator)
//! 2. An explicit config file, or the project-level `./crumb.toml`
//! 3. User-level `~/.config/crumb/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CRUMB_AUTH__COOKIE` -> `auth.cookie`,
//! `CRUMB_COOKIECLOUD__TARGET_DOMAIN` -> `cookiecloud.target_domain`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use crumb_config::CrumbConfig;
//!
//! let config = CrumbConfig::load_with_dotenv().expect("config");
//! if config.cookiecloud.enabled {
//!     println!("remote source: {}", config.cookiecloud.url);
//! }
//! ```

mod auth;
mod cache;
mod cookiecloud;
mod error;
mod notify;

pub use auth::StaticAuthConfig;
pub use cache::{CacheConfig, DEFAULT_CACHE_PATH};
pub use cookiecloud::{CookieCloudConfig, DEFAULT_AUTH_COOKIE_NAME, DEFAULT_TARGET_DOMAIN};
pub use error::ConfigError;
pub use notify::NotifyConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local config file name, looked up in the current directory.
pub const PROJECT_CONFIG_FILE: &str = "crumb.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CrumbConfig {
    #[serde(default)]
    pub auth: StaticAuthConfig,
    #[serde(default)]
    pub cookiecloud: CookieCloudConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl CrumbConfig {
    /// Load configuration from the default sources and validate it.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment())
    }

    /// Load configuration with an explicit file replacing `./crumb.toml`.
    ///
    /// Unlike the implicit project file, an explicit path must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::extract(Self::figment_with(Some(path)))
    }

    /// Load configuration with `.env` file support.
    ///
    /// Variables already present in the process environment are not overwritten.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the default figment provider chain.
    pub fn figment() -> Figment {
        Self::figment_with(None)
    }

    /// Build the provider chain, optionally pinning the project-level file.
    pub fn figment_with(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path =
            config_file.map_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE), Path::to_path_buf);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("CRUMB_").split("__"))
    }

    /// Reject values the resolver cannot work with.
    ///
    /// An enabled but incomplete CookieCloud section is accepted here: the remote
    /// fetch fails at resolution time and degrades to the static credentials.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cookiecloud.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cookiecloud.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.cookiecloud.enabled && self.cookiecloud.target_domain.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cookiecloud.target_domain".into(),
                reason: "must not be empty when cookiecloud is enabled".into(),
            });
        }
        if self.cookiecloud.enabled && self.cookiecloud.auth_cookie_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cookiecloud.auth_cookie_name".into(),
                reason: "must not be empty when cookiecloud is enabled".into(),
            });
        }
        Ok(())
    }

    /// Fail fast when the remote source is enabled without its connection triple.
    pub fn require_cookiecloud(&self) -> Result<&CookieCloudConfig, ConfigError> {
        let missing = self.cookiecloud.missing_fields();
        if missing.is_empty() {
            Ok(&self.cookiecloud)
        } else {
            Err(ConfigError::NotConfigured {
                section: "cookiecloud".into(),
                missing: missing.join(", "),
            })
        }
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("crumb").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_disabled_and_unconfigured() {
        let config = CrumbConfig::default();
        assert!(!config.auth.is_configured());
        assert!(!config.cookiecloud.enabled);
        assert!(!config.notify.is_configured());
        assert_eq!(config.cache.path, PathBuf::from(DEFAULT_CACHE_PATH));
    }

    #[test]
    fn defaults_pass_validation() {
        assert!(CrumbConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = CrumbConfig::default();
        config.cookiecloud.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cookiecloud.timeout_secs"));
    }

    #[test]
    fn enabled_source_needs_target_domain() {
        let mut config = CrumbConfig::default();
        config.cookiecloud.enabled = true;
        config.cookiecloud.target_domain = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn require_cookiecloud_reports_missing_fields() {
        let mut config = CrumbConfig::default();
        config.cookiecloud.url = "https://cc.example.com".into();
        let err = config.require_cookiecloud().unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration section 'cookiecloud' is enabled but incomplete: uuid, password"
        );
    }

    #[test]
    fn load_from_missing_file_fails() {
        let err = CrumbConfig::load_from(Path::new("/nonexistent/crumb.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
