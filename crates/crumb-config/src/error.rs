//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment could not merge or extract the provider chain.
    #[error("failed to load crumb configuration: {0}")]
    Figment(#[from] figment::Error),

    /// A config file was requested explicitly but does not exist.
    #[error("config file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// A section is enabled but lacks the fields it needs.
    #[error("configuration section '{section}' is enabled but incomplete: {missing}")]
    NotConfigured { section: String, missing: String },

    /// A field holds a value the loader refuses.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
