use thiserror::Error;

/// The only failure a resolution surfaces to its caller.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(
        "static credentials are incomplete; set auth.authorization and auth.cookie \
         (or CRUMB_AUTH__AUTHORIZATION / CRUMB_AUTH__COOKIE)"
    )]
    StaticConfigIncomplete,
}

/// Failures on the remote path. The resolver absorbs all of them.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("remote cookie source unavailable: {0}")]
    Unavailable(String),

    #[error("remote cookie source returned no cookie data")]
    EmptyResponse,

    #[error("no cookies for domain '{domain}' (available: {})", available.join(", "))]
    DomainNotFound {
        domain: String,
        available: Vec<String>,
    },

    #[error("cookie '{name}' is missing or empty")]
    MissingAuthToken { name: String },

    #[error("cannot determine expiry of cookie '{name}'")]
    UnparseableExpiry { name: String },
}

/// Cache file failures. Logged, never returned from the public cache API.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache file is not valid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache version {found:?} does not match supported version {expected}")]
    VersionMismatch { found: Option<u64>, expected: u32 },

    #[error("cache timestamp out of range: {0}")]
    Timestamp(String),
}
