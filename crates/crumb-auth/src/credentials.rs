use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AuthError;

/// Resolved credentials for the downstream API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Bearer token for the `Authorization` header.
    pub authorization: String,
    /// Full `Cookie` header value.
    pub cookie: String,
}

impl Credentials {
    pub fn new(authorization: impl Into<String>, cookie: impl Into<String>) -> Self {
        Self {
            authorization: authorization.into(),
            cookie: cookie.into(),
        }
    }
}

/// Credentials extracted from a remote cookie set, with the token's expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAuth {
    pub authorization: String,
    pub cookie_string: String,
    pub expires_at: DateTime<Utc>,
}

impl From<ParsedAuth> for Credentials {
    fn from(parsed: ParsedAuth) -> Self {
        Self {
            authorization: parsed.authorization,
            cookie: parsed.cookie_string,
        }
    }
}

/// Operator-provided credentials, possibly left blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCredentials {
    pub authorization: String,
    pub cookie: String,
}

impl StaticCredentials {
    pub fn new(authorization: impl Into<String>, cookie: impl Into<String>) -> Self {
        Self {
            authorization: authorization.into(),
            cookie: cookie.into(),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.authorization.is_empty() && !self.cookie.is_empty()
    }

    /// # Errors
    ///
    /// Returns `AuthError::StaticConfigIncomplete` if either field is empty.
    pub fn resolve(&self) -> Result<Credentials, AuthError> {
        if !self.is_complete() {
            return Err(AuthError::StaticConfigIncomplete);
        }
        Ok(Credentials::new(&self.authorization, &self.cookie))
    }
}
