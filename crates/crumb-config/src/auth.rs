//! Static credentials, the last link of the resolution chain.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StaticAuthConfig {
    /// Bearer token sent as the `Authorization` header.
    #[serde(default)]
    pub authorization: String,

    /// Full cookie string sent as the `Cookie` header.
    #[serde(default)]
    pub cookie: String,
}

impl StaticAuthConfig {
    /// Both fields are required for the static fallback to be usable.
    pub fn is_configured(&self) -> bool {
        !self.authorization.is_empty() && !self.cookie.is_empty()
    }
}
