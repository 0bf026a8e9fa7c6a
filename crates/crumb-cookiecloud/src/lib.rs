//! # crumb-cookiecloud
//!
//! [CookieCloud](https://github.com/easychen/CookieCloud) client implementing
//! [`crumb_auth::CookieSource`].
//!
//! The server decrypts the synced payload itself when the request carries the
//! password (`POST {url}/get/{uuid}` with `{"password": ...}`), so no client-side
//! cryptography is involved. TLS settings live on the client instance; nothing here
//! touches process-wide HTTP defaults.

use std::time::Duration;

use crumb_auth::{CookieMap, CookieSource, FetchError};
use serde::Deserialize;
use thiserror::Error;

const SOURCE_NAME: &str = "CookieCloud";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build CookieCloud HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Per-client transport settings.
#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Accept self-signed or otherwise invalid certificates for this client only.
    pub accept_invalid_certs: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }
}

/// Server reply to `/get/{uuid}`.
#[derive(Debug, Deserialize)]
struct SyncPayload {
    /// Present when the server decrypted the payload for us.
    #[serde(default)]
    cookie_data: Option<CookieMap>,
    /// Present when the server only holds the encrypted blob.
    #[serde(default)]
    encrypted: Option<String>,
}

pub struct CookieCloudClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    password: String,
}

impl CookieCloudClient {
    /// Build a client with default [`ClientOptions`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Build` if the TLS backend cannot be initialised.
    pub fn new(url: &str, uuid: &str, password: &str) -> Result<Self, ClientError> {
        Self::with_options(url, uuid, password, ClientOptions::default())
    }

    /// # Errors
    ///
    /// Returns `ClientError::Build` if the TLS backend cannot be initialised.
    pub fn with_options(
        url: &str,
        uuid: &str,
        password: &str,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        if options.accept_invalid_certs {
            tracing::warn!("CookieCloud client accepts invalid TLS certificates");
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint(url, uuid),
            password: password.to_string(),
        })
    }

    fn request(&self) -> Result<SyncPayload, FetchError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&serde_json::json!({ "password": self.password }))
            .send()
            .map_err(|e| FetchError::Unavailable(format!("request failed: {}", e.without_url())))?
            .error_for_status()
            .map_err(|e| FetchError::Unavailable(format!("server error: {}", e.without_url())))?;

        response
            .json::<SyncPayload>()
            .map_err(|e| FetchError::Unavailable(format!("unreadable response: {}", e.without_url())))
    }
}

impl CookieSource for CookieCloudClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn fetch_domain_cookies(&self, target_domain: &str) -> Result<CookieMap, FetchError> {
        tracing::info!(domain = target_domain, "requesting cookies from CookieCloud");

        let payload = self.request()?;
        match payload.cookie_data {
            Some(cookies) if !cookies.is_empty() => {
                tracing::info!(domains = cookies.len(), "CookieCloud returned cookies");
                if tracing::enabled!(tracing::Level::DEBUG) {
                    let mut domains: Vec<&String> = cookies.keys().collect();
                    domains.sort();
                    tracing::debug!(?domains, "available cookie domains");
                }
                Ok(cookies)
            }
            None if payload.encrypted.is_some() => Err(FetchError::Unavailable(
                "server returned only the encrypted payload; it must support password decryption"
                    .into(),
            )),
            _ => Err(FetchError::EmptyResponse),
        }
    }
}

impl std::fmt::Debug for CookieCloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieCloudClient")
            .field("endpoint", &self.endpoint)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

fn endpoint(url: &str, uuid: &str) -> String {
    format!("{}/get/{uuid}", url.trim_end_matches('/'))
}
