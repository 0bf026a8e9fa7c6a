//! # crumb-auth
//!
//! Credential resolution for a cookie-authenticated downstream API.
//!
//! Resolution order: local cache → remote cookie source → static configuration.
//! The remote source ([`CookieSource`]) and alert sink ([`Notifier`]) are injected, so
//! everything here runs without network access. Token decoding ([`expiry`]), domain
//! matching ([`domain`]) and cookie parsing ([`parser`]) are pure functions.

pub mod cache;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod expiry;
pub mod notify;
pub mod parser;
pub mod resolver;
pub mod source;

pub use cache::{CACHE_VERSION, CacheRecord, CredentialCache, REFRESH_BUFFER_SECS};
pub use credentials::{Credentials, ParsedAuth, StaticCredentials};
pub use error::{AuthError, CacheError, FetchError};
pub use expiry::extract_expiry;
pub use notify::{Alert, LogNotifier, Notifier};
pub use parser::DEFAULT_AUTH_COOKIE;
pub use resolver::{CredentialResolver, RemoteSource, ResolverMode};
pub use source::{CookieMap, CookieRecord, CookieSource};
