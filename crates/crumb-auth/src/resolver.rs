use std::sync::Arc;

use chrono::Utc;

use crate::cache::{CacheRecord, CredentialCache};
use crate::credentials::{Credentials, ParsedAuth, StaticCredentials};
use crate::domain;
use crate::error::{AuthError, FetchError};
use crate::notify::{Alert, LogNotifier, Notifier};
use crate::parser::{self, DEFAULT_AUTH_COOKIE};
use crate::source::CookieSource;

const ALERT_TITLE: &str = "Credential resolution degraded";

/// A remote cookie source bound to the domain and cookie it should yield.
#[derive(Clone)]
pub struct RemoteSource {
    source: Arc<dyn CookieSource>,
    target_domain: String,
    auth_cookie_name: String,
}

impl RemoteSource {
    pub fn new(source: Arc<dyn CookieSource>, target_domain: impl Into<String>) -> Self {
        Self {
            source,
            target_domain: target_domain.into(),
            auth_cookie_name: DEFAULT_AUTH_COOKIE.to_string(),
        }
    }

    #[must_use]
    pub fn with_auth_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.auth_cookie_name = name.into();
        self
    }

    #[must_use]
    pub fn target_domain(&self) -> &str {
        &self.target_domain
    }

    /// Fetch, match and parse in one step.
    ///
    /// # Errors
    ///
    /// Any `FetchError` from the source, `DomainNotFound` when the target domain has
    /// no cookies, or the parser's errors.
    pub fn fetch(&self) -> Result<ParsedAuth, FetchError> {
        tracing::info!(
            source = self.source.name(),
            domain = %self.target_domain,
            "fetching cookies from remote source"
        );
        let by_domain = self.source.fetch_domain_cookies(&self.target_domain)?;
        if by_domain.is_empty() {
            return Err(FetchError::EmptyResponse);
        }
        tracing::info!(domains = by_domain.len(), "remote source returned cookies");

        let records = domain::find(&by_domain, &self.target_domain);
        if records.is_empty() {
            return Err(FetchError::DomainNotFound {
                domain: self.target_domain.clone(),
                available: domain::available_domains(&by_domain),
            });
        }
        tracing::debug!(cookies = records.len(), "matched domain cookies");

        parser::parse(records, &self.auth_cookie_name)
    }
}

impl std::fmt::Debug for RemoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSource")
            .field("source", &self.source.name())
            .field("target_domain", &self.target_domain)
            .field("auth_cookie_name", &self.auth_cookie_name)
            .finish()
    }
}

/// Whether a remote source takes part in resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverMode {
    /// Static credentials only.
    Disabled,
    /// Cache, then remote source, then static credentials.
    Enabled,
}

/// Resolves credentials through cache → remote source → static configuration.
///
/// ```no_run
/// use std::sync::Arc;
/// use crumb_auth::{CredentialCache, CredentialResolver, StaticCredentials};
///
/// let resolver = CredentialResolver::new(
///     StaticCredentials::new("token", "a=1"),
///     CredentialCache::new("./data/cookie_cache.json"),
/// );
/// let creds = resolver.get_auth().expect("static credentials");
/// println!("{}", creds.cookie);
/// ```
pub struct CredentialResolver {
    static_auth: StaticCredentials,
    cache: CredentialCache,
    remote: Option<RemoteSource>,
    notifier: Arc<dyn Notifier>,
}

impl CredentialResolver {
    /// A `Disabled` resolver that logs alerts.
    pub fn new(static_auth: StaticCredentials, cache: CredentialCache) -> Self {
        Self {
            static_auth,
            cache,
            remote: None,
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Switch to `Enabled` with the given remote source.
    #[must_use]
    pub fn with_remote(mut self, remote: RemoteSource) -> Self {
        self.remote = Some(remote);
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub const fn mode(&self) -> ResolverMode {
        if self.remote.is_some() {
            ResolverMode::Enabled
        } else {
            ResolverMode::Disabled
        }
    }

    #[must_use]
    pub const fn is_remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    #[must_use]
    pub const fn cache(&self) -> &CredentialCache {
        &self.cache
    }

    #[must_use]
    pub const fn static_credentials(&self) -> &StaticCredentials {
        &self.static_auth
    }

    /// Resolve credentials.
    ///
    /// Remote failures never escape: they raise one alert and fall back to the
    /// static credentials.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::StaticConfigIncomplete` when the static credentials are
    /// needed and either field is empty.
    pub fn get_auth(&self) -> Result<Credentials, AuthError> {
        let Some(remote) = &self.remote else {
            tracing::debug!("remote source disabled; using static credentials");
            return self.static_auth.resolve();
        };

        if let Some(cached) = self.cache.load()
            && self.cache.is_valid(&cached)
        {
            tracing::info!(expires_at = %cached.expires_at, "using cached credentials");
            return Ok(cached.credentials());
        }

        match remote.fetch() {
            Ok(parsed) => {
                self.store(&parsed);
                Ok(parsed.into())
            }
            Err(error) => {
                tracing::error!(%error, "remote credential fetch failed");
                self.notifier.notify(&degraded_alert(remote, &error));
                tracing::warn!("falling back to static credentials");
                self.static_auth.resolve()
            }
        }
    }

    /// Resolve again, optionally discarding the cache first so the remote source is
    /// always consulted.
    ///
    /// # Errors
    ///
    /// Same as [`get_auth`](Self::get_auth).
    pub fn refresh(&self, force: bool) -> Result<Credentials, AuthError> {
        if force {
            tracing::info!("forced refresh; clearing credential cache");
            self.cache.invalidate();
        }
        self.get_auth()
    }

    /// Drop the cached record without fetching a new one.
    pub fn invalidate(&self) -> bool {
        self.cache.invalidate()
    }

    fn store(&self, parsed: &ParsedAuth) {
        let now = Utc::now();
        let record = CacheRecord::from_parsed(parsed, now);
        if now > record.refresh_at() {
            tracing::warn!(
                expires_at = %parsed.expires_at,
                "remote token is already inside the refresh window"
            );
        }
        if !self.cache.save(&record) {
            tracing::warn!("continuing with uncached credentials");
        }
    }
}

fn degraded_alert(remote: &RemoteSource, error: &FetchError) -> Alert {
    Alert {
        title: ALERT_TITLE.to_string(),
        message: format!(
            "**Source**: {source}\n**Detail**: {error}\n**Status**: fell back to static credentials",
            source = remote.source.name(),
        ),
        suggestions: vec![
            format!("Check that the {} service is reachable", remote.source.name()),
            format!(
                "Confirm the browser is still logged in to {}",
                remote.target_domain.trim_start_matches('.')
            ),
            "Trigger a manual sync from the browser extension".to_string(),
            "Verify the static auth.authorization and auth.cookie values".to_string(),
        ],
        mention_all: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{CookieMap, CookieRecord};

    struct DownSource;

    impl CookieSource for DownSource {
        fn name(&self) -> &str {
            "CookieCloud"
        }

        fn fetch_domain_cookies(&self, _target_domain: &str) -> Result<CookieMap, FetchError> {
            Err(FetchError::Unavailable("connection refused".into()))
        }
    }

    struct FixedSource(CookieMap);

    impl CookieSource for FixedSource {
        fn fetch_domain_cookies(&self, _target_domain: &str) -> Result<CookieMap, FetchError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn mode_reflects_remote_presence() {
        let cache = CredentialCache::new("unused.json");
        let disabled = CredentialResolver::new(StaticCredentials::default(), cache.clone());
        assert_eq!(disabled.mode(), ResolverMode::Disabled);

        let enabled = disabled.with_remote(RemoteSource::new(Arc::new(DownSource), ".x.com"));
        assert_eq!(enabled.mode(), ResolverMode::Enabled);
        assert!(enabled.is_remote_enabled());
    }

    #[test]
    fn alert_names_source_error_and_fallback() {
        let remote = RemoteSource::new(Arc::new(DownSource), ".duolainc.com");
        let alert = degraded_alert(&remote, &FetchError::EmptyResponse);

        assert_eq!(alert.title, ALERT_TITLE);
        assert!(alert.message.contains("CookieCloud"));
        assert!(alert.message.contains("returned no cookie data"));
        assert!(alert.message.contains("fell back to static credentials"));
        assert_eq!(alert.suggestions.len(), 4);
        assert!(alert.suggestions[1].ends_with("duolainc.com"));
        assert!(alert.mention_all);
    }

    #[test]
    fn empty_source_map_is_empty_response() {
        let remote = RemoteSource::new(Arc::new(FixedSource(CookieMap::new())), ".x.com");
        assert!(matches!(remote.fetch(), Err(FetchError::EmptyResponse)));
    }

    #[test]
    fn missing_domain_lists_available_keys() {
        let map = CookieMap::from([
            ("b.com".to_string(), vec![CookieRecord::new("k", "v")]),
            ("a.com".to_string(), vec![CookieRecord::new("k", "v")]),
        ]);
        let remote = RemoteSource::new(Arc::new(FixedSource(map)), ".x.com");

        let err = remote.fetch().unwrap_err();
        assert_eq!(
            err.to_string(),
            "no cookies for domain '.x.com' (available: a.com, b.com)"
        );
    }

    #[test]
    fn domain_with_empty_record_list_counts_as_missing() {
        let map = CookieMap::from([("x.com".to_string(), Vec::new())]);
        let remote = RemoteSource::new(Arc::new(FixedSource(map)), ".x.com");
        assert!(matches!(remote.fetch(), Err(FetchError::DomainNotFound { .. })));
    }
}
