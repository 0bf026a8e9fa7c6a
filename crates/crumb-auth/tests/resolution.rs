//! End-to-end resolution scenarios against in-memory collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crumb_auth::{
    Alert, AuthError, CACHE_VERSION, CacheRecord, CookieMap, CookieRecord, CookieSource,
    CredentialCache, CredentialResolver, Credentials, FetchError, Notifier, RemoteSource,
    StaticCredentials,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_jwt_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"user_123","exp":{exp}}}"#));
    let signature = URL_SAFE_NO_PAD.encode("fake_sig");
    format!("{header}.{payload}.{signature}")
}

enum Reply {
    Cookies(CookieMap),
    Down,
}

struct ScriptedSource {
    reply: Reply,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CookieSource for ScriptedSource {
    fn name(&self) -> &str {
        "CookieCloud"
    }

    fn fetch_domain_cookies(&self, _target_domain: &str) -> Result<CookieMap, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Cookies(map) => Ok(map.clone()),
            Reply::Down => Err(FetchError::Unavailable("connection refused".into())),
        }
    }
}

#[derive(Default)]
struct RecordingNotifier {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingNotifier {
    fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().expect("lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, alert: &Alert) {
        self.alerts.lock().expect("lock").push(alert.clone());
    }
}

struct Harness {
    _tmp: TempDir,
    source: Arc<ScriptedSource>,
    notifier: Arc<RecordingNotifier>,
    resolver: CredentialResolver,
}

fn harness(reply: Reply, static_auth: StaticCredentials) -> Harness {
    let tmp = TempDir::new().expect("tmp dir");
    let cache = CredentialCache::new(tmp.path().join("data").join("cookie_cache.json"));
    let source = ScriptedSource::new(reply);
    let notifier = Arc::new(RecordingNotifier::default());

    let resolver = CredentialResolver::new(static_auth, cache)
        .with_remote(RemoteSource::new(source.clone(), ".duolainc.com"))
        .with_notifier(notifier.clone());

    Harness {
        _tmp: tmp,
        source,
        notifier,
        resolver,
    }
}

fn cookies_for(domain: &str, records: Vec<CookieRecord>) -> Reply {
    Reply::Cookies(CookieMap::from([(domain.to_string(), records)]))
}

fn valid_cached_record(now: DateTime<Utc>) -> CacheRecord {
    CacheRecord {
        version: CACHE_VERSION,
        created_at: DateTime::from_timestamp(now.timestamp(), 0).expect("ts"),
        expires_at: DateTime::from_timestamp(now.timestamp() + 3600, 0).expect("ts"),
        authorization: "cached-token".into(),
        cookie: "cached=1".into(),
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn cache_miss_fetches_remote_and_writes_cache() {
    let exp = Utc::now().timestamp() + 3600;
    let jwt = make_jwt_with_exp(exp);
    let h = harness(
        cookies_for(
            "duolainc.com",
            vec![
                CookieRecord::new("a", "1"),
                CookieRecord::new("b", "2"),
                CookieRecord::new("PROD_AUTH_TOKEN", jwt.clone()),
            ],
        ),
        StaticCredentials::default(),
    );

    let creds = h.resolver.get_auth().expect("remote credentials");
    assert_eq!(creds.authorization, jwt);
    assert_eq!(creds.cookie, format!("a=1; b=2; PROD_AUTH_TOKEN={jwt}"));
    assert_eq!(h.source.calls(), 1);
    assert!(h.notifier.alerts().is_empty());

    let cached = h.resolver.cache().load().expect("cache written");
    assert_eq!(cached.expires_at.timestamp(), exp);
    assert_eq!(cached.version, CACHE_VERSION);
    assert_eq!(cached.credentials(), creds);
}

#[test]
fn valid_cache_skips_remote() {
    let h = harness(Reply::Down, StaticCredentials::new("x", "y"));
    assert!(h.resolver.cache().save(&valid_cached_record(Utc::now())));

    let creds = h.resolver.get_auth().expect("cached credentials");
    assert_eq!(creds, Credentials::new("cached-token", "cached=1"));
    assert_eq!(h.source.calls(), 0);
    assert!(h.notifier.alerts().is_empty());
}

#[test]
fn cache_inside_refresh_buffer_triggers_fetch() {
    let now = Utc::now();
    let jwt = make_jwt_with_exp(now.timestamp() + 7200);
    let h = harness(
        cookies_for(".duolainc.com", vec![CookieRecord::new("PROD_AUTH_TOKEN", jwt.clone())]),
        StaticCredentials::default(),
    );
    let mut stale = valid_cached_record(now);
    stale.expires_at = now + TimeDelta::seconds(120);
    assert!(h.resolver.cache().save(&stale));

    let creds = h.resolver.get_auth().expect("fresh credentials");
    assert_eq!(creds.authorization, jwt);
    assert_eq!(h.source.calls(), 1);
}

#[test]
fn connectivity_failure_alerts_once_and_uses_static() {
    let h = harness(Reply::Down, StaticCredentials::new("x", "y"));

    let creds = h.resolver.get_auth().expect("static fallback");
    assert_eq!(creds, Credentials::new("x", "y"));

    let alerts = h.notifier.alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].message.contains("connection refused"));
    assert!(alerts[0].mention_all);
    assert!(!h.resolver.cache().path().exists());
}

#[test]
fn missing_auth_cookie_degrades_to_static() {
    let h = harness(
        cookies_for("duolainc.com", vec![CookieRecord::new("a", "1")]),
        StaticCredentials::new("x", "y"),
    );

    assert_eq!(h.resolver.get_auth().expect("static"), Credentials::new("x", "y"));
    let alerts = h.notifier.alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].message.contains("PROD_AUTH_TOKEN"));
}

#[test]
fn unknown_domain_alert_lists_available_domains() {
    let h = harness(
        cookies_for("example.org", vec![CookieRecord::new("a", "1")]),
        StaticCredentials::new("x", "y"),
    );

    assert_eq!(h.resolver.get_auth().expect("static"), Credentials::new("x", "y"));
    assert!(h.notifier.alerts()[0].message.contains("example.org"));
}

#[test]
fn remote_failure_with_incomplete_static_is_terminal() {
    let h = harness(Reply::Down, StaticCredentials::new("x", ""));

    let err = h.resolver.get_auth().unwrap_err();
    assert!(matches!(err, AuthError::StaticConfigIncomplete));
    assert_eq!(h.notifier.alerts().len(), 1);
}

#[test]
fn disabled_resolver_with_empty_static_fails() {
    let tmp = TempDir::new().expect("tmp dir");
    let resolver = CredentialResolver::new(
        StaticCredentials::new("", "cookie"),
        CredentialCache::new(tmp.path().join("cookie_cache.json")),
    );

    assert!(matches!(
        resolver.get_auth(),
        Err(AuthError::StaticConfigIncomplete)
    ));
}

#[test]
fn disabled_resolver_ignores_cache() {
    let tmp = TempDir::new().expect("tmp dir");
    let cache = CredentialCache::new(tmp.path().join("cookie_cache.json"));
    assert!(cache.save(&valid_cached_record(Utc::now())));

    let resolver = CredentialResolver::new(StaticCredentials::new("x", "y"), cache);
    assert_eq!(resolver.get_auth().expect("static"), Credentials::new("x", "y"));
}

#[test]
fn forced_refresh_refetches_despite_valid_cache() {
    let jwt = make_jwt_with_exp(Utc::now().timestamp() + 3600);
    let h = harness(
        cookies_for("duolainc.com", vec![CookieRecord::new("PROD_AUTH_TOKEN", jwt.clone())]),
        StaticCredentials::default(),
    );
    assert!(h.resolver.cache().save(&valid_cached_record(Utc::now())));

    let unforced = h.resolver.refresh(false).expect("cached");
    assert_eq!(unforced.authorization, "cached-token");
    assert_eq!(h.source.calls(), 0);

    let forced = h.resolver.refresh(true).expect("remote");
    assert_eq!(forced.authorization, jwt);
    assert_eq!(h.source.calls(), 1);
}

#[test]
fn second_resolution_is_served_from_cache() {
    let jwt = make_jwt_with_exp(Utc::now().timestamp() + 3600);
    let h = harness(
        cookies_for("duolainc.com", vec![CookieRecord::new("PROD_AUTH_TOKEN", jwt)]),
        StaticCredentials::default(),
    );

    let first = h.resolver.get_auth().expect("remote");
    let second = h.resolver.get_auth().expect("cached");
    assert_eq!(first, second);
    assert_eq!(h.source.calls(), 1);
}

#[test]
fn corrupt_cache_falls_through_to_remote() {
    let jwt = make_jwt_with_exp(Utc::now().timestamp() + 3600);
    let h = harness(
        cookies_for("duolainc.com", vec![CookieRecord::new("PROD_AUTH_TOKEN", jwt.clone())]),
        StaticCredentials::default(),
    );
    let path = h.resolver.cache().path().to_path_buf();
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&path, "garbage").expect("write");

    assert_eq!(h.resolver.get_auth().expect("remote").authorization, jwt);
    assert!(h.resolver.cache().load().is_some());
}

#[test]
fn invalidate_removes_cached_record() {
    let h = harness(Reply::Down, StaticCredentials::new("x", "y"));
    assert!(h.resolver.cache().save(&valid_cached_record(Utc::now())));

    assert!(h.resolver.invalidate());
    assert!(h.resolver.cache().load().is_none());
    assert!(h.resolver.invalidate());
}
