use std::sync::Arc;

use anyhow::Context;
use crumb_auth::{CredentialCache, CredentialResolver, RemoteSource, StaticCredentials};
use crumb_config::CrumbConfig;
use crumb_cookiecloud::{ClientOptions, CookieCloudClient};
use crumb_notify::WebhookNotifier;

use crate::cli::GlobalFlags;

/// Load configuration, honouring `--config` when given.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<CrumbConfig> {
    match &flags.config {
        Some(path) => {
            let _ = dotenvy::dotenv();
            CrumbConfig::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))
        }
        None => CrumbConfig::load_with_dotenv().context("failed to load crumb configuration"),
    }
}

/// Everything a command handler needs, built once per invocation.
pub struct AppContext {
    pub config: CrumbConfig,
    pub resolver: CredentialResolver,
}

impl AppContext {
    pub fn init(config: CrumbConfig) -> anyhow::Result<Self> {
        let resolver = build_resolver(&config)?;
        Ok(Self { config, resolver })
    }
}

fn build_resolver(config: &CrumbConfig) -> anyhow::Result<CredentialResolver> {
    let static_auth = StaticCredentials::new(&config.auth.authorization, &config.auth.cookie);
    let cache = CredentialCache::new(config.cache.path.clone());
    let mut resolver = CredentialResolver::new(static_auth, cache);

    if config.notify.is_configured() {
        let notifier = WebhookNotifier::new(config.notify.webhook_url.as_str())
            .context("failed to build alert webhook client")?;
        resolver = resolver.with_notifier(Arc::new(notifier));
    }

    let cookiecloud = &config.cookiecloud;
    if !cookiecloud.enabled {
        tracing::debug!("CookieCloud disabled; static credentials only");
        return Ok(resolver);
    }

    if let Err(error) = config.require_cookiecloud() {
        tracing::warn!(%error, "CookieCloud enabled but incomplete; remote fetches will fail");
    }

    let client = CookieCloudClient::with_options(
        &cookiecloud.url,
        &cookiecloud.uuid,
        &cookiecloud.password,
        ClientOptions {
            timeout: cookiecloud.timeout(),
            accept_invalid_certs: cookiecloud.accept_invalid_certs,
        },
    )
    .context("failed to build CookieCloud client")?;

    let remote = RemoteSource::new(Arc::new(client), cookiecloud.target_domain.as_str())
        .with_auth_cookie_name(cookiecloud.auth_cookie_name.as_str());
    Ok(resolver.with_remote(remote))
}
