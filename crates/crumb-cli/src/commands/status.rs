use chrono::{DateTime, Utc};
use crumb_auth::ResolverMode;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Resolver and cache state. Never carries token or cookie values.
#[derive(Debug, Serialize)]
struct StatusResponse {
    mode: &'static str,
    target_domain: Option<String>,
    cookiecloud_configured: bool,
    cookiecloud_missing: Vec<&'static str>,
    static_configured: bool,
    notify_configured: bool,
    cache_path: String,
    cache_present: bool,
    cache_valid: bool,
    created_at: Option<String>,
    expires_at: Option<String>,
    remaining_secs: Option<i64>,
}

pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&collect(ctx, Utc::now()), flags.format)
}

fn collect(ctx: &AppContext, now: DateTime<Utc>) -> StatusResponse {
    let resolver = &ctx.resolver;
    let config = &ctx.config;
    let cached = resolver.cache().load();
    let enabled = resolver.mode() == ResolverMode::Enabled;

    StatusResponse {
        mode: match resolver.mode() {
            ResolverMode::Disabled => "disabled",
            ResolverMode::Enabled => "enabled",
        },
        target_domain: enabled.then(|| config.cookiecloud.target_domain.clone()),
        cookiecloud_configured: config.cookiecloud.is_configured(),
        cookiecloud_missing: if enabled {
            config.cookiecloud.missing_fields()
        } else {
            Vec::new()
        },
        static_configured: resolver.static_credentials().is_complete(),
        notify_configured: config.notify.is_configured(),
        cache_path: resolver.cache().path().display().to_string(),
        cache_present: cached.is_some(),
        cache_valid: cached
            .as_ref()
            .is_some_and(|record| resolver.cache().is_valid_at(record, now)),
        created_at: cached.as_ref().map(|record| record.created_at.to_rfc3339()),
        expires_at: cached.as_ref().map(|record| record.expires_at.to_rfc3339()),
        remaining_secs: cached
            .as_ref()
            .map(|record| (record.expires_at - now).num_seconds()),
    }
}
