use crumb_config::CrumbConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &CrumbConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &CrumbConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.cookiecloud.enabled && has_single_underscore_key(&env_keys, "CRUMB_COOKIECLOUD") {
        warnings.push(
            "CookieCloud config appears default while CRUMB_COOKIECLOUD_* env vars exist. Use double underscores (example: CRUMB_COOKIECLOUD__ENABLED)."
                .to_string(),
        );
    }

    if !config.auth.is_configured() && has_single_underscore_key(&env_keys, "CRUMB_AUTH") {
        warnings.push(
            "Static auth config appears default while CRUMB_AUTH_* env vars exist. Use double underscores (example: CRUMB_AUTH__COOKIE)."
                .to_string(),
        );
    }

    if !config.notify.is_configured() && has_single_underscore_key(&env_keys, "CRUMB_NOTIFY") {
        warnings.push(
            "Notify config appears default while CRUMB_NOTIFY_* env vars exist. Use double underscores (example: CRUMB_NOTIFY__WEBHOOK_URL)."
                .to_string(),
        );
    }

    warnings
}

/// `CRUMB_AUTH_COOKIE` matches, `CRUMB_AUTH__COOKIE` does not.
fn has_single_underscore_key(keys: &[String], section: &str) -> bool {
    keys.iter().any(|key| {
        key.strip_prefix(section)
            .is_some_and(|rest| rest.starts_with('_') && !rest.starts_with("__"))
    })
}
