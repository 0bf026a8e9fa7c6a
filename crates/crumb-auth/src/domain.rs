//! Domain lookup over a source's cookie map.

use crate::source::{CookieMap, CookieRecord};

/// Locate the cookies stored for `target_domain`.
///
/// An exact key wins; otherwise the leading-dot variant is tried once
/// (`.example.com` <-> `example.com`). Returns an empty slice when neither exists.
#[must_use]
pub fn find<'a>(records_by_domain: &'a CookieMap, target_domain: &str) -> &'a [CookieRecord] {
    if let Some(records) = records_by_domain.get(target_domain) {
        tracing::debug!(domain = target_domain, "exact cookie domain match");
        return records;
    }

    let variant = target_domain
        .strip_prefix('.')
        .map_or_else(|| format!(".{target_domain}"), str::to_string);

    if let Some(records) = records_by_domain.get(&variant) {
        tracing::debug!(domain = %variant, target = target_domain, "leading-dot cookie domain match");
        return records;
    }

    &[]
}

/// Domain keys of a cookie map, sorted, for error messages.
#[must_use]
pub fn available_domains(records_by_domain: &CookieMap) -> Vec<String> {
    let mut domains: Vec<String> = records_by_domain.keys().cloned().collect();
    domains.sort();
    domains
}
