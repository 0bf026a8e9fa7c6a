//! Turn a domain's cookie set into request credentials.

use crate::credentials::ParsedAuth;
use crate::error::FetchError;
use crate::expiry::extract_expiry;
use crate::source::CookieRecord;

/// Cookie holding the bearer token unless configured otherwise.
pub const DEFAULT_AUTH_COOKIE: &str = "PROD_AUTH_TOKEN";

/// Build the cookie header and pull the bearer token out of `records`.
///
/// Records with an empty name or value are dropped. The rest are joined as
/// `name=value` with `"; "` in input order. If the auth cookie appears more than once,
/// the last non-empty occurrence wins.
///
/// # Errors
///
/// Returns `FetchError::MissingAuthToken` if no non-empty `auth_cookie_name` record
/// exists, and `FetchError::UnparseableExpiry` if its value carries no usable `exp`.
pub fn parse(records: &[CookieRecord], auth_cookie_name: &str) -> Result<ParsedAuth, FetchError> {
    let mut parts = Vec::with_capacity(records.len());
    let mut authorization: Option<&str> = None;

    for record in records {
        if record.name.is_empty() || record.value.is_empty() {
            continue;
        }
        parts.push(format!("{}={}", record.name, record.value));
        if record.name == auth_cookie_name {
            authorization = Some(record.value.as_str());
        }
    }

    let Some(authorization) = authorization else {
        return Err(FetchError::MissingAuthToken {
            name: auth_cookie_name.to_string(),
        });
    };

    let Some(expires_at) = extract_expiry(authorization) else {
        return Err(FetchError::UnparseableExpiry {
            name: auth_cookie_name.to_string(),
        });
    };

    let cookie_string = parts.join("; ");
    tracing::info!(
        cookie = auth_cookie_name,
        expires_at = %expires_at,
        cookie_len = cookie_string.len(),
        "parsed auth cookie"
    );

    Ok(ParsedAuth {
        authorization: authorization.to_string(),
        cookie_string,
        expires_at,
    })
}
