use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Decode the `exp` claim of a three-part bearer token.
///
/// The signature is NOT verified; this only answers "when does the server stop
/// accepting this token". Every structural failure yields `None`, and callers must
/// not cache a token whose expiry is unknown. A zero or negative `exp` counts as
/// unknown.
#[must_use]
pub fn extract_expiry(token: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        tracing::warn!(parts = parts.len(), "bearer token is not a three-part JWT");
        return None;
    }

    let payload = decode_segment(parts[1])?;
    let claims: Value = match serde_json::from_slice(&payload) {
        Ok(claims) => claims,
        Err(error) => {
            tracing::warn!(%error, "JWT payload is not JSON");
            return None;
        }
    };

    let Some(exp) = claims.get("exp").and_then(exp_seconds) else {
        tracing::warn!("JWT payload has no usable exp claim");
        return None;
    };
    tracing::debug!(exp, "decoded JWT exp");

    DateTime::from_timestamp(exp, 0)
}

/// Base64-decode a JWT segment after restoring its `=` padding.
///
/// JWTs use the URL-safe alphabet; the standard alphabet is tried first so tokens
/// minted by tools that ignore the JWT convention still decode.
fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let padding = (4 - segment.len() % 4) % 4;
    let padded = format!("{segment}{}", "=".repeat(padding));

    match STANDARD.decode(&padded).or_else(|_| URL_SAFE.decode(&padded)) {
        Ok(bytes) => Some(bytes),
        Err(error) => {
            tracing::warn!(%error, "JWT payload is not valid base64");
            None
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn exp_seconds(value: &Value) -> Option<i64> {
    let seconds = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    (seconds > 0).then_some(seconds)
}
