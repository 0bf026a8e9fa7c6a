//! File-backed credential cache.
//!
//! One JSON record per file. Every failure degrades: `load` yields `None`,
//! `save`/`invalidate` yield `false`, and the cause goes to the log.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::credentials::{Credentials, ParsedAuth};
use crate::error::CacheError;

/// Record layout understood by this build. Other versions are ignored.
pub const CACHE_VERSION: u32 = 1;

/// A cached token is refreshed this long before it actually expires.
pub const REFRESH_BUFFER_SECS: i64 = 300;

/// A cached set of credentials with its provenance timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub authorization: String,
    pub cookie: String,
}

impl CacheRecord {
    /// A current-version record for freshly fetched credentials.
    ///
    /// `created_at` is truncated to the microsecond precision the file stores.
    #[must_use]
    pub fn from_parsed(parsed: &ParsedAuth, created_at: DateTime<Utc>) -> Self {
        Self {
            version: CACHE_VERSION,
            created_at: created_at.trunc_subsecs(6),
            expires_at: parsed.expires_at,
            authorization: parsed.authorization.clone(),
            cookie: parsed.cookie_string.clone(),
        }
    }

    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.authorization, &self.cookie)
    }

    /// Instant after which the record is no longer served.
    #[must_use]
    pub fn refresh_at(&self) -> DateTime<Utc> {
        self.expires_at - TimeDelta::seconds(REFRESH_BUFFER_SECS)
    }
}

/// On-disk shape. Field names are kept stable for existing cache files.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    version: u32,
    /// Seconds since epoch, fractional.
    created_at: f64,
    #[serde(alias = "expires_at")]
    jwt_exp: i64,
    authorization: String,
    cookie_string: String,
}

impl StoredRecord {
    #[allow(clippy::cast_precision_loss)]
    fn from_record(record: &CacheRecord) -> Self {
        Self {
            version: record.version,
            created_at: record.created_at.timestamp_micros() as f64 / 1_000_000.0,
            jwt_exp: record.expires_at.timestamp(),
            authorization: record.authorization.clone(),
            cookie_string: record.cookie.clone(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn into_record(self) -> Result<CacheRecord, CacheError> {
        let created_micros = (self.created_at * 1_000_000.0).round();
        let created_at = DateTime::from_timestamp_micros(created_micros as i64)
            .filter(|_| self.created_at.is_finite())
            .ok_or_else(|| CacheError::Timestamp(format!("created_at {}", self.created_at)))?;
        let expires_at = DateTime::from_timestamp(self.jwt_exp, 0)
            .ok_or_else(|| CacheError::Timestamp(format!("jwt_exp {}", self.jwt_exp)))?;

        Ok(CacheRecord {
            version: self.version,
            created_at,
            expires_at,
            authorization: self.authorization,
            cookie: self.cookie_string,
        })
    }
}

/// Owner of the cache file at a fixed path.
#[derive(Debug, Clone)]
pub struct CredentialCache {
    path: PathBuf,
}

impl CredentialCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached record. Missing, corrupt, incomplete or foreign-version
    /// files all yield `None`.
    #[must_use]
    pub fn load(&self) -> Option<CacheRecord> {
        match self.read_record() {
            Ok(record) => record,
            Err(CacheError::Io(error)) => {
                tracing::error!(path = %self.path.display(), %error, "failed to read credential cache");
                None
            }
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "ignoring credential cache");
                None
            }
        }
    }

    /// Persist `record`, replacing any previous file in one rename.
    ///
    /// Returns `false` (and logs) on any I/O failure.
    pub fn save(&self, record: &CacheRecord) -> bool {
        match self.write_record(record) {
            Ok(()) => {
                tracing::info!(
                    path = %self.path.display(),
                    expires_at = %record.expires_at,
                    "credential cache saved"
                );
                true
            }
            Err(error) => {
                tracing::error!(path = %self.path.display(), %error, "failed to save credential cache");
                false
            }
        }
    }

    /// Whether `record` may still be served right now.
    #[must_use]
    pub fn is_valid(&self, record: &CacheRecord) -> bool {
        self.is_valid_at(record, Utc::now())
    }

    /// Whether `record` may still be served at `now`: true iff
    /// `now <= expires_at - REFRESH_BUFFER_SECS`.
    #[must_use]
    pub fn is_valid_at(&self, record: &CacheRecord, now: DateTime<Utc>) -> bool {
        let refresh_at = record.refresh_at();
        if now > refresh_at {
            let remaining = (record.expires_at - now).num_seconds();
            tracing::info!(remaining_secs = remaining, "cached credentials expired or expiring soon");
            return false;
        }

        tracing::debug!(
            refresh_in_secs = (refresh_at - now).num_seconds(),
            "cached credentials valid"
        );
        true
    }

    /// Delete the cache file. An already-absent file counts as success.
    pub fn invalidate(&self) -> bool {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "credential cache cleared");
                true
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => true,
            Err(error) => {
                tracing::error!(path = %self.path.display(), %error, "failed to clear credential cache");
                false
            }
        }
    }

    fn read_record(&self) -> Result<Option<CacheRecord>, CacheError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no credential cache file");
                return Ok(None);
            }
            Err(error) => return Err(error.into()),
        };

        let mut value: serde_json::Value = serde_json::from_slice(&bytes)?;
        let found = value.get("version").and_then(version_number);
        if found != Some(u64::from(CACHE_VERSION)) {
            return Err(CacheError::VersionMismatch {
                found,
                expected: CACHE_VERSION,
            });
        }
        // Normalise `1.0` so the integer field deserializes.
        value["version"] = serde_json::Value::from(CACHE_VERSION);

        let stored: StoredRecord = serde_json::from_value(value)?;
        stored.into_record().map(Some)
    }

    fn write_record(&self, record: &CacheRecord) -> Result<(), CacheError> {
        let payload = serde_json::to_vec_pretty(&StoredRecord::from_record(record))?;

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        // A fresh temp file per save, so concurrent writers never share an inode.
        // Dropping it on any error removes it.
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(&payload)?;
        temp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o600))?;
        }

        temp.persist(&self.path).map_err(|error| error.error)?;
        Ok(())
    }
}

/// Accept `1` and integral floats such as `1.0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn version_number(value: &serde_json::Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}
