//! Credential cache location.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CACHE_PATH: &str = "./data/cookie_cache.json";

fn default_path() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_PATH)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Cache file; the parent directory is created on first save.
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}
