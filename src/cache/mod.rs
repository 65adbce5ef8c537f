//! Response caching module
//!
//! Stores full API responses on disk, one file per endpoint + parameters,
//! and answers narrower requests out of broader cached responses (a single
//! product out of the full catalog, a release out of its product, ...)
//! before conceding a miss.

mod config;
pub mod extract;
mod manager;
mod stats;
mod storage;
pub mod strategy;

pub use config::{default_cache_dir, CacheConfig, CacheOptions};
pub use manager::CacheManager;
pub use stats::CacheStats;
pub use storage::{generate_cache_key, CacheEntry, CacheStorage};
pub use strategy::{build_strategies, Candidate, EndpointShape, Extractor};

pub(crate) use config::dirs;

use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Default cache TTL (1 hour)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// TTL for the full product catalog (24 hours)
pub const FULL_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://endoflife.date/api/v1";

/// Endpoint of the full product catalog
pub const FULL_CATALOG_ENDPOINT: &str = "/products/full";

/// Extension of every cache entry file
pub const CACHE_FILE_EXT: &str = ".eol_cache.json";

/// Directory names `clear` is willing to empty
pub const ALLOWED_CACHE_DIR_NAMES: [&str; 3] = [".eol-cache", "eol-cache", "eol"];

/// Cache result indicating whether the value was retrieved from cache
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult {
    /// Value was retrieved from cache, directly or by extraction
    Hit(Value),
    /// No candidate was present, unexpired and extractable
    Miss,
    /// Cache was bypassed (e.g., --disable-cache)
    Bypassed,
}

impl CacheResult {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheResult::Hit(_))
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, CacheResult::Miss)
    }

    pub fn is_bypassed(&self) -> bool {
        matches!(self, CacheResult::Bypassed)
    }

    /// The payload on a hit
    pub fn into_hit(self) -> Option<Value> {
        match self {
            CacheResult::Hit(value) => Some(value),
            _ => None,
        }
    }
}

/// Main cache interface for the API client
pub trait Cache: Send + Sync {
    /// Look up a response
    ///
    /// Tries the exact entry first, then broader cached responses the
    /// answer can be extracted from. Corrupt and expired entries count as
    /// absent.
    fn get(&self, endpoint: &str, params: &[&str]) -> CacheResult;

    /// Store a response under its own key
    ///
    /// A no-op when caching is disabled, except for the full catalog.
    fn put(&self, endpoint: &str, params: &[&str], payload: &Value) -> Result<()>;

    /// Whether the endpoint is cached even when caching is disabled
    fn must_use_cache(&self, endpoint: &str) -> bool;

    /// Remove every cache entry, returning how many were removed
    fn clear(&self) -> Result<usize>;

    /// Remove expired cache entries, returning how many were removed
    fn clear_expired(&self) -> Result<usize>;

    /// Get cache statistics
    fn stats(&self) -> Result<CacheStats>;

    /// Check if caching is enabled
    fn is_enabled(&self) -> bool;
}

/// Create a new cache instance with the given configuration
pub fn create_cache(config: CacheConfig) -> Arc<dyn Cache> {
    Arc::new(CacheManager::new(config))
}
