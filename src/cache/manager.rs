//! Cache manager: gating, TTL policy, fallback lookups and maintenance

use super::config::CacheConfig;
use super::stats::CacheStats;
use super::storage::{load_entry, CacheStorage};
use super::strategy::{build_strategies, EndpointShape, Extractor};
use super::{Cache, CacheResult, ALLOWED_CACHE_DIR_NAMES};
use crate::config::format_duration;
use crate::error::EolError;
use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Disk cache with hierarchical fallback lookups
#[derive(Debug, Clone)]
pub struct CacheManager {
    config: CacheConfig,
    storage: CacheStorage,
}

impl CacheManager {
    /// Create a new cache manager
    pub fn new(config: CacheConfig) -> Self {
        let storage = CacheStorage::new(config.location.clone());
        Self { config, storage }
    }

    /// Cache directory
    pub fn dir(&self) -> &Path {
        self.storage.dir()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Disabled caching skips everything but the always-cached class
    fn bypasses(&self, endpoint: &str) -> bool {
        !self.config.enabled && !self.must_use_cache(endpoint)
    }

    fn ttl_for(&self, endpoint: &str) -> Duration {
        if self.must_use_cache(endpoint) {
            self.config.full_ttl()
        } else {
            self.config.ttl
        }
    }
}

impl Cache for CacheManager {
    fn get(&self, endpoint: &str, params: &[&str]) -> CacheResult {
        if self.bypasses(endpoint) {
            debug!("Cache is disabled, bypassing {}", endpoint);
            return CacheResult::Bypassed;
        }

        for candidate in build_strategies(endpoint, params) {
            let Some(payload) = self.storage.read(&candidate.endpoint, &candidate.param_refs())
            else {
                continue;
            };

            match candidate.extractor.apply(&payload, &self.config.base_url) {
                Some(value) => {
                    if candidate.extractor == Extractor::Identity {
                        debug!("Cache hit: {}", endpoint);
                    } else {
                        info!(
                            "Cache hit: {} derived from cached {}",
                            endpoint, candidate.endpoint
                        );
                    }
                    return CacheResult::Hit(value);
                }
                None => {
                    debug!(
                        "Cached {} has no data for {}",
                        candidate.endpoint, endpoint
                    );
                }
            }
        }

        debug!("Cache miss: {}", endpoint);
        CacheResult::Miss
    }

    fn put(&self, endpoint: &str, params: &[&str], payload: &Value) -> Result<()> {
        if self.bypasses(endpoint) {
            return Ok(());
        }

        let ttl = self.ttl_for(endpoint);
        self.storage.write(endpoint, params, payload, ttl)?;
        debug!("Cached {} for {}", endpoint, format_duration(ttl));

        Ok(())
    }

    fn must_use_cache(&self, endpoint: &str) -> bool {
        EndpointShape::parse(endpoint).is_full_catalog()
    }

    fn clear(&self) -> Result<usize> {
        let dir = self.storage.dir();
        let name = dir.file_name().and_then(|s| s.to_str()).unwrap_or("");

        if !ALLOWED_CACHE_DIR_NAMES.contains(&name) {
            return Err(EolError::RefusingToClear {
                dir: dir.to_path_buf(),
            }
            .into());
        }

        let files = self.storage.entry_files()?;
        for path in &files {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove cache file: {:?}", path))?;
        }

        info!("Cleared {} cache entries from {:?}", files.len(), dir);
        Ok(files.len())
    }

    fn clear_expired(&self) -> Result<usize> {
        let now = Utc::now();
        let mut removed = 0;

        for path in self.storage.entry_files()? {
            let Ok(entry) = load_entry(&path) else {
                continue;
            };

            if entry.is_expired_at(now) && fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }

        info!("Removed {} expired cache entries", removed);
        Ok(removed)
    }

    fn stats(&self) -> Result<CacheStats> {
        let now = Utc::now();
        let mut stats = CacheStats {
            cache_dir: self.storage.dir().display().to_string(),
            enabled: self.config.enabled,
            default_ttl: format_duration(self.config.ttl),
            full_ttl: format_duration(self.config.full_ttl()),
            ..Default::default()
        };

        for path in self.storage.entry_files()? {
            stats.total_files += 1;
            if let Ok(metadata) = fs::metadata(&path) {
                stats.total_size += metadata.len();
            }

            match load_entry(&path) {
                Ok(entry) if entry.is_expired_at(now) => stats.expired_files += 1,
                Ok(_) => stats.valid_files += 1,
                Err(_) => {}
            }
        }

        Ok(stats)
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}
