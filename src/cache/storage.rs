//! Cache storage implementation
//!
//! One JSON file per entry. Absent, corrupt and expired entries all read as
//! `None`, so every failure on the read side degrades to a network fetch.

use super::CACHE_FILE_EXT;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Cache entry containing the response payload and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// When the payload was cached
    pub timestamp: DateTime<Utc>,

    /// When the cache entry expires
    pub expires_at: DateTime<Utc>,

    /// Logical request path (e.g. `/products/go`)
    pub endpoint: String,

    /// Request parameters joined with `|`
    pub parameters: String,

    /// The cached response payload
    pub data: Value,
}

impl CacheEntry {
    /// Create a new cache entry stamped with the current time
    pub fn new(endpoint: &str, params: &[&str], data: Value, ttl: Duration) -> Self {
        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            timestamp: now,
            expires_at,
            endpoint: endpoint.to_string(),
            parameters: params.join("|"),
            data,
        }
    }

    /// Check if the cache entry is expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check expiry against a fixed instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Generate the cache file name for an endpoint and its parameters
///
/// `/products/go` with `["go"]` becomes `products-go-<hash>.eol_cache.json`,
/// where `<hash>` is the first 8 hex digits of the SHA-256 of the
/// pipe-joined parameters. The root endpoint maps to `index`.
pub fn generate_cache_key(endpoint: &str, params: &[&str]) -> String {
    let trimmed = endpoint.strip_prefix('/').unwrap_or(endpoint);
    let mut name = trimmed.replace('/', "-");
    if name.is_empty() {
        name = "index".to_string();
    }

    if params.is_empty() {
        return format!("{}{}", name, CACHE_FILE_EXT);
    }

    let digest = Sha256::digest(params.join("|").as_bytes());
    let hash = format!("{:x}", digest);

    format!("{}-{}{}", name, &hash[..8], CACHE_FILE_EXT)
}

/// Filesystem-based cache storage
#[derive(Debug, Clone)]
pub struct CacheStorage {
    cache_dir: PathBuf,
}

impl CacheStorage {
    /// Create a new cache storage instance
    ///
    /// The directory is created lazily on the first write.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Cache directory
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the full path for a cache entry
    pub fn cache_path(&self, endpoint: &str, params: &[&str]) -> PathBuf {
        self.cache_dir.join(generate_cache_key(endpoint, params))
    }

    /// Ensure the cache directory exists
    pub fn ensure_dir(&self) -> Result<()> {
        if !self.cache_dir.exists() {
            fs::create_dir_all(&self.cache_dir).with_context(|| {
                format!("Failed to create cache directory: {:?}", self.cache_dir)
            })?;
            debug!("Created cache directory: {:?}", self.cache_dir);
        }
        Ok(())
    }

    /// Write a payload under the key for `endpoint` + `params`
    pub fn write<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &[&str],
        payload: &T,
        ttl: Duration,
    ) -> Result<()> {
        self.ensure_dir()?;

        let data = serde_json::to_value(payload)
            .with_context(|| format!("Failed to serialize payload for {}", endpoint))?;
        let entry = CacheEntry::new(endpoint, params, data, ttl);

        let json = serde_json::to_vec_pretty(&entry)
            .with_context(|| format!("Failed to serialize cache entry for {}", endpoint))?;

        let path = self.cache_path(endpoint, params);
        fs::write(&path, json)
            .with_context(|| format!("Failed to write cache file: {:?}", path))?;

        debug!("Saved cache entry: {:?}", path);
        Ok(())
    }

    /// Read a live payload, deleting the file if it has expired
    pub fn read(&self, endpoint: &str, params: &[&str]) -> Option<Value> {
        let path = self.cache_path(endpoint, params);
        if !path.exists() {
            return None;
        }

        let entry = match load_entry(&path) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Ignoring unreadable cache entry: {:#}", e);
                return None;
            }
        };

        if entry.is_expired() {
            debug!("Cache entry expired: {:?}", path);
            let _ = fs::remove_file(&path);
            return None;
        }

        Some(entry.data)
    }

    /// List every cache entry file in the directory
    ///
    /// A missing directory has no entries.
    pub fn entry_files(&self) -> Result<Vec<PathBuf>> {
        if !self.cache_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.cache_dir)
            .with_context(|| format!("Failed to read cache directory: {:?}", self.cache_dir))?;

        let mut files = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_entry = path
                .file_name()
                .and_then(|s| s.to_str())
                .is_some_and(|name| name.ends_with(CACHE_FILE_EXT));

            if is_entry && path.is_file() {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Load a cache entry from disk
pub fn load_entry(path: &Path) -> Result<CacheEntry> {
    let content =
        fs::read(path).with_context(|| format!("Failed to open cache file: {:?}", path))?;

    serde_json::from_slice(&content)
        .with_context(|| format!("Failed to parse cache file: {:?}", path))
}
