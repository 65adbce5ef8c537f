//! Cache configuration

use std::path::PathBuf;
use std::time::Duration;

/// Cache configuration options
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Whether caching is enabled (the full catalog is cached regardless)
    pub enabled: bool,

    /// Time-to-live for ordinary cache entries
    pub ttl: Duration,

    /// Cache directory path
    pub location: PathBuf,

    /// API base URL, used to synthesize `uri` fields in derived responses
    pub base_url: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: super::DEFAULT_CACHE_TTL,
            location: default_cache_dir(),
            base_url: super::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with custom settings
    ///
    /// An empty `location` selects the platform default directory.
    pub fn new(enabled: bool, ttl: Duration, location: PathBuf, base_url: &str) -> Self {
        let location = if location.as_os_str().is_empty() {
            default_cache_dir()
        } else {
            location
        };

        Self {
            enabled,
            ttl,
            location,
            base_url: base_url.to_string(),
        }
    }

    /// Create configuration from cache options on top of the defaults
    pub fn from_options(options: CacheOptions) -> Self {
        Self::default().apply(options)
    }

    /// Fold runtime overrides onto this configuration
    pub fn apply(mut self, options: CacheOptions) -> Self {
        if let Some(enabled) = options.enabled {
            self.enabled = enabled;
        }

        if let Some(ttl) = options.ttl {
            self.ttl = ttl;
        }

        if let Some(location) = options.location {
            if !location.as_os_str().is_empty() {
                self.location = location;
            }
        }

        if let Some(base_url) = options.base_url {
            self.base_url = base_url;
        }

        self
    }

    /// TTL applied to the full product catalog
    pub fn full_ttl(&self) -> Duration {
        super::FULL_CACHE_TTL
    }
}

/// Runtime cache options that can override configuration
///
/// These are typically set via CLI flags like --disable-cache or --cache-for.
#[derive(Debug, Clone, Default)]
pub struct CacheOptions {
    /// Override the enabled setting
    pub enabled: Option<bool>,

    /// Override the TTL setting
    pub ttl: Option<Duration>,

    /// Override the location setting
    pub location: Option<PathBuf>,

    /// Override the API base URL
    pub base_url: Option<String>,
}

impl CacheOptions {
    /// Create new cache options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the enabled flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the location
    pub fn with_location(mut self, location: PathBuf) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.to_string());
        self
    }
}

/// Platform default cache directory
///
/// `~/.cache/eol` on Linux, `~/Library/Caches/eol` on macOS and
/// `~/AppData/Local/eol-cache` on Windows. Without a home directory the
/// cache lives in `.eol-cache` under the working directory.
pub fn default_cache_dir() -> PathBuf {
    match dirs::home_dir() {
        None => PathBuf::from(".eol-cache"),
        Some(home) if cfg!(target_os = "windows") => {
            home.join("AppData").join("Local").join("eol-cache")
        }
        Some(home) if cfg!(target_os = "macos") => home.join("Library").join("Caches").join("eol"),
        Some(home) => home.join(".cache").join("eol"),
    }
}

/// Helper functions for directory resolution
pub(crate) mod dirs {
    use std::path::PathBuf;

    /// Get the home directory
    pub fn home_dir() -> Option<PathBuf> {
        if let Some(home) = std::env::var_os("HOME") {
            if !home.is_empty() {
                return Some(PathBuf::from(home));
            }
        }

        #[cfg(windows)]
        {
            if let Some(user_profile) = std::env::var_os("USERPROFILE") {
                return Some(PathBuf::from(user_profile));
            }
        }

        None
    }
}
