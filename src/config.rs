//! Application configuration
//!
//! Defaults, then an optional TOML file (`EOL_CONFIG` or
//! `<config dir>/config.toml`), then runtime overrides from the command line.

use crate::cache::{dirs, CacheConfig, CacheOptions};
use crate::error::EolError;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV: &str = "EOL_CONFIG";

/// Resolved application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// API base URL
    pub base_url: String,

    /// Cache settings
    pub cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        let cache = CacheConfig::default();
        Self {
            base_url: cache.base_url.clone(),
            cache,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    #[serde(default)]
    cache: FileCacheSection,
}

#[derive(Debug, Default, Deserialize)]
struct FileCacheSection {
    enabled: Option<bool>,
    ttl: Option<String>,
    dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `EOL_CONFIG` or the platform config file
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => config_dir().join("config.toml"),
        };

        Self::load_from(&path)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::parse(&contents).with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Parse configuration from TOML text on top of the defaults
    pub fn parse(contents: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(contents)?;

        let mut options = CacheOptions::new();
        if let Some(enabled) = file.cache.enabled {
            options = options.with_enabled(enabled);
        }
        if let Some(ttl) = file.cache.ttl {
            options = options.with_ttl(parse_duration(&ttl)?);
        }
        if let Some(dir) = file.cache.dir {
            options = options.with_location(dir);
        }
        if let Some(base_url) = file.base_url {
            options = options.with_base_url(&base_url);
        }

        Ok(Self::default().apply(options))
    }

    /// Fold runtime overrides onto this configuration
    pub fn apply(mut self, options: CacheOptions) -> Self {
        if let Some(base_url) = &options.base_url {
            self.base_url = base_url.clone();
        }
        self.cache = self.cache.apply(options);
        self
    }
}

/// Platform configuration directory
///
/// `~/.config/eol` on Linux, `~/Library/Application Support/eol` on macOS and
/// `~/AppData/Local/eol` on Windows.
pub fn config_dir() -> PathBuf {
    match dirs::home_dir() {
        None => PathBuf::from(".eol"),
        Some(home) if cfg!(target_os = "windows") => home.join("AppData").join("Local").join("eol"),
        Some(home) if cfg!(target_os = "macos") => {
            home.join("Library").join("Application Support").join("eol")
        }
        Some(home) => home.join(".config").join("eol"),
    }
}

fn go_duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:\d+(?:\.\d+)?(?:ns|us|µs|ms|s|m|h))+$").expect("valid duration regex")
    })
}

fn go_term_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d+(?:\.\d+)?)(ns|us|µs|ms|s|m|h)").expect("valid duration term regex")
    })
}

fn long_duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)(d|wk|mo)$").expect("valid long duration regex"))
}

/// Parse a duration such as `90s`, `1h30m`, `500ms`, `2d`, `1wk` or `3mo`
pub fn parse_duration(input: &str) -> crate::error::Result<Duration> {
    let s = input.trim();
    let invalid = || EolError::InvalidDuration(input.to_string());

    if let Some(caps) = long_duration_re().captures(s) {
        let n: u64 = caps[1].parse().map_err(|_| invalid())?;
        let day = 24 * 60 * 60;
        let unit = match &caps[2] {
            "d" => day,
            "wk" => 7 * day,
            _ => 30 * day,
        };
        return n
            .checked_mul(unit)
            .map(Duration::from_secs)
            .ok_or_else(invalid);
    }

    if s == "0" {
        return Ok(Duration::ZERO);
    }

    if !go_duration_re().is_match(s) {
        return Err(invalid());
    }

    let mut total = 0f64;
    for caps in go_term_re().captures_iter(s) {
        let value: f64 = caps[1].parse().map_err(|_| invalid())?;
        let seconds = match &caps[2] {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            _ => 3600.0,
        };
        total += value * seconds;
    }

    Duration::try_from_secs_f64(total).map_err(|_| invalid())
}

/// Format a duration compactly (`1h`, `1h30m`, `45s`, `500ms`)
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if duration.is_zero() {
        return "0s".to_string();
    }
    if secs == 0 && millis == 0 {
        return format!("{}ns", duration.subsec_nanos());
    }

    let hours = secs / 3600;
    let minutes = secs % 3600 / 60;
    let seconds = secs % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    if seconds > 0 {
        out.push_str(&format!("{}s", seconds));
    }
    if millis > 0 {
        out.push_str(&format!("{}ms", millis));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_go_durations() {
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("30m").unwrap(), Duration::from_secs(1800));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration(" 2h ").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_long_units() {
        assert_eq!(parse_duration("2d").unwrap(), Duration::from_secs(2 * 86400));
        assert_eq!(parse_duration("1wk").unwrap(), Duration::from_secs(7 * 86400));
        assert_eq!(parse_duration("3mo").unwrap(), Duration::from_secs(90 * 86400));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "h", "10", "1x", "1d2h", "-1h", "1h 30m", "abc"] {
            let err = parse_duration(input).unwrap_err();
            assert!(matches!(err, EolError::InvalidDuration(_)), "{}", input);
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h");
        assert_eq!(format_duration(Duration::from_secs(24 * 3600)), "24h");
        assert_eq!(format_duration(Duration::from_secs(5400)), "1h30m");
        assert_eq!(format_duration(Duration::from_secs(45)), "45s");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1s500ms");
        assert_eq!(format_duration(Duration::ZERO), "0s");
    }

    #[test]
    fn test_parse_file_contents() {
        let config = Config::parse(
            r#"
base_url = "http://localhost:9000/api"

[cache]
enabled = false
ttl = "2h"
dir = "/tmp/somewhere/eol"
"#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:9000/api");
        assert_eq!(config.cache.base_url, "http://localhost:9000/api");
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl, Duration::from_secs(7200));
        assert_eq!(config.cache.location, PathBuf::from("/tmp/somewhere/eol"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse("[cache]\nttl = \"30m\"\nunknown = 1\n").unwrap();
        assert_eq!(config.base_url, crate::cache::DEFAULT_BASE_URL);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl, Duration::from_secs(1800));
    }

    #[test]
    fn test_invalid_ttl_in_file() {
        assert!(Config::parse("[cache]\nttl = \"soon\"\n").is_err());
        assert!(Config::parse("not toml at all [").is_err());
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::default().apply(
            CacheOptions::new()
                .with_enabled(false)
                .with_base_url("http://127.0.0.1:1"),
        );
        assert!(!config.cache.enabled);
        assert_eq!(config.base_url, "http://127.0.0.1:1");
        assert_eq!(config.cache.base_url, "http://127.0.0.1:1");
    }
}
