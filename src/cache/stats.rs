//! Cache statistics

use serde::{Deserialize, Serialize};

/// Cache statistics, recomputed from disk on every request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Cache directory
    pub cache_dir: String,

    /// Whether caching is enabled
    pub enabled: bool,

    /// TTL for ordinary entries, human readable
    pub default_ttl: String,

    /// TTL for the full catalog, human readable
    pub full_ttl: String,

    /// Number of cache entry files
    pub total_files: usize,

    /// Total size of cache entry files in bytes
    pub total_size: u64,

    /// Readable entries that have not expired
    pub valid_files: usize,

    /// Readable entries past their expiry
    pub expired_files: usize,
}

impl CacheStats {
    /// Get human-readable size string
    pub fn format_size(size: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = 1024 * KB;
        const GB: u64 = 1024 * MB;

        if size >= GB {
            format!("{:.2} GB", size as f64 / GB as f64)
        } else if size >= MB {
            format!("{:.2} MB", size as f64 / MB as f64)
        } else if size >= KB {
            format!("{:.2} KB", size as f64 / KB as f64)
        } else {
            format!("{} B", size)
        }
    }

    /// Entries that could not be read or parsed
    pub fn unreadable_files(&self) -> usize {
        self.total_files
            .saturating_sub(self.valid_files + self.expired_files)
    }

    /// Display statistics in a human-readable format
    pub fn display(&self) -> String {
        let mut output = String::new();
        output.push_str("Cache Statistics:\n");
        output.push_str(&format!("  Directory: {}\n", self.cache_dir));
        output.push_str(&format!(
            "  Enabled: {}\n",
            if self.enabled { "yes" } else { "no (full catalog still cached)" }
        ));
        output.push_str(&format!("  Default TTL: {}\n", self.default_ttl));
        output.push_str(&format!("  Full catalog TTL: {}\n", self.full_ttl));
        output.push_str(&format!("  Total files: {}\n", self.total_files));
        output.push_str(&format!(
            "  Total size: {}\n",
            Self::format_size(self.total_size)
        ));
        output.push_str(&format!("  Valid: {}\n", self.valid_files));
        output.push_str(&format!("  Expired: {}\n", self.expired_files));

        let unreadable = self.unreadable_files();
        if unreadable > 0 {
            output.push_str(&format!("  Unreadable: {}\n", unreadable));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.total_files, 0);
        assert_eq!(stats.total_size, 0);
        assert_eq!(stats.unreadable_files(), 0);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(CacheStats::format_size(500), "500 B");
        assert_eq!(CacheStats::format_size(2048), "2.00 KB");
        assert_eq!(CacheStats::format_size(3 * 1024 * 1024), "3.00 MB");
        assert_eq!(CacheStats::format_size(2 * 1024 * 1024 * 1024), "2.00 GB");
    }

    #[test]
    fn test_display_mentions_unreadable_only_when_present() {
        let mut stats = CacheStats {
            cache_dir: "/tmp/eol".to_string(),
            enabled: true,
            default_ttl: "1h".to_string(),
            full_ttl: "24h".to_string(),
            total_files: 3,
            total_size: 4096,
            valid_files: 2,
            expired_files: 1,
        };

        let text = stats.display();
        assert!(text.contains("Directory: /tmp/eol"));
        assert!(text.contains("Total size: 4.00 KB"));
        assert!(!text.contains("Unreadable"));

        stats.total_files = 4;
        assert!(stats.display().contains("Unreadable: 1"));
    }

    #[test]
    fn test_serializes_with_snake_case_fields() {
        let stats = CacheStats::default();
        let json = serde_json::to_value(&stats).unwrap();
        for field in [
            "cache_dir",
            "enabled",
            "default_ttl",
            "full_ttl",
            "total_files",
            "total_size",
            "valid_files",
            "expired_files",
        ] {
            assert!(json.get(field).is_some(), "missing {}", field);
        }
    }
}
