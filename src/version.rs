//! Release-name normalization
//!
//! The API names release cycles `major.minor` ("1.24"), while users usually
//! type a full version ("1.24.6"). Only the `x.y.z` → `x.y` form is folded.

use regex::Regex;
use std::sync::OnceLock;

fn semver_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:-[0-9A-Za-z\-.]+)?(?:\+[0-9A-Za-z\-.]+)?$")
            .expect("semver pattern is valid")
    })
}

fn major_minor_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+)\.(\d+)$").expect("major.minor pattern is valid"))
}

/// Normalize a version string for release lookups.
///
/// A semantic version (`1.24.6`, `2.1.0-rc.1`) becomes its `major.minor`
/// part. Everything else is returned trimmed but otherwise unchanged.
pub fn normalize_version(version: &str) -> String {
    let ver = version.trim();
    if major_minor_pattern().is_match(ver) {
        return ver.to_string();
    }

    match semver_pattern().captures(ver) {
        Some(caps) => format!("{}.{}", &caps[1], &caps[2]),
        None => ver.to_string(),
    }
}

/// Check whether a string is a full `major.minor.patch` version
pub fn is_semantic_version(version: &str) -> bool {
    semver_pattern().is_match(version.trim())
}
