//! Go module version strings
//!
//! Handles version formats:
//! - Semantic version: `v1.2.3`
//! - Prerelease: `v1.2.3-beta.1`
//! - Pseudo-version: `v0.0.0-20210101120000-abcdef123456`, `v1.2.4-0.20191109021931-daa7c04131f5`
//! - Incompatible major: `v2.0.0+incompatible`

use chrono::NaiveDateTime;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

// Pseudo-version: base, then a 14-digit UTC timestamp and a 12-hex-digit commit prefix
static PSEUDO_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^v\d+\.(?:0\.0-|\d+\.\d+-(?:[^+]*\.)?0\.)(\d{14})-([0-9a-f]{12})(?:\+incompatible)?$",
    )
    .unwrap()
});

/// A parsed Go module version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoVersion {
    /// The version exactly as given (with `v` prefix)
    pub raw: String,
    /// Semantic version without the `v` prefix
    semver: semver::Version,
}

impl GoVersion {
    /// Parse a Go version string; `None` unless it is a full `vMAJOR.MINOR.PATCH` version
    pub fn parse(version: &str) -> Option<Self> {
        let trimmed = version.trim();
        let without_v = trimmed.strip_prefix('v')?;
        let parsed = semver::Version::parse(without_v).ok()?;
        Some(Self {
            raw: trimmed.to_string(),
            semver: parsed,
        })
    }

    /// Major version number
    pub fn major(&self) -> u64 {
        self.semver.major
    }

    /// Prerelease tag without the leading `-`, empty for releases
    pub fn prerelease(&self) -> &str {
        self.semver.pre.as_str()
    }

    /// Returns true if the version carries a prerelease tag
    pub fn is_prerelease(&self) -> bool {
        !self.prerelease().is_empty()
    }

    /// Returns true for `+incompatible` versions
    pub fn is_incompatible(&self) -> bool {
        self.raw.ends_with("+incompatible")
    }

    /// Returns true if this is a pseudo-version pinned to a commit
    pub fn is_pseudo(&self) -> bool {
        is_pseudo_version(&self.raw)
    }
}

impl fmt::Display for GoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Ensure a version string has the `v` prefix Go requires
pub fn canonical_version(version: &str) -> String {
    let trimmed = version.trim();
    let bare = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    format!("v{}", bare)
}

/// Returns true if the version is a syntactically valid semantic version or pseudo-version
pub fn is_valid_version(version: &str) -> bool {
    GoVersion::parse(version).is_some() || is_pseudo_version(version)
}

/// Returns true if the version has the pseudo-version shape
///
/// Only the syntax is checked; the timestamp digits need not form a real date.
pub fn is_pseudo_version(version: &str) -> bool {
    PSEUDO_VERSION_RE.is_match(version.trim())
}

/// The commit timestamp encoded in a pseudo-version, when it is a valid date
pub fn pseudo_version_time(version: &str) -> Option<NaiveDateTime> {
    let caps = PSEUDO_VERSION_RE.captures(version.trim())?;
    let stamp = caps.get(1)?.as_str();
    NaiveDateTime::parse_from_str(stamp, "%Y%m%d%H%M%S").ok()
}

/// Prerelease tag of a version, empty when absent or unparsable
pub fn prerelease(version: &str) -> String {
    GoVersion::parse(version)
        .map(|v| v.prerelease().to_string())
        .unwrap_or_default()
}

/// Compare two Go versions by semantic version precedence
///
/// Unparsable versions sort before parsable ones and compare as strings
/// among themselves.
pub fn compare_versions(a: &str, b: &str) -> std::cmp::Ordering {
    match (GoVersion::parse(a), GoVersion::parse(b)) {
        (Some(va), Some(vb)) => va.semver.cmp(&vb.semver),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => a.cmp(b),
    }
}
