//! Version candidates from a module repository

use crate::domain::version::pseudo_version_time;
use crate::domain::GoVersion;
use chrono::NaiveDateTime;

/// A version offered by the repository, classified for selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCandidate {
    /// Version string as listed
    pub version: String,
    /// Prerelease tag, empty for releases
    pub prerelease: String,
    /// Commit-pinned pseudo-version
    pub pseudo: bool,
    /// Commit time of a pseudo-version, when the timestamp is a valid date
    pub pseudo_time: Option<NaiveDateTime>,
}

impl VersionCandidate {
    /// Classify a listed version
    pub fn new(version: impl Into<String>) -> Self {
        let version = version.into();
        let parsed = GoVersion::parse(&version);
        let prerelease = parsed
            .as_ref()
            .map(|v| v.prerelease().to_string())
            .unwrap_or_default();
        let pseudo = parsed.as_ref().is_some_and(GoVersion::is_pseudo);
        let pseudo_time = pseudo_version_time(&version);
        Self {
            version,
            prerelease,
            pseudo,
            pseudo_time,
        }
    }

    /// Returns true if the version has a prerelease tag
    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    /// Returns true for commit-pinned pseudo-versions
    pub fn is_pseudo(&self) -> bool {
        self.pseudo
    }
}
