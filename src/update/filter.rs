//! Candidate filter configuration
//!
//! This module provides the CandidateFilter struct that decides which
//! listed versions may be selected as an upgrade.

use super::VersionCandidate;
use crate::domain::version::prerelease;
use std::collections::BTreeSet;

/// Filter applied to repository versions before selection
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    /// Versions that must never be selected
    pub exclusions: BTreeSet<String>,
    /// Whether prerelease versions may be selected
    pub allow_prerelease: bool,
}

impl CandidateFilter {
    /// Create a filter that excludes nothing and rejects prereleases
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the filter for a dependency currently at `current_version`
    ///
    /// Prereleases are only allowed when the current version is one.
    pub fn for_current(current_version: &str) -> Self {
        Self::new().with_allow_prerelease(!prerelease(current_version).is_empty())
    }

    /// Set excluded versions
    pub fn with_exclusions<I, S>(mut self, exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions = exclusions.into_iter().map(Into::into).collect();
        self
    }

    /// Set whether prereleases are acceptable
    pub fn with_allow_prerelease(mut self, allow: bool) -> Self {
        self.allow_prerelease = allow;
        self
    }

    /// Check if a candidate may be selected
    pub fn accepts(&self, candidate: &VersionCandidate) -> bool {
        if candidate.is_pseudo() {
            return false;
        }
        if self.exclusions.contains(&candidate.version) {
            return false;
        }
        self.allow_prerelease || !candidate.is_prerelease()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepts(filter: &CandidateFilter, version: &str) -> bool {
        filter.accepts(&VersionCandidate::new(version))
    }

    #[test]
    fn test_new_filter() {
        let filter = CandidateFilter::new();
        assert!(filter.exclusions.is_empty());
        assert!(!filter.allow_prerelease);
    }

    #[test]
    fn test_for_current_release() {
        let filter = CandidateFilter::for_current("v1.2.0");
        assert!(!filter.allow_prerelease);
        assert!(accepts(&filter, "v1.3.0"));
        assert!(!accepts(&filter, "v1.3.0-beta.1"));
    }

    #[test]
    fn test_for_current_prerelease() {
        let filter = CandidateFilter::for_current("v1.2.0-alpha");
        assert!(filter.allow_prerelease);
        assert!(accepts(&filter, "v1.3.0-beta.1"));
    }

    #[test]
    fn test_exclusions() {
        let filter = CandidateFilter::new().with_exclusions(["v1.3.0"]);
        assert!(!accepts(&filter, "v1.3.0"));
        assert!(accepts(&filter, "v1.3.1"));
    }

    #[test]
    fn test_pseudo_versions_rejected() {
        let filter = CandidateFilter::new().with_allow_prerelease(true);
        assert!(!accepts(&filter, "v1.2.4-0.20191109021931-daa7c04131f5"));
    }
}
