//! Upgrade version selection
//!
//! This module provides:
//! - Candidate classification (prerelease, pseudo-version)
//! - Candidate filtering by exclusions and prerelease policy
//! - The selector that walks the ordered candidate list
//! - UpdateChecker, which looks candidates up in a `VersionRepository`

mod candidate;
mod filter;

pub use candidate::VersionCandidate;
pub use filter::CandidateFilter;

use crate::domain::module_path::next_major_path;
use crate::domain::version::is_pseudo_version;
use crate::domain::Dependency;
use crate::error::{AppError, RegistryError};
use crate::registry::VersionRepository;
use std::collections::BTreeSet;

/// Select the version to upgrade a dependency to
///
/// `candidates` must be in ascending repository order. The last candidate
/// that passes the filter wins; the current version is returned when none
/// does. A pseudo-version is returned unchanged.
pub fn select_upgrade(
    dependency: &Dependency,
    candidates: &[String],
    exclusions: &BTreeSet<String>,
) -> String {
    let current = &dependency.version;
    if is_pseudo_version(current) {
        return current.clone();
    }

    let filter = CandidateFilter::for_current(current).with_exclusions(exclusions.iter().cloned());

    let mut best = current.clone();
    for candidate in candidates.iter().map(VersionCandidate::new) {
        if filter.accepts(&candidate) {
            best = candidate.version;
        }
    }
    best
}

/// Looks up candidate versions and selects upgrades
pub struct UpdateChecker<'a> {
    repository: &'a dyn VersionRepository,
}

impl<'a> UpdateChecker<'a> {
    /// Create a checker backed by a version repository
    pub fn new(repository: &'a dyn VersionRepository) -> Self {
        Self { repository }
    }

    /// Candidate versions for a dependency
    ///
    /// For `/vN` module paths the next major family is preferred when the
    /// repository lists any version for it.
    pub fn candidate_versions(&self, dependency: &Dependency) -> Result<Vec<String>, RegistryError> {
        if let Some(next_path) = next_major_path(&dependency.name) {
            match self.repository.versions(&next_path) {
                Ok(versions) if !versions.is_empty() => return Ok(versions),
                Ok(_) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }
        self.repository.versions(&dependency.name)
    }

    /// The best version for a dependency
    ///
    /// Fails with `InvalidArgument` when no dependency is given. Lookup
    /// errors are returned as is.
    pub fn latest_version(
        &self,
        dependency: Option<&Dependency>,
        exclusions: &BTreeSet<String>,
    ) -> Result<String, AppError> {
        let dependency =
            dependency.ok_or_else(|| AppError::invalid_argument("dependency is required"))?;

        if is_pseudo_version(&dependency.version) {
            return Ok(dependency.version.clone());
        }

        let candidates = self.candidate_versions(dependency)?;
        Ok(select_upgrade(dependency, &candidates, exclusions))
    }
}
