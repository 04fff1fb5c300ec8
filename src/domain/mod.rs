//! Core domain models for gomodup
//!
//! This module contains the fundamental types used throughout the application:
//! - Dependency change requests
//! - Go version string handling (semver, prerelease, pseudo-versions)
//! - Module path major-version suffixes

mod dependency;
pub mod module_path;
pub mod version;

pub use dependency::Dependency;
pub use version::GoVersion;
