//! Module version lookup
//!
//! This module provides:
//! - The `VersionRepository` seam used by the version selector
//! - A blocking HTTP client
//! - A Go module proxy repository
//! - An in-memory repository for fixtures and precomputed lists

mod client;
mod go_proxy;

pub use client::{HttpClient, DEFAULT_TIMEOUT};
pub use go_proxy::{escape_module_path, select_proxy, GoProxyRepository, DEFAULT_GOPROXY};

use crate::error::RegistryError;
use std::collections::HashMap;

/// Source of released versions for a module path
pub trait VersionRepository {
    /// Human-readable name used in error messages
    fn registry_name(&self) -> &str;

    /// Known versions of `module`, in ascending order
    fn versions(&self, module: &str) -> Result<Vec<String>, RegistryError>;
}

/// In-memory version repository
#[derive(Debug, Clone, Default)]
pub struct StaticRepository {
    modules: HashMap<String, Vec<String>>,
}

impl StaticRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the versions of a module (builder pattern)
    ///
    /// Versions are returned in the order given.
    pub fn with_module<I, S>(mut self, module: impl Into<String>, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules
            .insert(module.into(), versions.into_iter().map(Into::into).collect());
        self
    }
}

impl VersionRepository for StaticRepository {
    fn registry_name(&self) -> &str {
        "static repository"
    }

    fn versions(&self, module: &str) -> Result<Vec<String>, RegistryError> {
        self.modules
            .get(module)
            .cloned()
            .ok_or_else(|| RegistryError::module_not_found(module, self.registry_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_repository_lookup() {
        let repo = StaticRepository::new().with_module("example.com/mod", ["v1.0.0", "v1.1.0"]);
        assert_eq!(
            repo.versions("example.com/mod").unwrap(),
            vec!["v1.0.0", "v1.1.0"]
        );
    }

    #[test]
    fn test_static_repository_unknown_module() {
        let err = StaticRepository::new().versions("example.com/none").unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("example.com/none"));
    }

    #[test]
    fn test_static_repository_as_trait_object() {
        let repo: Box<dyn VersionRepository> =
            Box::new(StaticRepository::new().with_module("example.com/mod", Vec::<String>::new()));
        assert!(repo.versions("example.com/mod").unwrap().is_empty());
    }
}
