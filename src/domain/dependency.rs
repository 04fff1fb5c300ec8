//! Dependency change requests

use super::module_path::{is_major_path_change, path_at_version};
use super::version::{canonical_version, is_valid_version};
use crate::error::ManifestError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A Go module dependency as sent by the update bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    /// Module path
    pub name: String,
    /// Target (or current) version, always `v`-prefixed
    #[serde(deserialize_with = "deserialize_version")]
    pub version: String,
    /// Version before the upgrade, only set when a major upgrade is evaluated
    #[serde(
        default,
        alias = "previous_version",
        deserialize_with = "deserialize_optional_version",
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_version: Option<String>,
    /// Whether the requirement is only needed transitively
    #[serde(default)]
    pub indirect: bool,
}

fn deserialize_version<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(canonical_version(&raw))
}

fn deserialize_optional_version<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|v| !v.trim().is_empty())
        .map(|v| canonical_version(&v)))
}

impl Dependency {
    /// Creates a new direct dependency
    pub fn new(name: impl Into<String>, version: impl AsRef<str>) -> Self {
        Self {
            name: name.into(),
            version: canonical_version(version.as_ref()),
            previous_version: None,
            indirect: false,
        }
    }

    /// Sets the version the dependency is upgraded from (builder pattern)
    pub fn with_previous_version(mut self, version: impl AsRef<str>) -> Self {
        self.previous_version = Some(canonical_version(version.as_ref()));
        self
    }

    /// Marks the dependency as indirect (builder pattern)
    pub fn with_indirect(mut self, indirect: bool) -> Self {
        self.indirect = indirect;
        self
    }

    /// Check that the version is a semantic version or pseudo-version
    pub fn validate(&self) -> Result<(), ManifestError> {
        if !is_valid_version(&self.version) {
            return Err(ManifestError::invalid_version(&self.name, &self.version));
        }
        if let Some(previous) = &self.previous_version {
            if !is_valid_version(previous) {
                return Err(ManifestError::invalid_version(&self.name, previous));
            }
        }
        Ok(())
    }

    /// The module path this dependency is upgraded from, when the upgrade moves
    /// it to a different major-version path
    pub fn major_upgrade_from(&self) -> Option<String> {
        let previous = self.previous_version.as_deref()?;
        let old_path = path_at_version(&self.name, previous)?;
        if is_major_path_change(&old_path, &self.name) {
            Some(old_path)
        } else {
            None
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indirect = if self.indirect { " (indirect)" } else { "" };
        match &self.previous_version {
            Some(previous) => write!(
                f,
                "{} {} -> {}{}",
                self.name, previous, self.version, indirect
            ),
            None => write!(f, "{} {}{}", self.name, self.version, indirect),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_new_normalizes_version() {
        let dep = Dependency::new("example.com/mod", "1.2.0");
        assert_eq!(dep.version, "v1.2.0");
        assert!(!dep.indirect);
        assert!(dep.previous_version.is_none());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"name":"example.com/mod/v2","version":"2.0.0","previousVersion":"v1.9.0","indirect":true}"#;
        let dep: Dependency = serde_json::from_str(json).unwrap();
        assert_eq!(dep.version, "v2.0.0");
        assert_eq!(dep.previous_version.as_deref(), Some("v1.9.0"));
        assert!(dep.indirect);
    }

    #[test]
    fn test_deserialize_snake_case_alias_and_defaults() {
        let json = r#"{"name":"example.com/mod","version":"v1.3.0","previous_version":""}"#;
        let dep: Dependency = serde_json::from_str(json).unwrap();
        assert!(dep.previous_version.is_none());
        assert!(!dep.indirect);
    }

    #[test]
    fn test_validate() {
        assert!(Dependency::new("example.com/mod", "v1.0.0").validate().is_ok());
        assert!(Dependency::new("example.com/mod", "master").validate().is_err());
        let dep = Dependency::new("example.com/mod", "v1.0.0").with_previous_version("abc");
        assert!(dep.validate().is_err());
    }

    #[test]
    fn test_major_upgrade_from() {
        let dep = Dependency::new("example.com/mod/v2", "v2.0.0").with_previous_version("v1.9.0");
        assert_eq!(dep.major_upgrade_from().as_deref(), Some("example.com/mod"));
    }

    #[test]
    fn test_minor_upgrade_is_not_major() {
        let dep = Dependency::new("example.com/mod", "v1.3.0").with_previous_version("v1.2.0");
        assert_eq!(dep.major_upgrade_from(), None);

        let dep = Dependency::new("example.com/mod", "v1.3.0");
        assert_eq!(dep.major_upgrade_from(), None);
    }

    #[test]
    fn test_incompatible_to_incompatible_is_not_major() {
        let dep = Dependency::new("example.com/mod", "v3.0.0+incompatible")
            .with_previous_version("v2.1.0+incompatible");
        assert_eq!(dep.major_upgrade_from(), None);
    }

    #[test]
    fn test_display() {
        let dep = Dependency::new("example.com/mod/v2", "v2.0.0")
            .with_previous_version("v1.9.0")
            .with_indirect(true);
        assert_eq!(
            dep.to_string(),
            "example.com/mod/v2 v1.9.0 -> v2.0.0 (indirect)"
        );
    }

    #[test]
    fn test_serde_roundtrip_field_names() {
        let dep = Dependency::new("example.com/mod/v2", "v2.0.0").with_previous_version("v1.9.0");
        let json = serde_json::to_string(&dep).unwrap();
        assert!(json.contains("\"previousVersion\":\"v1.9.0\""));
    }
}
