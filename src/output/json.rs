//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of helper responses (compact or pretty)
//! - The manifest summary in the shape printed by `go mod edit -json`

use crate::manifest::{GoMod, Replacement};
use crate::output::{OutputFormatter, Response};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for responses
pub struct JsonFormatter {
    /// Indent the output
    pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, response: &Response, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(response)
        } else {
            serde_json::to_string(response)
        }
        .map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

/// Summary of a go.mod file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModFileJson {
    pub module: ModuleJson,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toolchain: Option<String>,
    pub require: Vec<RequireJson>,
    pub exclude: Vec<ModuleVersionJson>,
    pub replace: Vec<ReplaceJson>,
}

/// The `module` directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModuleJson {
    pub path: String,
}

/// A `require` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequireJson {
    pub path: String,
    pub version: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub indirect: bool,
}

/// A module path with an optional version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModuleVersionJson {
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
}

/// A `replace` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReplaceJson {
    pub old: ModuleVersionJson,
    pub new: ModuleVersionJson,
}

impl From<&Replacement> for ReplaceJson {
    fn from(r: &Replacement) -> Self {
        Self {
            old: ModuleVersionJson {
                path: r.old_path.clone(),
                version: r.old_version.clone().unwrap_or_default(),
            },
            new: ModuleVersionJson {
                path: r.new_path.clone(),
                version: r.new_version.clone().unwrap_or_default(),
            },
        }
    }
}

impl From<&GoMod> for ModFileJson {
    fn from(manifest: &GoMod) -> Self {
        Self {
            module: ModuleJson {
                path: manifest.module_path().unwrap_or_default(),
            },
            go: manifest.go_version(),
            toolchain: manifest.toolchain(),
            require: manifest
                .requirements()
                .into_iter()
                .map(|r| RequireJson {
                    path: r.path,
                    version: r.version,
                    indirect: r.indirect,
                })
                .collect(),
            exclude: manifest
                .exclusions()
                .into_iter()
                .map(|e| ModuleVersionJson {
                    path: e.path,
                    version: e.version,
                })
                .collect(),
            replace: manifest.replacements().iter().map(ReplaceJson::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_compact() {
        let mut out = Vec::new();
        JsonFormatter::new(false)
            .format(&Response::success(json!("v1.3.0")), &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"result\":\"v1.3.0\"}\n");
    }

    #[test]
    fn test_format_pretty() {
        let mut out = Vec::new();
        JsonFormatter::new(true)
            .format(&Response::failure("boom"), &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"error\": \"boom\"\n}\n");
    }

    #[test]
    fn test_mod_file_json_shape() {
        let manifest = GoMod::parse(
            "module example.com/app\n\ngo 1.21\n\nrequire (\n\texample.com/a v1.0.0\n\texample.com/b v1.1.0 // indirect\n)\n\nexclude example.com/a v1.0.1\n\nreplace example.com/b => ../b\n",
        )
        .unwrap();
        let value = serde_json::to_value(ModFileJson::from(&manifest)).unwrap();
        assert_eq!(
            value,
            json!({
                "Module": {"Path": "example.com/app"},
                "Go": "1.21",
                "Require": [
                    {"Path": "example.com/a", "Version": "v1.0.0"},
                    {"Path": "example.com/b", "Version": "v1.1.0", "Indirect": true}
                ],
                "Exclude": [{"Path": "example.com/a", "Version": "v1.0.1"}],
                "Replace": [{"Old": {"Path": "example.com/b"}, "New": {"Path": "../b"}}]
            })
        );
    }
}
