//! go.mod parsing, editing and writing
//!
//! This module provides:
//! - A comment-preserving go.mod syntax tree
//! - The `GoMod` manifest model (requirements, exclusions, replacements)
//! - The indirect-marker clause parser
//! - Loading and saving the manifest file exactly once per run

mod comment;
mod go_mod;
mod syntax;
mod writer;

pub use comment::{apply_indirect, CommentClauses};
pub use go_mod::{Exclusion, GoMod, Replacement, Requirement};
pub use writer::{read_manifest, write_manifest, LoadedManifest, ManifestWriter, WriteResult};

use crate::error::ManifestError;
use std::path::{Path, PathBuf};

/// File name of the Go module manifest
pub const GO_MOD_FILENAME: &str = "go.mod";

/// Parse and format manifests
pub trait ManifestCodec {
    /// Parse manifest content
    fn parse(&self, content: &str) -> Result<GoMod, ManifestError>;

    /// Canonicalize the manifest and render it to text
    fn format(&self, manifest: &mut GoMod) -> String;
}

/// Codec for go.mod files
#[derive(Debug, Clone, Copy, Default)]
pub struct GoModCodec;

impl ManifestCodec for GoModCodec {
    fn parse(&self, content: &str) -> Result<GoMod, ManifestError> {
        GoMod::parse(content)
    }

    fn format(&self, manifest: &mut GoMod) -> String {
        manifest.format()
    }
}

/// Path of the go.mod file in a module root
pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(GO_MOD_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_path() {
        assert_eq!(
            manifest_path(Path::new("/work/app")),
            PathBuf::from("/work/app/go.mod")
        );
    }

    #[test]
    fn test_codec_roundtrip() {
        let codec = GoModCodec;
        let content = "module example.com/app\n\ngo 1.21\n\nrequire example.com/a v1.0.0\n";
        let mut manifest = codec.parse(content).unwrap();
        assert_eq!(codec.format(&mut manifest), content);
    }

    #[test]
    fn test_codec_parse_error() {
        assert!(GoModCodec.parse("module m\nrequire (\n").is_err());
    }
}
