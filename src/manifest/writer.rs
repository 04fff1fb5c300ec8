//! Manifest file loading and saving
//!
//! This module provides:
//! - ManifestWriter, which reads go.mod once and writes it back once
//! - Change detection so an untouched manifest is not rewritten
//! - Read and write helpers mapping I/O failures to `ManifestError`

use super::{GoMod, GoModCodec, ManifestCodec};
use crate::error::ManifestError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A manifest loaded from disk together with its original text
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    /// Path of the manifest file
    pub path: PathBuf,
    /// The parsed manifest, edited in memory
    pub manifest: GoMod,
    original: String,
}

impl LoadedManifest {
    /// The file content as it was read
    pub fn original(&self) -> &str {
        &self.original
    }
}

/// Result of saving a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Whether the file content changed on disk
    pub file_modified: bool,
}

/// Loads and saves manifest files through a codec
pub struct ManifestWriter {
    codec: Box<dyn ManifestCodec>,
}

impl Default for ManifestWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestWriter {
    /// Create a writer for go.mod files
    pub fn new() -> Self {
        Self {
            codec: Box::new(GoModCodec),
        }
    }

    /// Create a writer with a custom codec
    pub fn with_codec(codec: Box<dyn ManifestCodec>) -> Self {
        Self { codec }
    }

    /// Read and parse a manifest file
    pub fn load(&self, path: &Path) -> Result<LoadedManifest, ManifestError> {
        let original = read_manifest(path)?;
        let manifest = self.codec.parse(&original)?;
        Ok(LoadedManifest {
            path: path.to_path_buf(),
            manifest,
            original,
        })
    }

    /// Format the manifest and write it back if the text changed
    pub fn save(&self, loaded: &mut LoadedManifest) -> Result<WriteResult, ManifestError> {
        let content = self.codec.format(&mut loaded.manifest);
        let file_modified = content != loaded.original;

        if file_modified {
            write_manifest(&loaded.path, &content)?;
            loaded.original = content;
        }

        Ok(WriteResult {
            path: loaded.path.clone(),
            file_modified,
        })
    }
}

/// Read a manifest file content safely
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ManifestError::not_found(path),
        _ => ManifestError::read_error(path, e),
    })
}

/// Write content to a manifest file
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    fs::write(path, content).map_err(|e| ManifestError::write_error(path, e))
}
