//! Import path rewriting for major-version upgrades
//!
//! This module provides:
//! - A scanner for Go package clauses and import declarations
//! - A package graph with library and test variants
//! - ImportRewriter, which moves imports from one module path to another
//!   across a whole source tree

mod graph;
mod scanner;

pub use graph::{Package, PackageGraph, SourceFile, Variant};
pub use scanner::{rewrite_path, rewrite_source, scan, FileHeader, ImportSpec, ScanError};

use crate::error::{AppError, IoError};
use crate::output::Reporter;
use crate::progress::{Phase, Progress};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Rewrites imports below a module root
pub struct ImportRewriter {
    root: PathBuf,
    work_dir: PathBuf,
    progress: Progress,
    reporter: Reporter,
}

impl ImportRewriter {
    /// Create a rewriter for the tree at `root`; paths are reported relative to it
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            work_dir: root.clone(),
            root,
            progress: Progress::disabled(),
            reporter: Reporter::quiet(),
        }
    }

    /// Report changed paths relative to another directory (builder pattern)
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    /// Set the progress display (builder pattern)
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Set the diagnostics reporter (builder pattern)
    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Rewrite every import of `old_path` (or a package below it) to `new_path`
    ///
    /// Each file is written at most once, and only when one of its imports
    /// changed. Returns the rewritten files relative to the working
    /// directory, sorted. A load failure aborts before anything is written;
    /// a write failure leaves earlier files rewritten.
    pub fn rewrite_imports(&mut self, old_path: &str, new_path: &str) -> Result<Vec<String>, AppError> {
        let graph = PackageGraph::load(&self.root, &mut self.progress)?;

        self.progress.files(Phase::Rewrite, graph.file_count());

        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut changed = Vec::new();

        for package in graph.packages() {
            for path in &package.files {
                let identity = fs::canonicalize(path).map_err(|e| IoError::read(path, e))?;
                if !seen.insert(identity) {
                    continue;
                }
                self.progress.advance(path);

                let Some(file) = graph.file(path) else {
                    continue;
                };
                if let Some(updated) = rewrite_source(&file.source, &file.header, old_path, new_path)
                {
                    fs::write(path, updated).map_err(|e| IoError::write(path, e))?;
                    self.reporter.rewritten(path);
                    changed.push(self.relative(path));
                }
            }
        }

        self.progress.clear();
        changed.sort();
        Ok(changed)
    }

    fn relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.work_dir).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}
