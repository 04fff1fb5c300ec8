//! Update orchestrator for the helper functions
//!
//! This module provides:
//! - Batch manifest updates: load go.mod once → validate the whole batch →
//!   per dependency (major? rewrite imports) → add/update requirement →
//!   format and save once
//! - Version lookup with manifest exclusions merged in
//! - The `go mod edit -json` style manifest summary
//!
//! Any error aborts the batch; the manifest is not written in that case.

use crate::cli::CliArgs;
use crate::domain::module_path::next_major_path;
use crate::domain::Dependency;
use crate::error::AppError;
use crate::imports::ImportRewriter;
use crate::manifest::{manifest_path, GoMod, ManifestWriter};
use crate::output::{ModFileJson, Reporter};
use crate::progress::Progress;
use crate::registry::VersionRepository;
use crate::update::UpdateChecker;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Configuration for the orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Module root holding go.mod; rewritten paths are relative to it
    pub dir: PathBuf,
    /// Draw progress bars while rewriting imports
    pub show_progress: bool,
    /// Print diagnostics on stderr
    pub verbose: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            show_progress: false,
            verbose: false,
        }
    }
}

impl From<&CliArgs> for OrchestratorConfig {
    fn from(args: &CliArgs) -> Self {
        Self {
            dir: args.dir.clone(),
            show_progress: args.progress,
            verbose: args.verbose,
        }
    }
}

/// Orchestrator for the helper functions
pub struct Orchestrator {
    config: OrchestratorConfig,
    writer: ManifestWriter,
    reporter: Reporter,
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(config: OrchestratorConfig) -> Self {
        let reporter = Reporter::new(config.verbose);
        Self {
            config,
            writer: ManifestWriter::new(),
            reporter,
        }
    }

    /// Create an orchestrator for a module root with default settings
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(OrchestratorConfig {
            dir: dir.into(),
            ..OrchestratorConfig::default()
        })
    }

    /// The configured module root
    pub fn dir(&self) -> &PathBuf {
        &self.config.dir
    }

    fn load_manifest(&self) -> Result<GoMod, AppError> {
        let loaded = self.writer.load(&manifest_path(&self.config.dir))?;
        Ok(loaded.manifest)
    }

    /// Apply a batch of dependency changes to go.mod
    ///
    /// Major upgrades drop the old requirement and rewrite imports across the
    /// tree. Returns the rewritten source files relative to the module root,
    /// sorted and without duplicates; go.mod itself is not listed.
    pub fn update_dependency_file(&self, dependencies: &[Dependency]) -> Result<Vec<String>, AppError> {
        let path = manifest_path(&self.config.dir);
        self.reporter.step(format!("Loading {}", path.display()));
        let mut loaded = self.writer.load(&path)?;

        let mut changed_files: BTreeSet<String> = BTreeSet::new();

        let mut planned = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            dependency.validate()?;
            planned.push((dependency, dependency.major_upgrade_from()));
        }

        for (dependency, major_from) in planned {
            self.reporter.step(dependency.to_string());

            if let Some(old_path) = major_from {
                self.reporter.detail("major upgrade", format!("{} => {}", old_path, dependency.name));
                loaded.manifest.drop_requirement(&old_path);

                let mut rewriter = ImportRewriter::new(&self.config.dir)
                    .with_progress(Progress::new(self.config.show_progress))
                    .with_reporter(self.reporter);
                changed_files.extend(rewriter.rewrite_imports(&old_path, &dependency.name)?);
            }

            loaded
                .manifest
                .add_or_update_requirement(&dependency.name, &dependency.version)?;
            loaded.manifest.set_indirect(&dependency.name, dependency.indirect);
        }

        let result = self.writer.save(&mut loaded)?;
        if result.file_modified {
            self.reporter.detail("wrote", result.path.display().to_string());
        } else {
            self.reporter.detail("unchanged", result.path.display().to_string());
        }

        Ok(changed_files.into_iter().collect())
    }

    /// Select the best version for a dependency
    ///
    /// `exclusions` is merged with the `exclude` directives of go.mod for the
    /// dependency's path and its next major path, when go.mod exists.
    pub fn get_updated_version(
        &self,
        repository: &dyn VersionRepository,
        dependency: Option<&Dependency>,
        exclusions: &[String],
    ) -> Result<String, AppError> {
        let mut excluded: BTreeSet<String> = exclusions.iter().cloned().collect();

        if let Some(dep) = dependency {
            self.reporter.step(format!("Looking up {}", dep));
            self.reporter.detail("repository", repository.registry_name());

            if manifest_path(&self.config.dir).is_file() {
                let manifest = self.load_manifest()?;
                excluded.extend(manifest.excluded_versions(&dep.name));
                if let Some(next) = next_major_path(&dep.name) {
                    excluded.extend(manifest.excluded_versions(&next));
                }
            }
        }

        let version = UpdateChecker::new(repository).latest_version(dependency, &excluded)?;
        self.reporter.detail("selected", &version);
        Ok(version)
    }

    /// Summarize go.mod in the `go mod edit -json` shape
    pub fn edit_json(&self) -> Result<ModFileJson, AppError> {
        let manifest = self.load_manifest()?;
        Ok(ModFileJson::from(&manifest))
    }
}
