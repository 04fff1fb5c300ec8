//! Package graph of a Go module tree
//!
//! Every directory below the module root that holds `.go` files is a
//! package. Like `go list -test`, each package contributes up to three
//! variants:
//! - the library (non-test files)
//! - the in-package test (library files plus `_test.go` files of the same package)
//! - the external test (`package foo_test` files)
//!
//! A file therefore appears in more than one variant. Sources are read and
//! scanned once at load time and shared by every variant.

use super::scanner::{scan, FileHeader};
use crate::error::ImportError;
use crate::manifest::GO_MOD_FILENAME;
use crate::progress::{Phase, Progress};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Which build of a package a variant represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Variant {
    Library,
    Test,
    ExternalTest,
}

/// One package variant and its files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub dir: PathBuf,
    pub name: String,
    pub variant: Variant,
    pub files: Vec<PathBuf>,
}

/// A loaded Go file
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub source: String,
    pub header: FileHeader,
}

/// All packages below a module root
#[derive(Debug, Clone, Default)]
pub struct PackageGraph {
    packages: Vec<Package>,
    files: BTreeMap<PathBuf, SourceFile>,
}

/// Directories the go tool never treats as part of the module's packages
fn is_ignored_dir(entry: &DirEntry, root: &Path) -> bool {
    if entry.path() == root || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == "vendor"
        || name == "testdata"
        || name.starts_with('.')
        || name.starts_with('_')
        || entry.path().join(GO_MOD_FILENAME).is_file()
}

fn is_go_file(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    entry.file_type().is_file()
        && name.ends_with(".go")
        && !name.starts_with('.')
        && !name.starts_with('_')
}

impl PackageGraph {
    /// Walk `root` and scan every Go file
    ///
    /// Any unreadable or unparsable file fails the whole load.
    pub fn load(root: &Path, progress: &mut Progress) -> Result<Self, ImportError> {
        if !root.is_dir() {
            return Err(ImportError::load(root, "not a directory"));
        }

        progress.walking(root);

        let mut by_dir: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_ignored_dir(entry, root));
        for entry in walker {
            let entry = entry.map_err(|e| ImportError::load(root, e.to_string()))?;
            if is_go_file(&entry) {
                let dir = entry
                    .path()
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                by_dir.entry(dir).or_default().push(entry.into_path());
            }
        }

        let mut graph = PackageGraph::default();
        let total: usize = by_dir.values().map(Vec::len).sum();
        progress.files(Phase::Scan, total);

        for (dir, paths) in by_dir {
            for path in &paths {
                let source = fs::read_to_string(path)
                    .map_err(|e| ImportError::load(path, e.to_string()))?;
                let header = scan(&source)
                    .map_err(|e| ImportError::syntax(path, e.line, e.message))?;
                graph.files.insert(path.clone(), SourceFile { source, header });
                progress.advance(path);
            }
            graph.add_packages(dir, &paths);
        }

        progress.clear();
        Ok(graph)
    }

    fn add_packages(&mut self, dir: PathBuf, paths: &[PathBuf]) {
        let mut libraries: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        let mut in_package_tests: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        let mut external_tests: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

        for path in paths {
            let Some(file) = self.files.get(path) else {
                continue;
            };
            let is_test = path.to_string_lossy().ends_with("_test.go");
            let name = file.header.package.clone();
            let target = match (is_test, name.strip_suffix("_test")) {
                (false, _) => &mut libraries,
                (true, Some(_)) => &mut external_tests,
                (true, None) => &mut in_package_tests,
            };
            target.entry(name).or_default().push(path.clone());
        }

        for (name, files) in &libraries {
            self.packages.push(Package {
                dir: dir.clone(),
                name: name.clone(),
                variant: Variant::Library,
                files: files.clone(),
            });
        }

        for (name, tests) in in_package_tests {
            let mut files = libraries.get(&name).cloned().unwrap_or_default();
            files.extend(tests);
            self.packages.push(Package {
                dir: dir.clone(),
                name,
                variant: Variant::Test,
                files,
            });
        }

        for (name, files) in external_tests {
            self.packages.push(Package {
                dir: dir.clone(),
                name,
                variant: Variant::ExternalTest,
                files,
            });
        }
    }

    /// All package variants, ordered by directory then variant
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// The loaded source of a file
    pub fn file(&self, path: &Path) -> Option<&SourceFile> {
        self.files.get(path)
    }

    /// Number of distinct files loaded
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn load(root: &Path) -> PackageGraph {
        PackageGraph::load(root, &mut Progress::disabled()).unwrap()
    }

    #[test]
    fn test_variants() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "lib.go", "package lib\n");
        write(root, "lib_test.go", "package lib\n");
        write(root, "ext_test.go", "package lib_test\n");

        let graph = load(root);
        let packages = graph.packages();
        assert_eq!(packages.len(), 3);

        assert_eq!(packages[0].variant, Variant::Library);
        assert_eq!(packages[0].files, vec![root.join("lib.go")]);

        assert_eq!(packages[1].variant, Variant::Test);
        assert_eq!(
            packages[1].files,
            vec![root.join("lib.go"), root.join("lib_test.go")]
        );

        assert_eq!(packages[2].variant, Variant::ExternalTest);
        assert_eq!(packages[2].name, "lib_test");
        assert_eq!(graph.file_count(), 3);
    }

    #[test]
    fn test_skips_ignored_dirs_and_nested_modules() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "go.mod", "module example.com/app\n");
        write(root, "main.go", "package main\n");
        write(root, "vendor/x/x.go", "package x\n");
        write(root, "testdata/t.go", "this is not go");
        write(root, ".hidden/h.go", "package h\n");
        write(root, "_old/o.go", "package o\n");
        write(root, "nested/go.mod", "module example.com/nested\n");
        write(root, "nested/n.go", "package n\n");
        write(root, "pkg/util/util.go", "package util\n");
        write(root, "pkg/util/_skip.go", "not go");

        let graph = load(root);
        let dirs: Vec<PathBuf> = graph.packages().iter().map(|p| p.dir.clone()).collect();
        assert_eq!(dirs, vec![root.to_path_buf(), root.join("pkg/util")]);
        assert_eq!(graph.file_count(), 2);
    }

    #[test]
    fn test_syntax_error_fails_load() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bad.go", "package bad\nimport (\n");
        let err = PackageGraph::load(dir.path(), &mut Progress::disabled()).unwrap_err();
        assert!(matches!(err, ImportError::Syntax { line: 3, .. }));
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let err =
            PackageGraph::load(&dir.path().join("missing"), &mut Progress::disabled()).unwrap_err();
        assert!(matches!(err, ImportError::Load { .. }));
    }

    #[test]
    fn test_file_lookup() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.go", "package a\n\nimport \"fmt\"\n");
        let graph = load(dir.path());
        let file = graph.file(&dir.path().join("a.go")).unwrap();
        assert_eq!(file.header.imports[0].path, "fmt");
    }
}
