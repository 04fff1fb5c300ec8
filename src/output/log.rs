//! Verbose diagnostics on stderr
//!
//! Stdout carries the response document only, so every human-readable
//! note goes to stderr and only when `--verbose` is set.

use colored::Colorize;
use std::path::Path;

/// Writes colored diagnostic notes to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    verbose: bool,
}

impl Reporter {
    /// Create a reporter
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// A reporter that prints nothing
    pub fn quiet() -> Self {
        Self::new(false)
    }

    /// Returns true if notes are printed
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// A top-level step, e.g. the dependency being processed
    pub fn step(&self, message: impl AsRef<str>) {
        if self.verbose {
            eprintln!("{} {}", "==>".cyan().bold(), message.as_ref());
        }
    }

    /// A labelled detail under the current step
    pub fn detail(&self, label: &str, message: impl AsRef<str>) {
        if self.verbose {
            eprintln!("    {} {}", format!("{}:", label).dimmed(), message.as_ref());
        }
    }

    /// A file written to disk
    pub fn rewritten(&self, path: &Path) {
        if self.verbose {
            eprintln!("    {} {}", "rewrote".green(), path.display());
        }
    }

    /// A condition worth knowing about that does not stop the run
    pub fn warn(&self, message: impl AsRef<str>) {
        if self.verbose {
            eprintln!("{} {}", "warning:".yellow().bold(), message.as_ref());
        }
    }
}
