//! Progress display for import rewriting
//!
//! Walking and scanning a large module tree can take a while, so with
//! `--progress` a spinner is drawn during the walk and a per-file bar
//! while sources are scanned and rewritten. Everything goes to stderr.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Per-file phases of an import rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scan,
    Rewrite,
}

impl Phase {
    fn label(self) -> &'static str {
        match self {
            Phase::Scan => "Scanning imports",
            Phase::Rewrite => "Rewriting imports",
        }
    }
}

/// Spinner / bar over the files of a module tree
#[derive(Default)]
pub struct Progress {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// A progress display that never draws
    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Spin while the tree below `root` is walked
    pub fn walking(&mut self, root: &Path) {
        self.clear();
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Walking {}", root.display()));
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(spinner);
    }

    /// Replace whatever is drawn with a bar over `total` files
    pub fn files(&mut self, phase: Phase, total: usize) {
        self.clear();
        if !self.enabled {
            return;
        }

        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{prefix:.bold} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg:.dim}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_prefix(phase.label());
        self.bar = Some(bar);
    }

    /// One file done
    pub fn advance(&self, path: &Path) {
        if let Some(bar) = &self.bar {
            bar.set_message(path.display().to_string());
            bar.inc(1);
        }
    }

    /// Remove the spinner or bar from the terminal
    pub fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_draws_nothing() {
        let mut progress = Progress::disabled();
        assert!(!progress.is_enabled());
        progress.walking(Path::new("."));
        progress.files(Phase::Scan, 10);
        progress.advance(Path::new("main.go"));
        assert!(progress.bar.is_none());
        progress.clear();
    }

    #[test]
    fn test_phases_replace_each_other() {
        let mut progress = Progress::new(true);
        progress.walking(Path::new("."));
        progress.files(Phase::Rewrite, 2);
        progress.advance(Path::new("cmd/main.go"));
        assert_eq!(progress.bar.as_ref().map(|b| b.position()), Some(1));
        progress.clear();
        assert!(progress.bar.is_none());
    }

    #[test]
    fn test_default_is_disabled() {
        assert!(!Progress::default().is_enabled());
    }
}
