//! Semicolon-delimited clauses of a go.mod trailing comment
//!
//! `// indirect; keep until upstream fixes #12` holds two clauses. The Go
//! tooling only treats a requirement as indirect when `indirect` is the
//! first clause, so the marker is always inserted in front.

const INDIRECT: &str = "indirect";

/// The clauses of one trailing comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentClauses {
    clauses: Vec<String>,
}

impl CommentClauses {
    /// Split a trailing comment (with or without its `//`) into clauses
    pub fn parse(comment: Option<&str>) -> Self {
        let Some(comment) = comment else {
            return Self::default();
        };
        let body = comment.trim();
        let body = body.strip_prefix("//").unwrap_or(body);
        let clauses = body
            .split(';')
            .map(str::trim)
            .filter(|clause| !clause.is_empty())
            .map(str::to_string)
            .collect();
        Self { clauses }
    }

    /// The clauses in order
    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    /// Returns true if the first clause is the indirect marker
    pub fn is_indirect(&self) -> bool {
        self.clauses.first().map(String::as_str) == Some(INDIRECT)
    }

    /// Add or remove the indirect marker; returns true if anything changed
    pub fn set_indirect(&mut self, indirect: bool) -> bool {
        if self.is_indirect() == indirect {
            return false;
        }
        if indirect {
            self.clauses.insert(0, INDIRECT.to_string());
        } else {
            self.clauses.remove(0);
        }
        true
    }

    /// Render back to a `//` comment, `None` when no clause is left
    pub fn render(&self) -> Option<String> {
        if self.clauses.is_empty() {
            None
        } else {
            Some(format!("// {}", self.clauses.join("; ")))
        }
    }
}

/// Apply the indirect marker to a trailing comment
///
/// The comment is only re-rendered when the marker actually changes, so
/// human text on untouched lines keeps its exact spelling.
pub fn apply_indirect(suffix: Option<&str>, indirect: bool) -> Option<String> {
    let mut clauses = CommentClauses::parse(suffix);
    if clauses.set_indirect(indirect) {
        clauses.render()
    } else {
        suffix.map(str::to_string)
    }
}
