//! go.mod manifest model
//!
//! Handles:
//! - require statements (single and block), with the `// indirect` marker
//! - exclude directives (read-only)
//! - replace directives, including pinned self-replacements (read-only)
//! - in-place requirement edits and canonical formatting

use super::comment::{apply_indirect, CommentClauses};
use super::syntax::{self, unquote, Block, Comments, FileSyntax, Line, Stmt, StmtKind};
use crate::domain::version::{compare_versions, is_valid_version};
use crate::error::ManifestError;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Directives whose block lines are sorted by `format`
const SORTED_VERBS: &[&str] = &["require", "exclude", "replace"];

/// A `require` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// Module path
    pub path: String,
    /// Required version
    pub version: String,
    /// Whether the line carries the `// indirect` marker
    pub indirect: bool,
    /// 1-based source line, 0 for requirements added in memory
    pub line: usize,
}

/// An `exclude` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exclusion {
    pub path: String,
    pub version: String,
}

/// A `replace` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    pub old_path: String,
    pub old_version: Option<String>,
    pub new_path: String,
    pub new_version: Option<String>,
}

impl Replacement {
    /// A replacement of a module by itself pins it to `new_version`
    pub fn is_pin(&self) -> bool {
        self.old_path == self.new_path
    }
}

/// Location of a directive line in the syntax tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineRef {
    stmt: usize,
    /// Index inside a block, `None` for a top-level line
    line: Option<usize>,
}

impl LineRef {
    /// Number of leading tokens before the directive arguments
    fn arg_offset(&self) -> usize {
        if self.line.is_some() {
            0
        } else {
            1
        }
    }
}

/// An in-memory go.mod
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoMod {
    syntax: FileSyntax,
}

impl GoMod {
    /// Parse and validate go.mod content
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        let manifest = Self {
            syntax: syntax::parse(content)?,
        };
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<(), ManifestError> {
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (verb, args, line) in self.directives() {
            let line_no = line.line_no;
            match verb {
                "module" | "go" | "toolchain" if args.len() != 1 => {
                    return Err(ManifestError::parse(
                        line_no,
                        format!("usage: {} <value>", verb),
                    ));
                }
                "require" | "exclude" => {
                    if args.len() != 2 {
                        return Err(ManifestError::parse(
                            line_no,
                            format!("usage: {} module/path v1.2.3", verb),
                        ));
                    }
                    let path = unquote(&args[0]);
                    let version = unquote(&args[1]);
                    if !is_valid_version(&version) {
                        return Err(ManifestError::parse(
                            line_no,
                            format!("invalid version {} for {}", version, path),
                        ));
                    }
                    if verb == "require" {
                        if seen.contains_key(&path) {
                            return Err(ManifestError::DuplicateRequirement {
                                module: path,
                                line: line_no,
                            });
                        }
                        seen.insert(path, line_no);
                    }
                }
                "replace" => {
                    parse_replacement(args).ok_or_else(|| {
                        ManifestError::parse(
                            line_no,
                            "usage: replace module/path [v1.2.3] => other/module [v1.4.5] | local/dir",
                        )
                    })?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Every directive line as `(verb, arguments, line)`, in file order
    fn directives(&self) -> Vec<(&str, &[String], &Line)> {
        let mut out = Vec::new();
        for stmt in &self.syntax.stmts {
            match &stmt.kind {
                StmtKind::Line(line) => {
                    if let Some((verb, args)) = line.tokens.split_first() {
                        out.push((verb.as_str(), args, line));
                    }
                }
                StmtKind::Block(block) => {
                    for line in &block.lines {
                        out.push((block.verb.as_str(), line.tokens.as_slice(), line));
                    }
                }
                StmtKind::Comments(_) => {}
            }
        }
        out
    }

    /// Value of a single-argument directive such as `module` or `go`
    fn single_value(&self, verb: &str) -> Option<String> {
        self.directives()
            .into_iter()
            .find(|(v, args, _)| *v == verb && args.len() == 1)
            .map(|(_, args, _)| unquote(&args[0]))
    }

    /// The module path declared by this go.mod
    pub fn module_path(&self) -> Option<String> {
        self.single_value("module")
    }

    /// The `go` language version
    pub fn go_version(&self) -> Option<String> {
        self.single_value("go")
    }

    /// The `toolchain` directive
    pub fn toolchain(&self) -> Option<String> {
        self.single_value("toolchain")
    }

    /// All requirements in file order
    pub fn requirements(&self) -> Vec<Requirement> {
        self.directives()
            .into_iter()
            .filter(|(verb, args, _)| *verb == "require" && args.len() == 2)
            .map(|(_, args, line)| Requirement {
                path: unquote(&args[0]),
                version: unquote(&args[1]),
                indirect: CommentClauses::parse(line.comments.suffix.as_deref()).is_indirect(),
                line: line.line_no,
            })
            .collect()
    }

    /// The requirement for one module path
    pub fn requirement(&self, path: &str) -> Option<Requirement> {
        self.requirements().into_iter().find(|r| r.path == path)
    }

    /// All exclusions in file order
    pub fn exclusions(&self) -> Vec<Exclusion> {
        self.directives()
            .into_iter()
            .filter(|(verb, args, _)| *verb == "exclude" && args.len() == 2)
            .map(|(_, args, _)| Exclusion {
                path: unquote(&args[0]),
                version: unquote(&args[1]),
            })
            .collect()
    }

    /// Excluded versions grouped by module path
    pub fn exclusion_set(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut set: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for exclusion in self.exclusions() {
            set.entry(exclusion.path)
                .or_default()
                .insert(exclusion.version);
        }
        set
    }

    /// Excluded versions of one module
    pub fn excluded_versions(&self, path: &str) -> BTreeSet<String> {
        self.exclusion_set().remove(path).unwrap_or_default()
    }

    /// All replacements in file order
    pub fn replacements(&self) -> Vec<Replacement> {
        self.directives()
            .into_iter()
            .filter(|(verb, _, _)| *verb == "replace")
            .filter_map(|(_, args, _)| parse_replacement(args))
            .collect()
    }

    /// Modules replaced by themselves, mapped to the path they resolve to
    pub fn pins(&self) -> BTreeMap<String, String> {
        self.replacements()
            .into_iter()
            .filter(Replacement::is_pin)
            .map(|r| (r.old_path, r.new_path))
            .collect()
    }

    /// Returns true if the module is pinned by a self-replacement
    pub fn is_pinned(&self, path: &str) -> bool {
        self.pins().contains_key(path)
    }

    fn find_requirement(&self, path: &str) -> Option<LineRef> {
        for (stmt_idx, stmt) in self.syntax.stmts.iter().enumerate() {
            match &stmt.kind {
                StmtKind::Line(line) => {
                    if line.tokens.len() == 3
                        && line.tokens[0] == "require"
                        && unquote(&line.tokens[1]) == path
                    {
                        return Some(LineRef {
                            stmt: stmt_idx,
                            line: None,
                        });
                    }
                }
                StmtKind::Block(block) if block.verb == "require" => {
                    if let Some(line_idx) = block
                        .lines
                        .iter()
                        .position(|line| line.tokens.len() == 2 && unquote(&line.tokens[0]) == path)
                    {
                        return Some(LineRef {
                            stmt: stmt_idx,
                            line: Some(line_idx),
                        });
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn line_mut(&mut self, at: LineRef) -> Option<&mut Line> {
        match (&mut self.syntax.stmts.get_mut(at.stmt)?.kind, at.line) {
            (StmtKind::Line(line), None) => Some(line),
            (StmtKind::Block(block), Some(idx)) => block.lines.get_mut(idx),
            _ => None,
        }
    }

    /// Set the required version of a module
    ///
    /// An existing requirement is updated in place; otherwise the module is
    /// appended to the last `require` block (a lone `require` line is turned
    /// into a block), or a new `require` line is added at the end.
    pub fn add_or_update_requirement(
        &mut self,
        path: &str,
        version: &str,
    ) -> Result<(), ManifestError> {
        if !is_valid_version(version) {
            return Err(ManifestError::invalid_version(path, version));
        }

        if let Some(at) = self.find_requirement(path) {
            let offset = at.arg_offset();
            if let Some(line) = self.line_mut(at) {
                line.tokens[offset + 1] = auto_quote(version);
            }
            return Ok(());
        }

        let new_line = Line::new(vec![auto_quote(path), auto_quote(version)]);

        let last_require = self
            .syntax
            .stmts
            .iter()
            .rposition(|stmt| stmt.verb() == Some("require"));

        match last_require {
            Some(idx) => {
                let stmt = &mut self.syntax.stmts[idx];
                match &mut stmt.kind {
                    StmtKind::Block(block) => block.lines.push(new_line),
                    StmtKind::Line(existing) => {
                        let mut moved = existing.clone();
                        let before = std::mem::take(&mut moved.comments.before);
                        moved.tokens.remove(0);
                        let line_no = moved.line_no;
                        stmt.kind = StmtKind::Block(Block {
                            verb: "require".to_string(),
                            lines: vec![moved, new_line],
                            comments: Comments {
                                before,
                                suffix: None,
                            },
                            close_comments: Vec::new(),
                            line_no,
                        });
                    }
                    StmtKind::Comments(_) => {}
                }
            }
            None => {
                let mut tokens = vec!["require".to_string()];
                tokens.extend(new_line.tokens);
                self.syntax.stmts.push(Stmt {
                    kind: StmtKind::Line(Line::new(tokens)),
                    blank_before: true,
                });
            }
        }
        Ok(())
    }

    /// Remove every requirement line for a module; absent modules are ignored
    pub fn drop_requirement(&mut self, path: &str) {
        self.syntax.stmts.retain_mut(|stmt| match &mut stmt.kind {
            StmtKind::Line(line) => {
                !(line.tokens.len() == 3
                    && line.tokens[0] == "require"
                    && unquote(&line.tokens[1]) == path)
            }
            StmtKind::Block(block) => {
                if block.verb == "require" {
                    block
                        .lines
                        .retain(|line| line.tokens.is_empty() || unquote(&line.tokens[0]) != path);
                }
                true
            }
            StmtKind::Comments(_) => true,
        });
    }

    /// Add or remove the `// indirect` marker of a requirement
    ///
    /// Returns false when the module is not required.
    pub fn set_indirect(&mut self, path: &str, indirect: bool) -> bool {
        let Some(at) = self.find_requirement(path) else {
            return false;
        };
        match self.line_mut(at) {
            Some(line) => {
                line.comments.suffix = apply_indirect(line.comments.suffix.as_deref(), indirect);
                true
            }
            None => false,
        }
    }

    /// Sort the lines of require, exclude and replace blocks by module path
    pub fn sort_blocks(&mut self) {
        for stmt in &mut self.syntax.stmts {
            if let StmtKind::Block(block) = &mut stmt.kind {
                if SORTED_VERBS.contains(&block.verb.as_str()) {
                    block.lines.sort_by(|a, b| compare_line_tokens(&a.tokens, &b.tokens));
                }
            }
        }
    }

    /// Remove empty blocks and collapse single-line blocks into plain lines
    pub fn cleanup(&mut self) {
        let stmts = std::mem::take(&mut self.syntax.stmts);
        for mut stmt in stmts {
            if let StmtKind::Block(block) = &mut stmt.kind {
                if block.lines.is_empty() {
                    continue;
                }
                let collapsible = block.lines.len() == 1
                    && block.close_comments.iter().all(|c| c.is_empty())
                    && !(block.comments.suffix.is_some()
                        && block.lines[0].comments.suffix.is_some());
                if collapsible {
                    let mut inner = block.lines.remove(0);
                    let mut before = std::mem::take(&mut block.comments.before);
                    before.append(&mut inner.comments.before);
                    before.retain(|c| !c.is_empty());
                    let mut tokens = vec![block.verb.clone()];
                    tokens.append(&mut inner.tokens);
                    stmt.kind = StmtKind::Line(Line {
                        tokens,
                        comments: Comments {
                            before,
                            suffix: inner.comments.suffix.or(block.comments.suffix.take()),
                        },
                        line_no: inner.line_no,
                    });
                }
            }
            self.syntax.stmts.push(stmt);
        }
    }

    /// Canonicalize and render the manifest
    ///
    /// Formatting an already formatted manifest yields identical text.
    pub fn format(&mut self) -> String {
        self.sort_blocks();
        self.cleanup();
        syntax::render(&self.syntax)
    }
}

/// Order block lines token by token; version columns compare by semver
fn compare_line_tokens(a: &[String], b: &[String]) -> Ordering {
    for (ta, tb) in a.iter().zip(b) {
        let (ua, ub) = (unquote(ta), unquote(tb));
        let ord = if is_valid_version(&ua) && is_valid_version(&ub) {
            compare_versions(&ua, &ub).then_with(|| ua.cmp(&ub))
        } else {
            ua.cmp(&ub)
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

/// Split `old [v] => new [v]` replace arguments
fn parse_replacement(args: &[String]) -> Option<Replacement> {
    let arrow = args.iter().position(|t| t == "=>")?;
    let (old, new) = (&args[..arrow], &args[arrow + 1..]);
    if old.is_empty() || old.len() > 2 || new.is_empty() || new.len() > 2 {
        return None;
    }
    Some(Replacement {
        old_path: unquote(&old[0]),
        old_version: old.get(1).map(|v| unquote(v)),
        new_path: unquote(&new[0]),
        new_version: new.get(1).map(|v| unquote(v)),
    })
}

/// Quote a token when go.mod syntax requires it
fn auto_quote(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '`' | '(' | ')' | '\''))
        || value.contains("//")
        || value.contains("=>");
    if !needs_quotes {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}
