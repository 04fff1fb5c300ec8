//! go.mod syntax tree
//!
//! go.mod is line oriented: every directive is either a single line
//! (`require example.com/mod v1.2.3`) or a parenthesized block whose
//! body lines omit the verb. Comments are kept attached to the line
//! they precede (`before`) or end (`suffix`) so a parse/format cycle
//! does not lose them.

use crate::error::ManifestError;

/// Directives accepted at the top level of a go.mod file
const KNOWN_VERBS: &[&str] = &[
    "module",
    "go",
    "toolchain",
    "godebug",
    "require",
    "exclude",
    "replace",
    "retract",
    "tool",
    "ignore",
];

/// Directives that may open a `verb (` block
const BLOCK_VERBS: &[&str] = &[
    "godebug", "require", "exclude", "replace", "retract", "tool", "ignore",
];

/// Comments attached to a line or block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
    /// Whole-line comments directly above, each including its `//`;
    /// an empty entry is a blank line inside a block
    pub before: Vec<String>,
    /// Trailing comment on the same line, including its `//`
    pub suffix: Option<String>,
}

/// A single directive line, either top level or inside a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Raw tokens; for top-level lines the first token is the verb
    pub tokens: Vec<String>,
    pub comments: Comments,
    /// 1-based line number in the parsed source, 0 for lines added in memory
    pub line_no: usize,
}

impl Line {
    /// Creates an in-memory line from raw tokens
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            comments: Comments::default(),
            line_no: 0,
        }
    }
}

/// A `verb ( ... )` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub verb: String,
    pub lines: Vec<Line>,
    /// Comments on the `verb (` line
    pub comments: Comments,
    /// Whole-line comments directly before the closing `)`
    pub close_comments: Vec<String>,
    pub line_no: usize,
}

/// A top-level statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmtKind {
    Line(Line),
    Block(Block),
    /// A free-standing comment group not attached to any directive
    Comments(Vec<String>),
}

/// A top-level statement and the spacing in front of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    pub kind: StmtKind,
    /// Whether one or more blank lines precede the statement
    pub blank_before: bool,
}

impl Stmt {
    /// The directive verb of a line or block
    pub fn verb(&self) -> Option<&str> {
        match &self.kind {
            StmtKind::Line(line) => line.tokens.first().map(String::as_str),
            StmtKind::Block(block) => Some(block.verb.as_str()),
            StmtKind::Comments(_) => None,
        }
    }
}

/// The whole parsed file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSyntax {
    pub stmts: Vec<Stmt>,
}

/// One source line split into tokens and an optional trailing comment
#[derive(Debug)]
struct LexedLine {
    tokens: Vec<String>,
    comment: Option<String>,
}

fn lex_line(text: &str, line_no: usize) -> Result<LexedLine, ManifestError> {
    let mut tokens = Vec::new();
    let mut comment = None;
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c == b' ' || c == b'\t' || c == b'\r' {
            i += 1;
            continue;
        }
        if bytes[i..].starts_with(b"//") {
            comment = Some(text[i..].trim_end().to_string());
            break;
        }
        if bytes[i..].starts_with(b"=>") {
            tokens.push("=>".to_string());
            i += 2;
            continue;
        }
        if c == b'(' || c == b')' {
            tokens.push((c as char).to_string());
            i += 1;
            continue;
        }
        if c == b'"' || c == b'`' {
            let end = find_closing_quote(bytes, i).ok_or_else(|| {
                ManifestError::parse(line_no, "unterminated quoted string")
            })?;
            tokens.push(text[i..=end].to_string());
            i = end + 1;
            continue;
        }

        let start = i;
        while i < bytes.len() {
            let c = bytes[i];
            if c == b' ' || c == b'\t' || c == b'\r' || c == b'"' || c == b'`' || c == b'(' || c == b')'
            {
                break;
            }
            if bytes[i..].starts_with(b"//") || bytes[i..].starts_with(b"=>") {
                break;
            }
            i += 1;
        }
        tokens.push(text[start..i].to_string());
    }

    Ok(LexedLine { tokens, comment })
}

fn find_closing_quote(bytes: &[u8], open: usize) -> Option<usize> {
    let quote = bytes[open];
    let mut i = open + 1;
    while i < bytes.len() {
        if quote == b'"' && bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i] == quote {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Strip Go string quoting from a token
pub fn unquote(token: &str) -> String {
    if token.len() >= 2 && token.starts_with('`') && token.ends_with('`') {
        return token[1..token.len() - 1].to_string();
    }
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        let inner = &token[1..token.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => {}
                }
            } else {
                out.push(c);
            }
        }
        return out;
    }
    token.to_string()
}

/// Parse go.mod source into a syntax tree
pub fn parse(content: &str) -> Result<FileSyntax, ManifestError> {
    let mut stmts: Vec<Stmt> = Vec::new();
    let mut pending_comments: Vec<String> = Vec::new();
    let mut blank_before = false;
    let mut open_block: Option<(Block, bool)> = None;
    let mut block_pending: Vec<String> = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let lexed = lex_line(raw, line_no)?;

        if let Some((block, _)) = open_block.as_mut() {
            if lexed.tokens.is_empty() {
                match lexed.comment {
                    Some(comment) => block_pending.push(comment),
                    // blank line, kept as an empty entry
                    None if block_pending.last().is_some_and(|c| c.is_empty()) => {}
                    None => block_pending.push(String::new()),
                }
                continue;
            }
            if lexed.tokens.len() == 1 && lexed.tokens[0] == ")" {
                block.close_comments = std::mem::take(&mut block_pending);
                if let Some((block, blank)) = open_block.take() {
                    stmts.push(Stmt {
                        kind: StmtKind::Block(block),
                        blank_before: blank,
                    });
                }
                continue;
            }
            if lexed.tokens.iter().any(|t| t == "(" || t == ")") {
                return Err(ManifestError::parse(line_no, "unexpected parenthesis in block"));
            }
            block.lines.push(Line {
                tokens: lexed.tokens,
                comments: Comments {
                    before: std::mem::take(&mut block_pending),
                    suffix: lexed.comment,
                },
                line_no,
            });
            continue;
        }

        if lexed.tokens.is_empty() {
            match lexed.comment {
                Some(comment) => pending_comments.push(comment),
                None => {
                    if !pending_comments.is_empty() {
                        stmts.push(Stmt {
                            kind: StmtKind::Comments(std::mem::take(&mut pending_comments)),
                            blank_before,
                        });
                    }
                    blank_before = !stmts.is_empty();
                }
            }
            continue;
        }

        let verb = lexed.tokens[0].as_str();
        if verb == ")" || verb == "(" {
            return Err(ManifestError::parse(line_no, "unexpected parenthesis"));
        }
        if !KNOWN_VERBS.contains(&verb) {
            return Err(ManifestError::parse(
                line_no,
                format!("unknown directive: {}", verb),
            ));
        }

        let comments = Comments {
            before: std::mem::take(&mut pending_comments),
            suffix: lexed.comment,
        };

        if lexed.tokens.len() == 2 && lexed.tokens[1] == "(" {
            if !BLOCK_VERBS.contains(&verb) {
                return Err(ManifestError::parse(
                    line_no,
                    format!("{} directive cannot be a block", verb),
                ));
            }
            open_block = Some((
                Block {
                    verb: verb.to_string(),
                    lines: Vec::new(),
                    comments,
                    close_comments: Vec::new(),
                    line_no,
                },
                blank_before,
            ));
        } else {
            if lexed.tokens.iter().any(|t| t == "(" || t == ")") {
                return Err(ManifestError::parse(line_no, "unexpected parenthesis"));
            }
            stmts.push(Stmt {
                kind: StmtKind::Line(Line {
                    tokens: lexed.tokens,
                    comments,
                    line_no,
                }),
                blank_before,
            });
        }
        blank_before = false;
    }

    if let Some((block, _)) = open_block {
        return Err(ManifestError::parse(
            block.line_no,
            format!("unterminated {} block", block.verb),
        ));
    }
    if !pending_comments.is_empty() {
        stmts.push(Stmt {
            kind: StmtKind::Comments(pending_comments),
            blank_before,
        });
    }

    Ok(FileSyntax { stmts })
}

fn render_comments_before(out: &mut String, before: &[String], indent: &str) {
    for comment in before {
        if !comment.is_empty() {
            out.push_str(indent);
            out.push_str(comment);
        }
        out.push('\n');
    }
}

fn render_line(out: &mut String, line: &Line, indent: &str) {
    render_comments_before(out, &line.comments.before, indent);
    out.push_str(indent);
    out.push_str(&line.tokens.join(" "));
    if let Some(suffix) = &line.comments.suffix {
        out.push(' ');
        out.push_str(suffix);
    }
    out.push('\n');
}

/// Render the syntax tree back to go.mod text
pub fn render(file: &FileSyntax) -> String {
    let mut out = String::new();

    for (idx, stmt) in file.stmts.iter().enumerate() {
        if idx > 0 && stmt.blank_before {
            out.push('\n');
        }
        match &stmt.kind {
            StmtKind::Comments(comments) => render_comments_before(&mut out, comments, ""),
            StmtKind::Line(line) => render_line(&mut out, line, ""),
            StmtKind::Block(block) => {
                render_comments_before(&mut out, &block.comments.before, "");
                out.push_str(&block.verb);
                out.push_str(" (");
                if let Some(suffix) = &block.comments.suffix {
                    out.push(' ');
                    out.push_str(suffix);
                }
                out.push('\n');
                for line in &block.lines {
                    render_line(&mut out, line, "\t");
                }
                render_comments_before(&mut out, &block.close_comments, "\t");
                out.push_str(")\n");
            }
        }
    }

    out
}
