//! Go source header scanner
//!
//! Reads the package clause and the import declarations of a Go file,
//! recording the byte span of every import path literal so it can be
//! replaced without touching the rest of the file. Scanning stops at the
//! first declaration that is not an import.

use std::ops::Range;

/// One import spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Local name: an identifier, `_` or `.`
    pub alias: Option<String>,
    /// Import path with quotes removed
    pub path: String,
    /// Byte range of the quoted literal in the source
    pub span: Range<usize>,
    /// Quote character used in the source (`"` or `` ` ``)
    pub quote: char,
    /// 1-based line of the literal
    pub line: usize,
}

impl ImportSpec {
    /// Render a path literal in this spec's quote style
    pub fn literal(&self, path: &str) -> String {
        match self.quote {
            '`' => format!("`{}`", path),
            _ => format!("\"{}\"", path.replace('\\', "\\\\").replace('"', "\\\"")),
        }
    }
}

/// Package clause and imports of one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeader {
    pub package: String,
    pub imports: Vec<ImportSpec>,
}

/// A scan failure with its 1-based line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl ScanError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Str { value: String, quote: char },
    Punct(char),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    span: Range<usize>,
    line: usize,
}

/// Lexer for the subset of Go needed to read file headers
struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        let pos = if src.starts_with('\u{feff}') { 3 } else { 0 };
        Self { src, pos, line: 1 }
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) -> Result<(), ScanError> {
        loop {
            let rest = &self.src[self.pos..];
            if rest.starts_with("//") {
                while let Some(c) = self.peek_char() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else if rest.starts_with("/*") {
                let start_line = self.line;
                self.bump();
                self.bump();
                loop {
                    if self.src[self.pos..].starts_with("*/") {
                        self.bump();
                        self.bump();
                        break;
                    }
                    if self.bump().is_none() {
                        return Err(ScanError::new(start_line, "comment not terminated"));
                    }
                }
            } else if matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
                self.bump();
            } else {
                return Ok(());
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, ScanError> {
        self.skip_trivia()?;
        let start = self.pos;
        let line = self.line;
        let Some(c) = self.bump() else {
            return Ok(None);
        };

        let kind = if c == '_' || c.is_alphabetic() {
            while matches!(self.peek_char(), Some(c) if c == '_' || c.is_alphanumeric()) {
                self.bump();
            }
            TokenKind::Ident(self.src[start..self.pos].to_string())
        } else if c == '"' {
            let mut value = String::new();
            loop {
                match self.bump() {
                    Some('"') => break,
                    Some('\\') => match self.bump() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some(other) => value.push(other),
                        None => return Err(ScanError::new(line, "string literal not terminated")),
                    },
                    Some('\n') | None => {
                        return Err(ScanError::new(line, "string literal not terminated"))
                    }
                    Some(other) => value.push(other),
                }
            }
            TokenKind::Str { value, quote: '"' }
        } else if c == '`' {
            let mut value = String::new();
            loop {
                match self.bump() {
                    Some('`') => break,
                    Some(other) => value.push(other),
                    None => {
                        return Err(ScanError::new(line, "raw string literal not terminated"))
                    }
                }
            }
            TokenKind::Str { value, quote: '`' }
        } else {
            TokenKind::Punct(c)
        };

        Ok(Some(Token {
            kind,
            span: start..self.pos,
            line,
        }))
    }
}

/// Token stream with one token of lookahead
struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Option<Token>>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            lexer: Lexer::new(src),
            peeked: None,
        }
    }

    fn peek(&mut self) -> Result<Option<&Token>, ScanError> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token()?);
        }
        Ok(self.peeked.as_ref().and_then(Option::as_ref))
    }

    fn next(&mut self) -> Result<Option<Token>, ScanError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    fn line(&self) -> usize {
        self.lexer.line
    }

    fn skip_semicolons(&mut self) -> Result<(), ScanError> {
        while matches!(self.peek()?, Some(Token { kind: TokenKind::Punct(';'), .. })) {
            self.next()?;
        }
        Ok(())
    }

    fn package_clause(&mut self) -> Result<String, ScanError> {
        match self.next()? {
            Some(Token {
                kind: TokenKind::Ident(ref word),
                ..
            }) if word == "package" => {}
            Some(token) => {
                return Err(ScanError::new(token.line, "expected 'package'"));
            }
            None => return Err(ScanError::new(self.line(), "expected 'package'")),
        }
        match self.next()? {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => Ok(name),
            Some(token) => Err(ScanError::new(token.line, "expected package name")),
            None => Err(ScanError::new(self.line(), "expected package name")),
        }
    }

    fn import_spec(&mut self) -> Result<ImportSpec, ScanError> {
        let mut alias = None;
        let mut token = self.next()?;

        match token.as_ref().map(|t| &t.kind) {
            Some(TokenKind::Ident(name)) => {
                alias = Some(name.clone());
                token = self.next()?;
            }
            Some(TokenKind::Punct('.')) => {
                alias = Some(".".to_string());
                token = self.next()?;
            }
            _ => {}
        }

        match token {
            Some(Token {
                kind: TokenKind::Str { value, quote },
                span,
                line,
            }) => Ok(ImportSpec {
                alias,
                path: value,
                span,
                quote,
                line,
            }),
            Some(token) => Err(ScanError::new(token.line, "expected import path")),
            None => Err(ScanError::new(self.line(), "expected import path")),
        }
    }

    fn imports(&mut self) -> Result<Vec<ImportSpec>, ScanError> {
        let mut imports = Vec::new();
        loop {
            self.skip_semicolons()?;
            let is_import = matches!(
                self.peek()?,
                Some(Token { kind: TokenKind::Ident(word), .. }) if word == "import"
            );
            if !is_import {
                return Ok(imports);
            }
            self.next()?;

            let grouped = matches!(self.peek()?, Some(Token { kind: TokenKind::Punct('('), .. }));
            if !grouped {
                imports.push(self.import_spec()?);
                continue;
            }
            self.next()?;
            loop {
                self.skip_semicolons()?;
                match self.peek()? {
                    Some(Token {
                        kind: TokenKind::Punct(')'),
                        ..
                    }) => {
                        self.next()?;
                        break;
                    }
                    Some(_) => imports.push(self.import_spec()?),
                    None => return Err(ScanError::new(self.line(), "import block not closed")),
                }
            }
        }
    }
}

/// Scan the package clause and imports of a Go source file
pub fn scan(source: &str) -> Result<FileHeader, ScanError> {
    let mut parser = Parser::new(source);
    let package = parser.package_clause()?;
    let imports = parser.imports()?;
    Ok(FileHeader { package, imports })
}

/// Returns `path` moved from `old` to `new` when it is `old` or a package below it
///
/// Paths already under `new` are left alone, which matters when `new` is
/// itself below `old` (`example.com/mod` to `example.com/mod/v2`).
pub fn rewrite_path(path: &str, old: &str, new: &str) -> Option<String> {
    if is_within(path, new) {
        return None;
    }
    if path == old {
        return Some(new.to_string());
    }
    let rest = path.strip_prefix(old)?;
    if rest.starts_with('/') {
        Some(format!("{}{}", new, rest))
    } else {
        None
    }
}

fn is_within(path: &str, module: &str) -> bool {
    path == module
        || path
            .strip_prefix(module)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Replace matching import paths in `source`
///
/// Returns `None` when no import refers to `old`.
pub fn rewrite_source(source: &str, header: &FileHeader, old: &str, new: &str) -> Option<String> {
    let mut edits: Vec<(Range<usize>, String)> = header
        .imports
        .iter()
        .filter_map(|spec| {
            rewrite_path(&spec.path, old, new).map(|path| (spec.span.clone(), spec.literal(&path)))
        })
        .collect();

    if edits.is_empty() {
        return None;
    }

    edits.sort_by_key(|(span, _)| std::cmp::Reverse(span.start));
    let mut out = source.to_string();
    for (span, literal) in edits {
        out.replace_range(span, &literal);
    }
    Some(out)
}
