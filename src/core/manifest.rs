//! `go.mod` manifest parsing.
//!
//! The parser is line oriented: every statement is either a single line
//! (`require example.com/a v1.0.0`) or a parenthesized block whose entries
//! each sit on their own line. Only the pieces the dependency model needs are
//! kept; `go`, `toolchain`, `godebug`, `retract`, `tool` and `ignore` are
//! validated loosely and otherwise skipped.

use std::path::{Path, PathBuf};

use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::core::location::FilePosition;
use crate::core::module_ref::ModuleRef;

/// Conventional manifest file name.
pub const MANIFEST_NAME: &str = "go.mod";

/// Error reading or parsing a manifest.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ManifestError {
    #[error("failed to read manifest {}", path.display())]
    #[diagnostic(code(modcheck::manifest::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}:{row}:{col}: {message}")]
    #[diagnostic(code(modcheck::manifest::syntax))]
    Syntax {
        file: String,
        row: usize,
        col: usize,
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },
}

/// A `require` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Require {
    pub module: ModuleRef,
    pub indirect: bool,
    pub position: FilePosition,
}

/// A `replace` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replace {
    pub old_path: String,
    /// Version pinned on the left-hand side; `None` replaces every version
    pub old_version: Option<String>,
    pub new: ModuleRef,
    pub position: FilePosition,
}

impl Replace {
    /// Whether this replace only applies to one specific version.
    pub fn is_targeted(&self) -> bool {
        self.old_version.is_some()
    }
}

/// A parsed manifest.
#[derive(Debug, Clone, Default)]
pub struct ModFile {
    /// Declared module path
    pub module: String,

    /// Language version from the `go` directive
    pub go_version: Option<String>,

    /// Require entries, in file order
    pub requires: Vec<Require>,

    /// Replace entries, in file order
    pub replaces: Vec<Replace>,
}

impl ModFile {
    /// Read and parse a manifest from disk.
    pub fn load(path: &Path) -> Result<ModFile, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        ModFile::parse(&path.display().to_string(), &contents)
    }

    /// Parse manifest text. `file` is only used in error messages.
    pub fn parse(file: &str, contents: &str) -> Result<ModFile, ManifestError> {
        Parser {
            file,
            contents,
            result: ModFile::default(),
            has_module: false,
        }
        .run()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Ident,
    Str,
    LParen,
    RParen,
    Arrow,
    Punct,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    text: String,
    col: usize,
    offset: usize,
    len: usize,
}

impl Token {
    fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Ident | TokenKind::Str)
    }
}

#[derive(Debug)]
struct Line {
    row: usize,
    tokens: Vec<Token>,
    comment: Option<String>,
}

/// A lexing or parsing failure before it is tied to the source text.
struct SyntaxError {
    message: String,
    row: usize,
    col: usize,
    offset: usize,
    len: usize,
}

impl SyntaxError {
    fn at(token: &Token, row: usize, message: impl Into<String>) -> Self {
        SyntaxError {
            message: message.into(),
            row,
            col: token.col,
            offset: token.offset,
            len: token.len,
        }
    }
}

const BLOCK_VERBS: &[&str] = &[
    "require", "exclude", "replace", "retract", "godebug", "tool", "ignore",
];

struct Parser<'a> {
    file: &'a str,
    contents: &'a str,
    result: ModFile,
    has_module: bool,
}

impl<'a> Parser<'a> {
    fn run(mut self) -> Result<ModFile, ManifestError> {
        match self.parse_lines() {
            Ok(()) => Ok(self.result),
            Err(e) => Err(self.to_error(e)),
        }
    }

    fn to_error(&self, e: SyntaxError) -> ManifestError {
        ManifestError::Syntax {
            file: self.file.to_string(),
            row: e.row,
            col: e.col,
            message: e.message,
            src: NamedSource::new(self.file, self.contents.to_string()),
            span: (e.offset, e.len).into(),
        }
    }

    fn parse_lines(&mut self) -> Result<(), SyntaxError> {
        let lines = lex(self.contents)?;
        let mut i = 0;

        while i < lines.len() {
            let line = &lines[i];
            i += 1;

            let Some(verb) = line.tokens.first() else {
                continue;
            };
            if verb.kind != TokenKind::Ident {
                return Err(SyntaxError::at(verb, line.row, "unexpected token"));
            }

            let opens_block = line
                .tokens
                .get(1)
                .is_some_and(|t| t.kind == TokenKind::LParen);

            if !opens_block {
                self.directive(&verb.text, line, &line.tokens[1..], verb)?;
                continue;
            }

            if !BLOCK_VERBS.contains(&verb.text.as_str()) {
                return Err(SyntaxError::at(
                    verb,
                    line.row,
                    format!("{} does not accept a block", verb.text),
                ));
            }

            match line.tokens.len() {
                2 => {}
                3 if line.tokens[2].kind == TokenKind::RParen => continue,
                _ => {
                    return Err(SyntaxError::at(
                        &line.tokens[2],
                        line.row,
                        "unexpected token after '('",
                    ))
                }
            }

            let mut closed = false;
            while i < lines.len() {
                let entry = &lines[i];
                i += 1;

                let Some(first) = entry.tokens.first() else {
                    continue;
                };
                if first.kind == TokenKind::RParen {
                    if let Some(extra) = entry.tokens.get(1) {
                        return Err(SyntaxError::at(extra, entry.row, "unexpected token after ')'"));
                    }
                    closed = true;
                    break;
                }
                self.directive(&verb.text, entry, &entry.tokens, first)?;
            }

            if !closed {
                return Err(SyntaxError::at(
                    &line.tokens[1],
                    line.row,
                    format!("unterminated {} block", verb.text),
                ));
            }
        }

        if !self.has_module {
            return Err(SyntaxError {
                message: "no module declaration".to_string(),
                row: 1,
                col: 1,
                offset: 0,
                len: 0,
            });
        }

        Ok(())
    }

    /// Handle one statement. `start` is the token whose position is recorded
    /// for the statement.
    fn directive(
        &mut self,
        verb: &str,
        line: &Line,
        args: &[Token],
        start: &Token,
    ) -> Result<(), SyntaxError> {
        let row = line.row;
        let position = FilePosition::new(row, start.col);

        match verb {
            "module" => {
                let [path] = words::<1>(args).ok_or_else(|| {
                    SyntaxError::at(start, row, "usage: module module/path")
                })?;
                if self.has_module {
                    return Err(SyntaxError::at(start, row, "repeated module statement"));
                }
                self.has_module = true;
                self.result.module = path.text.clone();
            }

            "go" => {
                let [version] = words::<1>(args)
                    .ok_or_else(|| SyntaxError::at(start, row, "usage: go 1.23"))?;
                self.result.go_version = Some(version.text.clone());
            }

            "toolchain" | "tool" | "ignore" => {
                if words::<1>(args).is_none() {
                    return Err(SyntaxError::at(
                        start,
                        row,
                        format!("usage: {} name", verb),
                    ));
                }
            }

            "godebug" | "retract" => {
                if args.is_empty() {
                    return Err(SyntaxError::at(start, row, format!("usage: {} ...", verb)));
                }
            }

            "require" => {
                let [path, version] = words::<2>(args).ok_or_else(|| {
                    SyntaxError::at(start, row, "usage: require module/path v1.2.3")
                })?;
                self.result.requires.push(Require {
                    module: ModuleRef::new(&path.text, &version.text),
                    indirect: is_indirect(line.comment.as_deref()),
                    position,
                });
            }

            // Exclusions never change what a require line declares.
            "exclude" => {
                if words::<2>(args).is_none() {
                    return Err(SyntaxError::at(
                        start,
                        row,
                        "usage: exclude module/path v1.2.3",
                    ));
                }
            }

            "replace" => {
                let replace = parse_replace(args, start, row, position)?;
                self.result.replaces.push(replace);
            }

            other => {
                return Err(SyntaxError::at(
                    start,
                    row,
                    format!("unknown directive: {}", other),
                ));
            }
        }

        Ok(())
    }
}

const REPLACE_USAGE: &str = "usage: replace module/path [v1.2.3] => other/module v1.4\n\
                             \t or replace module/path [v1.2.3] => ../local/directory";

fn parse_replace(
    args: &[Token],
    start: &Token,
    row: usize,
    position: FilePosition,
) -> Result<Replace, SyntaxError> {
    let usage = || SyntaxError::at(start, row, REPLACE_USAGE);

    let arrow = args
        .iter()
        .position(|t| t.kind == TokenKind::Arrow)
        .ok_or_else(usage)?;
    let (old, new) = (&args[..arrow], &args[arrow + 1..]);

    if !(1..=2).contains(&old.len()) || !(1..=2).contains(&new.len()) {
        return Err(usage());
    }
    if !old.iter().chain(new).all(Token::is_word) {
        return Err(usage());
    }

    let new_ref = if new.len() == 2 {
        ModuleRef::new(&new[0].text, &new[1].text)
    } else {
        if !is_directory_path(&new[0].text) {
            return Err(SyntaxError::at(
                &new[0],
                row,
                "replacement module without version must be directory path \
                 (rooted or starting with ./ or ../)",
            ));
        }
        ModuleRef::unversioned(&new[0].text)
    };

    Ok(Replace {
        old_path: old[0].text.clone(),
        old_version: old.get(1).map(|t| t.text.clone()),
        new: new_ref,
        position,
    })
}

/// Match exactly `N` word tokens.
fn words<const N: usize>(args: &[Token]) -> Option<[&Token; N]> {
    if args.len() != N || !args.iter().all(Token::is_word) {
        return None;
    }
    let mut out = [&args[0]; N];
    for (slot, token) in out.iter_mut().zip(args) {
        *slot = token;
    }
    Some(out)
}

fn is_indirect(comment: Option<&str>) -> bool {
    let Some(comment) = comment else {
        return false;
    };
    // `comment` follows the `//`; a marker glued to it doesn't count.
    let text = format!("//{}", comment);
    let fields: Vec<&str> = text.split_whitespace().collect();
    match fields.as_slice() {
        [_, "indirect"] => true,
        [_, "indirect;", _, ..] => true,
        _ => false,
    }
}

fn is_directory_path(path: &str) -> bool {
    let bytes = path.as_bytes();
    path == "."
        || path == ".."
        || path.starts_with("./")
        || path.starts_with("../")
        || path.starts_with('/')
        || path.starts_with(".\\")
        || path.starts_with("..\\")
        || path.starts_with('\\')
        || (bytes.len() >= 3
            && bytes[0].is_ascii_alphabetic()
            && bytes[1] == b':'
            && (bytes[2] == b'\\' || bytes[2] == b'/'))
}

fn lex(contents: &str) -> Result<Vec<Line>, SyntaxError> {
    let mut lines = Vec::new();
    let mut offset = 0;

    for (idx, raw) in contents.split_inclusive('\n').enumerate() {
        let text = raw.trim_end_matches(['\n', '\r']);
        lines.push(lex_line(idx + 1, offset, text)?);
        offset += raw.len();
    }

    Ok(lines)
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | ',' | '"' | '`')
}

fn lex_line(row: usize, line_offset: usize, text: &str) -> Result<Line, SyntaxError> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut tokens = Vec::new();
    let mut comment = None;
    let mut i = 0;

    let byte_at = |i: usize| chars.get(i).map_or(text.len(), |(b, _)| *b);

    while i < chars.len() {
        let (start_byte, c) = chars[i];
        let col = i + 1;
        let offset = line_offset + start_byte;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if text[start_byte..].starts_with("//") {
            comment = Some(text[start_byte + 2..].to_string());
            break;
        }

        if text[start_byte..].starts_with("=>") {
            tokens.push(Token {
                kind: TokenKind::Arrow,
                text: "=>".to_string(),
                col,
                offset,
                len: 2,
            });
            i += 2;
            continue;
        }

        match c {
            '(' | ')' | '[' | ']' | ',' => {
                let kind = match c {
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    _ => TokenKind::Punct,
                };
                tokens.push(Token {
                    kind,
                    text: c.to_string(),
                    col,
                    offset,
                    len: 1,
                });
                i += 1;
            }

            '"' | '`' => {
                let mut value = String::new();
                let mut j = i + 1;
                let mut closed = false;

                while j < chars.len() {
                    let ch = chars[j].1;
                    if ch == c {
                        closed = true;
                        break;
                    }
                    if c == '"' && ch == '\\' {
                        j += 1;
                        let Some(&(_, escaped)) = chars.get(j) else {
                            break;
                        };
                        value.push(match escaped {
                            'n' => '\n',
                            't' => '\t',
                            other => other,
                        });
                    } else {
                        value.push(ch);
                    }
                    j += 1;
                }

                if !closed {
                    return Err(SyntaxError {
                        message: "unterminated quoted string".to_string(),
                        row,
                        col,
                        offset,
                        len: text.len() - start_byte,
                    });
                }

                tokens.push(Token {
                    kind: TokenKind::Str,
                    text: value,
                    col,
                    offset,
                    len: byte_at(j + 1) - start_byte,
                });
                i = j + 1;
            }

            _ => {
                let mut j = i;
                while j < chars.len() {
                    let rest = &text[chars[j].0..];
                    if is_delimiter(chars[j].1) || rest.starts_with("//") || rest.starts_with("=>")
                    {
                        break;
                    }
                    j += 1;
                }

                let end_byte = byte_at(j);
                tokens.push(Token {
                    kind: TokenKind::Ident,
                    text: text[start_byte..end_byte].to_string(),
                    col,
                    offset,
                    len: end_byte - start_byte,
                });
                i = j;
            }
        }
    }

    Ok(Line {
        row,
        tokens,
        comment,
    })
}
