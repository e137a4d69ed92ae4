//! Token kinds produced by the lexer under each grammar mode.

use crate::position::Range;
use std::fmt;

/// The grammar mode the lexer is currently tokenizing under. Owned and
/// mutated by the parser between token requests: the lexer never decides
/// on its own to change mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    G1,
    G1Line,
    G2,
}

/// One lexical token, with the exact byte/line/column range it came from.
/// Synthetic tokens (the root-wrapping prelude) reuse the lexer's current
/// position as a zero-width range rather than leaving it absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range,
}

impl Token {
    pub fn new(kind: TokenKind, range: Range) -> Self {
        Self { kind, range }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    CharData(String),
    QuotedString(String),
    DefineElement { forward: bool },
    DefineAttribute { forward: bool },
    BlockStart,
    BlockEnd,
    GroupStart,
    GroupEnd,
    GenericStart,
    GenericEnd,
    Assign,
    Comma,
    G2Preamble,
    G2Arrow,
    G1LineEnd,
    Comment(String),
    Eof,
}

impl TokenKind {
    /// Short, stable label used in "expected one of: ..." diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            TokenKind::Identifier(_) => "identifier",
            TokenKind::CharData(_) => "text",
            TokenKind::QuotedString(_) => "quoted string",
            TokenKind::DefineElement { forward: false } => "'#'",
            TokenKind::DefineElement { forward: true } => "'##'",
            TokenKind::DefineAttribute { forward: false } => "'@'",
            TokenKind::DefineAttribute { forward: true } => "'@@'",
            TokenKind::BlockStart => "'{'",
            TokenKind::BlockEnd => "'}'",
            TokenKind::GroupStart => "'('",
            TokenKind::GroupEnd => "')'",
            TokenKind::GenericStart => "'<'",
            TokenKind::GenericEnd => "'>'",
            TokenKind::Assign => "'='",
            TokenKind::Comma => "','",
            TokenKind::G2Preamble => "'#!'",
            TokenKind::G2Arrow => "'->'",
            TokenKind::G1LineEnd => "end of line",
            TokenKind::Comment(_) => "comment",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
