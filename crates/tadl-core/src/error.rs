//! Error types for lexing and parsing, with source-context rendering.
//!
//! A concrete error enum (not a boxed/type-erased error), with a `Display`
//! impl that prints a snippet of source around the failing range and
//! `std::error::Error` for interop at call sites.

use crate::position::Range;
use crate::token::TokenKind;
use std::fmt;

/// Everything that can go wrong building a [`crate::tree::Tree`] from TADL
/// source, grouped into lexical, syntactic, and structural failures.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    // --- Lexical ---
    UnterminatedString { range: Range },
    InvalidEscape { range: Range, found: char },

    // --- Syntactic ---
    UnexpectedToken {
        range: Range,
        found: TokenKind,
        expected: Vec<&'static str>,
    },
    UnmatchedBracket { range: Range, bracket: &'static str },
    DuplicateAttribute { range: Range, key: String },
    ForwardAttributeNotAllowed { range: Range },
    NonForwardAttributeRequiresForward { range: Range },

    // --- Structural ---
    DanglingForwardingBuffer { range: Range },
    RootNotEnclosed { range: Range },
}

impl ParseError {
    /// The range every error variant carries, used to render context.
    /// Positions always point into the input, even for errors raised
    /// against a token the parser synthesized itself.
    pub fn range(&self) -> &Range {
        match self {
            ParseError::UnterminatedString { range }
            | ParseError::InvalidEscape { range, .. }
            | ParseError::UnexpectedToken { range, .. }
            | ParseError::UnmatchedBracket { range, .. }
            | ParseError::DuplicateAttribute { range, .. }
            | ParseError::ForwardAttributeNotAllowed { range }
            | ParseError::NonForwardAttributeRequiresForward { range }
            | ParseError::DanglingForwardingBuffer { range }
            | ParseError::RootNotEnclosed { range } => range,
        }
    }

    fn message(&self) -> String {
        match self {
            ParseError::UnterminatedString { .. } => "unterminated quoted string".to_string(),
            ParseError::InvalidEscape { found, .. } => {
                format!("invalid escape sequence '\\{}'", found)
            }
            ParseError::UnexpectedToken { found, expected, .. } => {
                format!(
                    "unexpected {}, expected one of: {}",
                    found.label(),
                    expected.join(", ")
                )
            }
            ParseError::UnmatchedBracket { bracket, .. } => {
                format!("unmatched bracket: missing closing {}", bracket)
            }
            ParseError::DuplicateAttribute { key, .. } => {
                format!("duplicate attribute '{}'", key)
            }
            ParseError::ForwardAttributeNotAllowed { .. } => {
                "forward attributes are not allowed here".to_string()
            }
            ParseError::NonForwardAttributeRequiresForward { .. } => {
                "this context requires a forward ('@@') attribute".to_string()
            }
            ParseError::DanglingForwardingBuffer { .. } => {
                "forwarding declaration was never attached to an element".to_string()
            }
            ParseError::RootNotEnclosed { .. } => {
                "document root must be enclosed in '{' '}'".to_string()
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message(), self.range().start)
    }
}

impl std::error::Error for ParseError {}

/// Render 2 lines of context before and after `range`, with a `>>` marker
/// on the line the error starts on.
pub fn format_source_context(source: &str, range: &Range) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = range.start.line;

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();
    for line_num in start_line..end_line {
        let marker = if line_num == error_line { ">>" } else { "  " };
        let display_line_num = line_num + 1;
        if let Some(line) = lines.get(line_num) {
            context.push_str(&format!("{} {:>4} | {}\n", marker, display_line_num, line));
        }
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn unexpected_token_message_lists_expected_set() {
        let err = ParseError::UnexpectedToken {
            range: Range::point(3, Position::new(0, 3)),
            found: TokenKind::Comma,
            expected: vec!["identifier", "'{'"],
        };
        assert_eq!(
            format!("{}", err),
            "unexpected ',', expected one of: identifier, '{' at 0:3"
        );
    }

    #[test]
    fn context_marks_error_line() {
        let source = "a\nb\nc\nd\ne";
        let range = Range::point(4, Position::new(2, 0));
        let ctx = format_source_context(source, &range);
        assert!(ctx.contains(">>    3 | c"));
        assert!(ctx.contains("   2 | b"));
    }
}
