//! Mode-switching lexer. The parser is the sole writer of `mode`: one
//! lexer, a mode field, no global or thread-local tokenizer state.

mod g1;
mod g2;

use crate::error::ParseError;
use crate::position::Range;
use crate::reader::Reader;
use crate::token::{Mode, Token, TokenKind};

/// Produces tokens from source text under a grammar mode the parser
/// controls. Constructed fresh for every `Parser::parse` call — there is no
/// module-level or shared lexer state.
pub struct Lexer<'a> {
    reader: Reader<'a>,
    mode: Mode,
    consumed_any: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            reader: Reader::new(source),
            mode: Mode::G1,
            consumed_any: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch the grammar mode for subsequent token requests. The parser
    /// calls this at G1/G2/G1Line boundaries; the lexer never changes its
    /// own mode.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Current byte offset, used to position synthetic tokens the parser
    /// injects at the start of a document (the root-wrapping prelude).
    pub fn byte_offset(&self) -> usize {
        self.reader.byte_offset()
    }

    pub fn position(&self) -> crate::position::Position {
        self.reader.position()
    }

    pub fn source(&self) -> &'a str {
        self.reader.source()
    }

    /// Pull the next token under the current mode.
    pub fn next(&mut self) -> Result<Token, ParseError> {
        let at_document_start = !self.consumed_any;
        self.consumed_any = true;

        match self.mode {
            Mode::G1 => g1::next_token(&mut self.reader, false, at_document_start),
            Mode::G1Line => g1::next_token(&mut self.reader, true, false),
            Mode::G2 => g2::next_token(&mut self.reader),
        }
    }

    /// Lex an identifier in the "name" position right after a `#`, `##`,
    /// `@`, or `@@` token, regardless of the active mode. G1 has no
    /// general-purpose identifier token (free text is CharData), so the
    /// element/attribute name position is always read through this
    /// dedicated entry point rather than through `next()`.
    pub fn next_identifier(&mut self) -> Result<Token, ParseError> {
        self.consumed_any = true;
        while let Some(c) = self.reader.peek() {
            if c.is_whitespace() {
                self.reader.advance();
            } else {
                break;
            }
        }
        let start_offset = self.reader.byte_offset();
        let start_pos = self.reader.position();
        let mut text = String::new();
        while let Some(c) = self.reader.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                text.push(c);
                self.reader.advance();
            } else {
                break;
            }
        }
        if text.is_empty() {
            let range = Range::point(start_offset, start_pos);
            let found = match self.reader.peek() {
                Some(c) => TokenKind::CharData(c.to_string()),
                None => TokenKind::Eof,
            };
            return Err(ParseError::UnexpectedToken { range, found, expected: vec!["identifier"] });
        }
        Ok(Token::new(
            TokenKind::Identifier(text),
            Range::new(start_offset..self.reader.byte_offset(), start_pos, self.reader.position()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn starts_in_g1_mode() {
        let lexer = Lexer::new("hello");
        assert_eq!(lexer.mode(), Mode::G1);
    }

    #[test]
    fn preamble_recognized_on_first_token_only() {
        let mut lexer = Lexer::new("#!{}");
        let tok = lexer.next().unwrap();
        assert_eq!(tok.kind, TokenKind::G2Preamble);
    }

    #[test]
    fn mode_switch_changes_tokenization() {
        let mut lexer = Lexer::new("f(x)");
        lexer.set_mode(Mode::G2);
        let tok = lexer.next().unwrap();
        assert_eq!(tok.kind, TokenKind::Identifier("f".to_string()));
    }

    #[test]
    fn next_identifier_reads_name_after_hash() {
        let mut lexer = Lexer::new("#hello{}");
        let hash = lexer.next().unwrap();
        assert_eq!(hash.kind, TokenKind::DefineElement { forward: false });
        let name = lexer.next_identifier().unwrap();
        assert_eq!(name.kind, TokenKind::Identifier("hello".to_string()));
    }

    #[test]
    fn document_start_flag_does_not_retrigger_after_first_call() {
        let mut lexer = Lexer::new("a#!");
        let first = lexer.next().unwrap();
        assert_eq!(first.kind, TokenKind::CharData("a".to_string()));
        let second = lexer.next().unwrap();
        // Not at document start any more: '#' followed by '!' is just a
        // plain (non-forward) element declaration, not a G2Preamble.
        assert_eq!(second.kind, TokenKind::DefineElement { forward: false });
    }
}
