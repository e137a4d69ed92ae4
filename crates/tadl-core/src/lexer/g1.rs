//! Tokenization rules for the `G1` (text-first) and `G1Line` grammar modes.
//!
//! `G1Line` is implemented as `G1` with `line_mode: true`: identical rules,
//! except an unescaped newline ends the scan and yields `G1LineEnd` instead
//! of being swallowed as ordinary whitespace.

use crate::error::ParseError;
use crate::position::{Position, Range};
use crate::reader::Reader;
use crate::token::{Token, TokenKind};

/// Produce the next token under G1 (or G1Line, when `line_mode` is set).
/// `at_document_start` enables the `#!` → `G2Preamble` special case, which
/// only applies to the first non-whitespace tokens of a document.
pub fn next_token(
    reader: &mut Reader,
    line_mode: bool,
    at_document_start: bool,
) -> Result<Token, ParseError> {
    skip_insignificant_whitespace(reader, line_mode);

    let start_offset = reader.byte_offset();
    let start_pos = reader.position();

    if reader.eof() {
        return Ok(eof_token(start_offset, start_pos));
    }

    if line_mode && reader.peek() == Some('\n') {
        reader.advance();
        return Ok(Token::new(
            TokenKind::G1LineEnd,
            Range::new(start_offset..reader.byte_offset(), start_pos, reader.position()),
        ));
    }

    match reader.peek().unwrap() {
        '#' => lex_hash(reader, start_offset, start_pos, at_document_start),
        '@' => lex_at(reader, start_offset, start_pos),
        '{' => single(reader, TokenKind::BlockStart, start_offset, start_pos),
        '}' => single(reader, TokenKind::BlockEnd, start_offset, start_pos),
        _ => lex_char_data(reader, line_mode, start_offset, start_pos),
    }
}

/// Skips whitespace that sits between structural tokens. In line mode, an
/// unescaped newline is significant (it ends the line) so it is left for
/// the caller to observe rather than swallowed here.
fn skip_insignificant_whitespace(reader: &mut Reader, line_mode: bool) {
    while let Some(c) = reader.peek() {
        if c.is_whitespace() && !(line_mode && c == '\n') {
            reader.advance();
        } else {
            break;
        }
    }
}

fn eof_token(offset: usize, pos: Position) -> Token {
    Token::new(TokenKind::Eof, Range::point(offset, pos))
}

fn single(reader: &mut Reader, kind: TokenKind, start_offset: usize, start_pos: Position) -> Result<Token, ParseError> {
    reader.advance();
    Ok(Token::new(
        kind,
        Range::new(start_offset..reader.byte_offset(), start_pos, reader.position()),
    ))
}

fn lex_hash(
    reader: &mut Reader,
    start_offset: usize,
    start_pos: Position,
    at_document_start: bool,
) -> Result<Token, ParseError> {
    reader.advance(); // consume '#'

    if at_document_start && reader.peek() == Some('!') {
        reader.advance();
        return Ok(Token::new(
            TokenKind::G2Preamble,
            Range::new(start_offset..reader.byte_offset(), start_pos, reader.position()),
        ));
    }

    if reader.peek() == Some('#') {
        reader.advance();
        return Ok(Token::new(
            TokenKind::DefineElement { forward: true },
            Range::new(start_offset..reader.byte_offset(), start_pos, reader.position()),
        ));
    }

    if reader.peek() == Some('?') {
        reader.advance();
        return lex_comment(reader, start_offset, start_pos);
    }

    Ok(Token::new(
        TokenKind::DefineElement { forward: false },
        Range::new(start_offset..reader.byte_offset(), start_pos, reader.position()),
    ))
}

/// `#?` comments run until the next `#` that would start a new element, the
/// enclosing `}`, or EOF, whichever comes first. Trailing whitespace is
/// excluded from the captured value.
fn lex_comment(reader: &mut Reader, start_offset: usize, start_pos: Position) -> Result<Token, ParseError> {
    let mut text = String::new();
    loop {
        match reader.peek() {
            None => break,
            Some('#') | Some('}') => break,
            Some(c) => {
                text.push(c);
                reader.advance();
            }
        }
    }
    let trimmed = text.trim_end().to_string();
    Ok(Token::new(
        TokenKind::Comment(trimmed),
        Range::new(start_offset..reader.byte_offset(), start_pos, reader.position()),
    ))
}

fn lex_at(reader: &mut Reader, start_offset: usize, start_pos: Position) -> Result<Token, ParseError> {
    reader.advance(); // consume '@'
    let forward = if reader.peek() == Some('@') {
        reader.advance();
        true
    } else {
        false
    };
    Ok(Token::new(
        TokenKind::DefineAttribute { forward },
        Range::new(start_offset..reader.byte_offset(), start_pos, reader.position()),
    ))
}

/// A run of free text, with `\#` and `\}` escapes. Stops at an unescaped
/// structural trigger character, EOF, or (in line mode) an unescaped
/// newline. Trailing whitespace right before the terminator is swallowed.
fn lex_char_data(
    reader: &mut Reader,
    line_mode: bool,
    start_offset: usize,
    start_pos: Position,
) -> Result<Token, ParseError> {
    let mut text = String::new();
    loop {
        match reader.peek() {
            None => break,
            Some('\n') if line_mode => break,
            Some('#') | Some('@') | Some('{') | Some('}') => break,
            Some('\\') => {
                reader.advance();
                match reader.peek() {
                    Some(c @ '#') | Some(c @ '}') => {
                        text.push(c);
                        reader.advance();
                    }
                    _ => text.push('\\'),
                }
            }
            Some(c) => {
                text.push(c);
                reader.advance();
            }
        }
    }
    let trimmed_len = text.trim_end().len();
    text.truncate(trimmed_len);
    Ok(Token::new(
        TokenKind::CharData(text),
        Range::new(start_offset..reader.byte_offset(), start_pos, reader.position()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str, line_mode: bool) -> Vec<TokenKind> {
        let mut reader = Reader::new(source);
        let mut out = Vec::new();
        let mut at_start = true;
        loop {
            let tok = next_token(&mut reader, line_mode, at_start).unwrap();
            at_start = false;
            let done = matches!(tok.kind, TokenKind::Eof | TokenKind::G1LineEnd);
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn preamble_only_at_document_start() {
        let toks = lex_all("#!", false);
        assert_eq!(toks, vec![TokenKind::G2Preamble, TokenKind::Eof]);
    }

    #[test]
    fn forward_and_plain_element() {
        let toks = lex_all("##x", false);
        assert_eq!(
            toks[0],
            TokenKind::DefineElement { forward: true }
        );
        let toks = lex_all("#x", false);
        assert_eq!(toks[0], TokenKind::DefineElement { forward: false });
    }

    #[test]
    fn comment_stops_before_hash_or_brace() {
        let toks = lex_all("#? a comment  #next", false);
        assert_eq!(toks[0], TokenKind::Comment("a comment".to_string()));
    }

    #[test]
    fn comment_stops_at_eof() {
        let toks = lex_all("#? trailing  ", false);
        assert_eq!(toks[0], TokenKind::Comment("trailing".to_string()));
    }

    #[test]
    fn char_data_preserves_interior_whitespace_trims_trailing() {
        let toks = lex_all("hello world   #x", false);
        assert_eq!(toks[0], TokenKind::CharData("hello world".to_string()));
    }

    #[test]
    fn char_data_handles_escapes() {
        let toks = lex_all(r"a\#b\}c{", false);
        assert_eq!(toks[0], TokenKind::CharData("a#b}c".to_string()));
        assert_eq!(toks[1], TokenKind::BlockStart);
    }

    #[test]
    fn line_mode_ends_at_newline() {
        let toks = lex_all("type T\nafter", true);
        assert_eq!(toks[0], TokenKind::CharData("type T".to_string()));
        assert_eq!(toks[1], TokenKind::G1LineEnd);
    }

    #[test]
    fn forward_attribute_tokens() {
        let toks = lex_all("@@id", false);
        assert_eq!(toks[0], TokenKind::DefineAttribute { forward: true });
    }
}
