//! Tokenization rules for the `G2` (node-first) grammar mode.

use crate::error::ParseError;
use crate::position::{Position, Range};
use crate::reader::Reader;
use crate::token::{Token, TokenKind};

pub fn next_token(reader: &mut Reader) -> Result<Token, ParseError> {
    loop {
        skip_whitespace(reader);
        if reader.peek() == Some('/') && peek_second(reader) == Some('/') {
            skip_line_comment(reader);
            continue;
        }
        break;
    }

    let start_offset = reader.byte_offset();
    let start_pos = reader.position();

    let Some(c) = reader.peek() else {
        return Ok(Token::new(TokenKind::Eof, Range::point(start_offset, start_pos)));
    };

    match c {
        '#' => lex_hash(reader, start_offset, start_pos),
        '@' => lex_at(reader, start_offset, start_pos),
        '"' => lex_quoted_string(reader, start_offset, start_pos),
        '{' => single(reader, TokenKind::BlockStart, start_offset, start_pos),
        '}' => single(reader, TokenKind::BlockEnd, start_offset, start_pos),
        '(' => single(reader, TokenKind::GroupStart, start_offset, start_pos),
        ')' => single(reader, TokenKind::GroupEnd, start_offset, start_pos),
        '<' => single(reader, TokenKind::GenericStart, start_offset, start_pos),
        '>' => single(reader, TokenKind::GenericEnd, start_offset, start_pos),
        ',' => single(reader, TokenKind::Comma, start_offset, start_pos),
        '=' => single(reader, TokenKind::Assign, start_offset, start_pos),
        '-' if peek_second(reader) == Some('>') => {
            reader.advance();
            reader.advance();
            Ok(Token::new(
                TokenKind::G2Arrow,
                Range::new(start_offset..reader.byte_offset(), start_pos, reader.position()),
            ))
        }
        c if is_identifier_char(c) => lex_identifier(reader, start_offset, start_pos),
        other => Err(ParseError::UnexpectedToken {
            range: Range::point(start_offset, start_pos),
            found: TokenKind::CharData(other.to_string()),
            expected: vec!["identifier", "quoted string", "bracket", "attribute"],
        }),
    }
}

fn peek_second(reader: &Reader) -> Option<char> {
    reader.peek2()
}

fn skip_whitespace(reader: &mut Reader) {
    while let Some(c) = reader.peek() {
        if c.is_whitespace() {
            reader.advance();
        } else {
            break;
        }
    }
}

fn skip_line_comment(reader: &mut Reader) {
    reader.advance(); // first '/'
    reader.advance(); // second '/'
    while let Some(c) = reader.peek() {
        if c == '\n' {
            break;
        }
        reader.advance();
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn single(reader: &mut Reader, kind: TokenKind, start_offset: usize, start_pos: Position) -> Result<Token, ParseError> {
    reader.advance();
    Ok(Token::new(
        kind,
        Range::new(start_offset..reader.byte_offset(), start_pos, reader.position()),
    ))
}

fn lex_hash(reader: &mut Reader, start_offset: usize, start_pos: Position) -> Result<Token, ParseError> {
    reader.advance(); // consume '#'
    let forward = if reader.peek() == Some('#') {
        reader.advance();
        true
    } else {
        false
    };
    Ok(Token::new(
        TokenKind::DefineElement { forward },
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

fn lex_identifier(reader: &mut Reader, start_offset: usize, start_pos: Position) -> Result<Token, ParseError> {
    let mut text = String::new();
    while let Some(c) = reader.peek() {
        if is_identifier_char(c) {
            text.push(c);
            reader.advance();
        } else {
            break;
        }
    }
    Ok(Token::new(
        TokenKind::Identifier(text),
        Range::new(start_offset..reader.byte_offset(), start_pos, reader.position()),
    ))
}

fn lex_quoted_string(reader: &mut Reader, start_offset: usize, start_pos: Position) -> Result<Token, ParseError> {
    reader.advance(); // opening '"'
    let mut text = String::new();
    loop {
        match reader.peek() {
            None => {
                return Err(ParseError::UnterminatedString {
                    range: Range::new(start_offset..reader.byte_offset(), start_pos, reader.position()),
                });
            }
            Some('"') => {
                reader.advance();
                break;
            }
            Some('\\') => {
                reader.advance();
                match reader.peek() {
                    Some(c @ '"') | Some(c @ '\\') => {
                        text.push(c);
                        reader.advance();
                    }
                    Some(other) => {
                        return Err(ParseError::InvalidEscape {
                            range: Range::point(reader.byte_offset(), reader.position()),
                            found: other,
                        });
                    }
                    None => {
                        return Err(ParseError::UnterminatedString {
                            range: Range::new(start_offset..reader.byte_offset(), start_pos, reader.position()),
                        });
                    }
                }
            }
            Some(c) => {
                text.push(c);
                reader.advance();
            }
        }
    }
    Ok(Token::new(
        TokenKind::QuotedString(text),
        Range::new(start_offset..reader.byte_offset(), start_pos, reader.position()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<TokenKind> {
        let mut reader = Reader::new(source);
        let mut out = Vec::new();
        loop {
            let tok = next_token(&mut reader).unwrap();
            let done = matches!(tok.kind, TokenKind::Eof);
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn identifiers_and_brackets() {
        let toks = lex_all("f(x)");
        assert_eq!(
            toks,
            vec![
                TokenKind::Identifier("f".to_string()),
                TokenKind::GroupStart,
                TokenKind::Identifier("x".to_string()),
                TokenKind::GroupEnd,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn arrow_and_comma() {
        let toks = lex_all("a, b -> c");
        assert_eq!(
            toks,
            vec![
                TokenKind::Identifier("a".to_string()),
                TokenKind::Comma,
                TokenKind::Identifier("b".to_string()),
                TokenKind::G2Arrow,
                TokenKind::Identifier("c".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn quoted_string_with_escapes() {
        let toks = lex_all(r#""a\"b\\c""#);
        assert_eq!(toks[0], TokenKind::QuotedString("a\"b\\c".to_string()));
    }

    #[test]
    fn line_comment_is_discarded() {
        let toks = lex_all("a // comment\nb");
        assert_eq!(
            toks,
            vec![
                TokenKind::Identifier("a".to_string()),
                TokenKind::Identifier("b".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn attribute_tokens() {
        let toks = lex_all("@@key");
        assert_eq!(toks[0], TokenKind::DefineAttribute { forward: true });
        assert_eq!(toks[1], TokenKind::Identifier("key".to_string()));
    }

    #[test]
    fn unterminated_string_errors() {
        let mut reader = Reader::new("\"abc");
        let err = next_token(&mut reader).unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedString { .. }));
    }
}
