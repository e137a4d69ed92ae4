//! G1 node parsing: attributes, element declarations, and text/comment
//! leaves.
//!
//! A single `parse_node` handles both plain G1 and G1Line (the mode is
//! already set by the caller before entry) since the two grammars differ
//! only in where a line ends, which is a lexer concern (`G1LineEnd`), not a
//! parser one — `G1LineEnd` is simply one more terminator `is_terminator`
//! recognizes.

use super::Parser;
use crate::error::ParseError;
use crate::position::Range;
use crate::token::TokenKind;
use crate::tree::{BlockType, Node};

/// Parse one concrete (non-forwarding) G1 node. A chain of forwarding
/// (`##`) declarations is consumed internally — each one is appended to
/// the forwarding-node buffer and parsing continues — so the caller only
/// ever sees the first node that was not itself forwarding.
///
/// `is_root` is set only for the synthetic root wrapper: it is the one
/// case where a block's children may be terminated by end-of-input rather
/// than an explicit `}` (there is no literal closing brace to match the
/// synthesized opening one).
pub(crate) fn parse_node(parser: &mut Parser, is_root: bool) -> Result<Node, ParseError> {
    loop {
        collect_forward_attributes(parser)?;

        let tok = parser.advance()?;
        match tok.kind {
            TokenKind::CharData(text) => {
                if !parser.forwarding_attributes.is_empty() {
                    return Err(ParseError::ForwardAttributeNotAllowed { range: tok.range });
                }
                return Ok(Node::text(text, tok.range));
            }
            TokenKind::Comment(text) => {
                if !parser.forwarding_attributes.is_empty() {
                    return Err(ParseError::ForwardAttributeNotAllowed { range: tok.range });
                }
                return Ok(Node::comment(text, tok.range));
            }
            TokenKind::DefineElement { forward } => {
                let element = parse_element_body(parser, tok.range, forward, is_root)?;
                if forward {
                    parser.forwarding_nodes.push(element);
                    continue;
                }
                return Ok(element);
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    range: tok.range,
                    found: other,
                    expected: vec!["text", "'#'", "'##'"],
                });
            }
        }
    }
}

/// Steps 3-7: build the element named by `define_range`'s `#`/`##` once
/// the element-name identifier, its attributes, and its body have been
/// consumed. Called directly (bypassing steps 1-2) when a `DefineElement`
/// token was already consumed by the G2 lexer before delegating to
/// G1Line, since in that case there is no separate forward-attribute
/// collection pass to repeat.
pub(crate) fn parse_element_body(
    parser: &mut Parser,
    define_range: Range,
    forward: bool,
    is_root: bool,
) -> Result<Node, ParseError> {
    let (name, name_range) = parser.expect_identifier()?;
    let mut element = Node::element(name, define_range.join(&name_range));

    if !forward {
        parser.splice_forwarding_nodes(&mut element);
    }

    let own_attrs = collect_non_forward_attributes(parser)?;
    parser.merge_attributes(&mut element, own_attrs)?;

    if matches!(parser.peek()?.kind, TokenKind::BlockStart) {
        parser.advance()?;
        let (children, end_range) = parse_block_children(parser, is_root)?;
        for child in children {
            element.children_mut().unwrap().push(child);
        }
        element.set_block_type(BlockType::Normal);
        element.range = element.range.join(&end_range);
    } else if !is_terminator(&parser.peek()?.kind) {
        // No bracketed block: an element may still take a single
        // bracket-less inline child, e.g. `## doc comment` producing
        // `doc { comment }`. See DESIGN.md.
        let child = parse_node(parser, false)?;
        let child_range = child.range().clone();
        element.children_mut().unwrap().push(child);
        element.range = element.range.join(&child_range);
    }

    Ok(element)
}

/// Parse the children of a `{ ... }` block until the matching `}`. When
/// `allow_eof` is set (the synthetic root wrapper only), end-of-input is
/// also accepted as the terminator, since the root's opening brace has no
/// literal counterpart to match.
fn parse_block_children(parser: &mut Parser, allow_eof: bool) -> Result<(Vec<Node>, Range), ParseError> {
    let mut children = Vec::new();
    loop {
        let kind = parser.peek()?.kind.clone();
        match kind {
            TokenKind::BlockEnd => {
                let tok = parser.advance()?;
                return Ok((children, tok.range));
            }
            TokenKind::Eof if allow_eof => {
                let range = parser.peek()?.range.clone();
                return Ok((children, range));
            }
            TokenKind::Eof => {
                return Err(ParseError::UnmatchedBracket {
                    range: parser.peek()?.range.clone(),
                    bracket: "'}'",
                });
            }
            _ => {
                let child = parse_node(parser, false)?;
                children.push(child);
            }
        }
    }
}

fn is_terminator(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::BlockEnd | TokenKind::G1LineEnd | TokenKind::Eof)
}

/// `@@key{value}` attributes collected ahead of this node. A bare `@key`
/// (non-forward) found in this leading position is rejected — non-forward
/// attributes only make sense after an element's name, never before it.
fn collect_forward_attributes(parser: &mut Parser) -> Result<(), ParseError> {
    loop {
        match parser.peek()?.kind.clone() {
            TokenKind::DefineAttribute { forward: true } => {
                let attr = parse_attribute(parser)?;
                parser.forwarding_attributes.push(attr);
            }
            TokenKind::DefineAttribute { forward: false } => {
                let tok = parser.advance()?;
                return Err(ParseError::NonForwardAttributeRequiresForward { range: tok.range });
            }
            _ => return Ok(()),
        }
    }
}

/// `@key{value}` attributes collected right after the element name, merged
/// with whatever forward attributes were already buffered.
fn collect_non_forward_attributes(parser: &mut Parser) -> Result<Vec<(String, String, Range)>, ParseError> {
    let mut attrs = Vec::new();
    loop {
        match parser.peek()?.kind.clone() {
            TokenKind::DefineAttribute { forward: false } => {
                attrs.push(parse_attribute(parser)?);
            }
            _ => return Ok(attrs),
        }
    }
}

fn parse_attribute(parser: &mut Parser) -> Result<(String, String, Range), ParseError> {
    let at_tok = parser.advance()?; // DefineAttribute
    let (key, key_range) = parser.expect_identifier()?;
    parser.expect(|k| matches!(k, TokenKind::BlockStart), vec!["'{'"])?;
    let value = match parser.peek()?.kind.clone() {
        TokenKind::CharData(text) => {
            parser.advance()?;
            text
        }
        _ => String::new(),
    };
    let end_tok = parser.expect(|k| matches!(k, TokenKind::BlockEnd), vec!["'}'"])?;
    let range = at_tok.range.join(&key_range).join(&end_tok.range);
    Ok((key, value, range))
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::tree::NodeShape;

    #[test]
    fn plain_element_with_attribute() {
        let tree = parse("#item @key{value}{text}").unwrap();
        let item = &tree.root().children()[0];
        assert_eq!(item.name(), Some("item"));
        assert_eq!(item.attribute("key"), Some("value"));
        assert_eq!(item.children()[0].text_content(), Some("text"));
    }

    #[test]
    fn bracketless_inline_child() {
        let tree = parse("#doc comment").unwrap();
        let doc = &tree.root().children()[0];
        assert_eq!(doc.name(), Some("doc"));
        assert_eq!(doc.children().len(), 1);
        assert_eq!(doc.children()[0].shape(), NodeShape::Text);
        assert_eq!(doc.children()[0].text_content(), Some("comment"));
    }

    #[test]
    fn hash_question_comment_becomes_comment_leaf() {
        let tree = parse("#? a note #x").unwrap();
        let root = tree.root();
        assert_eq!(root.children()[0].shape(), NodeShape::Comment);
        assert_eq!(root.children()[1].name(), Some("x"));
    }

    #[test]
    fn forwarding_element_splices_as_first_children() {
        let tree = parse("##a ##b c").unwrap();
        let c = &tree.root().children()[0];
        assert_eq!(c.name(), Some("c"));
        assert_eq!(c.children()[0].name(), Some("a"));
        assert_eq!(c.children()[1].name(), Some("b"));
    }
}
