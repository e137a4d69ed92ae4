//! G2 node parsing: implicit nesting, attributes, bracketed bodies, and the
//! `->` arrow rewrite.

use super::g1;
use super::Parser;
use crate::error::ParseError;
use crate::position::Range;
use crate::token::{Mode, Token, TokenKind};
use crate::tree::{BlockType, Node};

/// Parse one G2 node: an element built from implicit nesting, or a
/// standalone quoted-text leaf.
pub(crate) fn parse_node(parser: &mut Parser) -> Result<Node, ParseError> {
    collect_forward_attributes(parser)?;

    let tok = parser.advance()?;
    match tok.kind {
        TokenKind::QuotedString(text) => {
            if !parser.forwarding_attributes.is_empty() {
                return Err(ParseError::ForwardAttributeNotAllowed { range: tok.range });
            }
            Ok(Node::text(text, tok.range))
        }
        TokenKind::Identifier(name) => {
            let mut element = Node::element(name, tok.range.clone());
            // A plain Identifier node is always "regular" (never itself
            // forwarding — forwarding elements only exist via the `##`
            // G1Line escape hatch), so the buffer is always spliced in.
            parser.splice_forwarding_nodes(&mut element);

            let own_attrs = collect_non_forward_attributes(parser)?;
            parser.merge_attributes(&mut element, own_attrs)?;

            dispatch_node_content(parser, &mut element)?;
            Ok(element)
        }
        other => Err(ParseError::UnexpectedToken {
            range: tok.range,
            found: other,
            expected: vec!["identifier", "quoted string"],
        }),
    }
}

/// Decide what this node's single content slot is.
fn dispatch_node_content(parser: &mut Parser, element: &mut Node) -> Result<(), ParseError> {
    let tok = parser.peek()?.clone();
    match tok.kind {
        TokenKind::QuotedString(text) => {
            parser.advance()?;
            element.children_mut().unwrap().push(Node::text(text, tok.range));
        }
        TokenKind::DefineElement { .. } => {
            let define_tok = parser.advance()?;
            if let Some(node) = dispatch_g1_line(parser, define_tok)? {
                element.children_mut().unwrap().push(node);
            }
        }
        TokenKind::BlockStart | TokenKind::GroupStart | TokenKind::GenericStart => {
            let (children, block_type, range) = parse_bracket_body(parser)?;
            for child in children {
                element.children_mut().unwrap().push(child);
            }
            element.set_block_type(block_type);
            element.range = element.range.join(&range);
        }
        TokenKind::Comma => {
            parser.advance()?;
        }
        TokenKind::G2Arrow => {
            parser.advance()?;
            let ret = parse_arrow_target(parser)?;
            let ret_range = ret.range().clone();
            element.children_mut().unwrap().push(ret);
            element.range = element.range.join(&ret_range);
        }
        TokenKind::BlockEnd | TokenKind::GroupEnd | TokenKind::GenericEnd | TokenKind::Eof => {
            // Belongs to the enclosing block; leave it for the caller.
        }
        _ => {
            // Another identifier (or a leading forward attribute):
            // implicit nesting — recurse for one more node and adopt it
            // as the sole inline child.
            let child = parse_node(parser)?;
            let child_range = child.range().clone();
            element.children_mut().unwrap().push(child);
            element.range = element.range.join(&child_range);
        }
    }
    Ok(())
}

/// Parses the body of a `{`, `(`, or `<` block (not yet consumed, but
/// confirmed present by the caller). While scanning the body, each
/// sibling is checked for a trailing arrow rewrite before being added to
/// the block's children.
fn parse_bracket_body(parser: &mut Parser) -> Result<(Vec<Node>, BlockType, Range), ParseError> {
    let open = parser.advance()?;
    let (block_type, close_kind, close_label) = match open.kind {
        TokenKind::BlockStart => (BlockType::Normal, TokenKind::BlockEnd, "'}'"),
        TokenKind::GroupStart => (BlockType::Group, TokenKind::GroupEnd, "')'"),
        TokenKind::GenericStart => (BlockType::Generic, TokenKind::GenericEnd, "'>'"),
        _ => unreachable!("caller only calls this right after peeking an opening bracket"),
    };

    let mut children: Vec<Node> = Vec::new();
    loop {
        let tok = parser.peek()?.clone();
        if tok.kind == close_kind {
            parser.advance()?;
            return Ok((children, block_type, open.range.join(&tok.range)));
        }
        if matches!(tok.kind, TokenKind::Eof) {
            return Err(ParseError::UnmatchedBracket { range: tok.range, bracket: close_label });
        }
        if matches!(tok.kind, TokenKind::Comma) {
            parser.advance()?;
            continue;
        }
        if let TokenKind::DefineElement { .. } = tok.kind {
            let define_tok = parser.advance()?;
            if let Some(mut node) = dispatch_g1_line(parser, define_tok)? {
                apply_arrow_rewrite(parser, &mut node)?;
                children.push(node);
            }
            continue;
        }
        let mut child = parse_node(parser)?;
        apply_arrow_rewrite(parser, &mut child)?;
        children.push(child);
    }
}

/// `name -> (...)` with no preceding block: the `ret` child becomes
/// `name`'s sole content.
fn parse_arrow_target(parser: &mut Parser) -> Result<Node, ParseError> {
    let bracket_tok = parser.peek()?.clone();
    if !matches!(
        bracket_tok.kind,
        TokenKind::BlockStart | TokenKind::GroupStart | TokenKind::GenericStart
    ) {
        return Err(ParseError::UnexpectedToken {
            range: bracket_tok.range,
            found: bracket_tok.kind,
            expected: vec!["'{'", "'('", "'<'"],
        });
    }
    build_ret(parser)
}

/// A G2Arrow already consumed, followed by a bracketed block: wraps that
/// block's children under a synthetic `ret` element. Appends nothing if
/// no arrow follows.
fn apply_arrow_rewrite(parser: &mut Parser, node: &mut Node) -> Result<(), ParseError> {
    if !matches!(parser.peek()?.kind, TokenKind::G2Arrow) {
        return Ok(());
    }
    parser.advance()?;
    let bracket_tok = parser.peek()?.clone();
    if !matches!(
        bracket_tok.kind,
        TokenKind::BlockStart | TokenKind::GroupStart | TokenKind::GenericStart
    ) {
        return Err(ParseError::UnexpectedToken {
            range: bracket_tok.range,
            found: bracket_tok.kind,
            expected: vec!["'{'", "'('", "'<'"],
        });
    }
    let ret = build_ret(parser)?;
    let ret_range = ret.range().clone();
    if let Some(children) = node.children_mut() {
        children.push(ret);
    }
    node.range = node.range().clone().join(&ret_range);
    Ok(())
}

fn build_ret(parser: &mut Parser) -> Result<Node, ParseError> {
    let (children, block_type, range) = parse_bracket_body(parser)?;
    let mut ret = Node::element("ret", range);
    ret.set_block_type(block_type);
    if let Some(c) = ret.children_mut() {
        *c = children;
    }
    Ok(ret)
}

/// `DefineElement` encountered while parsing G2 content: switch to
/// G1Line and parse until `G1LineEnd` (or EOF). A `##`-triggered line
/// contributes *all* of its top-level nodes to the forwarding buffer
/// instead of the current element. A plain `#`-triggered line contributes
/// exactly one node directly, keeping an unbracketed element's single-
/// inline-child rule intact — see DESIGN.md.
fn dispatch_g1_line(parser: &mut Parser, define_tok: Token) -> Result<Option<Node>, ParseError> {
    let forward = match define_tok.kind {
        TokenKind::DefineElement { forward } => forward,
        _ => unreachable!("caller only passes DefineElement tokens"),
    };
    parser.set_mode(Mode::G1Line);

    if forward {
        let first = g1::parse_element_body(parser, define_tok.range, true, false)?;
        parser.forwarding_nodes.push(first);
        loop {
            match parser.peek()?.kind.clone() {
                TokenKind::G1LineEnd => {
                    parser.advance()?;
                    break;
                }
                TokenKind::Eof => break,
                _ => {
                    let node = g1::parse_node(parser, false)?;
                    parser.forwarding_nodes.push(node);
                }
            }
        }
        parser.set_mode(Mode::G2);
        Ok(None)
    } else {
        let node = g1::parse_element_body(parser, define_tok.range, false, false)?;
        match parser.peek()?.kind.clone() {
            TokenKind::G1LineEnd => {
                parser.advance()?;
            }
            TokenKind::Eof => {}
            other => {
                return Err(ParseError::UnexpectedToken {
                    range: parser.peek()?.range.clone(),
                    found: other,
                    expected: vec!["end of line"],
                });
            }
        }
        parser.set_mode(Mode::G2);
        Ok(Some(node))
    }
}

/// Forward attributes: `@@key = "value"`.
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

/// Non-forward attributes: `@key = "value"`.
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
    parser.expect(|k| matches!(k, TokenKind::Assign), vec!["'='"])?;
    let value_tok = parser.advance()?;
    let value = match value_tok.kind {
        TokenKind::QuotedString(s) => s,
        other => {
            return Err(ParseError::UnexpectedToken {
                range: value_tok.range,
                found: other,
                expected: vec!["quoted string"],
            })
        }
    };
    let range = at_tok.range.join(&key_range).join(&value_tok.range);
    Ok((key, value, range))
}
