//! Recursive-descent parser. No visitor/builder-pattern alternative is
//! implemented.
//!
//! The parser is the sole writer of the lexer's grammar mode and owns the
//! forwarding buffers: append-only until drained, and draining is an
//! ownership transfer, not a copy. A small pushback FIFO sits in front of
//! the lexer so entry discrimination can inject synthetic tokens (the root
//! wrapper) ahead of whatever the lexer would otherwise produce next.

pub(crate) mod g1;
pub(crate) mod g2;

use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::position::{Position, Range};
use crate::token::{Mode, Token, TokenKind};
use crate::tree::{BlockType, Node, Tree};
use std::collections::VecDeque;

/// Parse TADL source into a [`Tree`]. The tree is always rooted at an
/// element named `root` with `block_type = Normal`.
pub fn parse(source: &str) -> Result<Tree, ParseError> {
    let mut parser = Parser::new(source);
    let root = parser.parse_document()?;
    parser.finish()?;
    Ok(Tree::new(root))
}

pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    pending: VecDeque<Token>,
    pub(crate) forwarding_nodes: Vec<Node>,
    pub(crate) forwarding_attributes: Vec<(String, String, Range)>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            pending: VecDeque::new(),
            forwarding_nodes: Vec::new(),
            forwarding_attributes: Vec::new(),
        }
    }

    fn fill(&mut self, n: usize) -> Result<(), ParseError> {
        while self.pending.len() < n {
            let tok = self.lexer.next()?;
            self.pending.push_back(tok);
        }
        Ok(())
    }

    pub(crate) fn peek(&mut self) -> Result<&Token, ParseError> {
        self.fill(1)?;
        Ok(&self.pending[0])
    }

    pub(crate) fn advance(&mut self) -> Result<Token, ParseError> {
        self.fill(1)?;
        Ok(self.pending.pop_front().expect("fill(1) guarantees an entry"))
    }

    fn push_front(&mut self, token: Token) {
        self.pending.push_front(token);
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.lexer.set_mode(mode);
    }

    fn current_position(&self) -> Position {
        self.lexer.position()
    }

    fn current_offset(&self) -> usize {
        self.lexer.byte_offset()
    }

    fn synthetic_range(&self) -> Range {
        Range::point(self.current_offset(), self.current_position())
    }

    /// Reads an identifier in the "name" position right after a `#`, `##`,
    /// `@`, or `@@` token. A dedicated lexer entry point, not the mode's
    /// general `next()`, because the element-name position lexes
    /// identifiers even in G1 (which has no general-purpose Identifier
    /// token — everything else is CharData). A pending synthetic token
    /// (the injected root identifier) is honored first.
    pub(crate) fn expect_identifier(&mut self) -> Result<(String, Range), ParseError> {
        if self.pending.is_empty() {
            let tok = self.lexer.next_identifier()?;
            return match tok.kind {
                TokenKind::Identifier(name) => Ok((name, tok.range)),
                other => Err(ParseError::UnexpectedToken {
                    range: tok.range,
                    found: other,
                    expected: vec!["identifier"],
                }),
            };
        }
        let tok = self.advance()?;
        match tok.kind {
            TokenKind::Identifier(name) => Ok((name, tok.range)),
            other => Err(ParseError::UnexpectedToken {
                range: tok.range,
                found: other,
                expected: vec!["identifier"],
            }),
        }
    }

    pub(crate) fn expect(
        &mut self,
        matches_kind: impl Fn(&TokenKind) -> bool,
        expected: Vec<&'static str>,
    ) -> Result<Token, ParseError> {
        let tok = self.advance()?;
        if matches_kind(&tok.kind) {
            Ok(tok)
        } else {
            Err(ParseError::UnexpectedToken { range: tok.range, found: tok.kind, expected })
        }
    }

    /// Splice the forwarding-node buffer in as `element`'s first children.
    /// Draining the buffer is an ownership transfer, not a copy.
    pub(crate) fn splice_forwarding_nodes(&mut self, element: &mut Node) {
        let mut drained = std::mem::take(&mut self.forwarding_nodes);
        let children = element.children_mut().expect("element node");
        children.splice(0..0, drained.drain(..));
    }

    /// Merge the drained forward-attribute buffer with `own_attrs` (forward
    /// keys inserted first), erroring on the first duplicate key — a
    /// collision between a forwarded and a locally-declared attribute is
    /// rejected the same way any other duplicate key is.
    pub(crate) fn merge_attributes(
        &mut self,
        element: &mut Node,
        own_attrs: Vec<(String, String, Range)>,
    ) -> Result<(), ParseError> {
        let forwarded = std::mem::take(&mut self.forwarding_attributes);
        for (key, value, range) in forwarded.into_iter().chain(own_attrs) {
            element
                .try_insert_attribute(key, value)
                .map_err(|key| ParseError::DuplicateAttribute { range, key })?;
        }
        Ok(())
    }

    /// Entry discrimination: `#!` selects G2 with a synthesized root
    /// identifier; anything else is G1, wrapped as if surrounded by
    /// `# root { ... }`.
    fn parse_document(&mut self) -> Result<Node, ParseError> {
        let first_kind = self.peek()?.kind.clone();
        if matches!(first_kind, TokenKind::G2Preamble) {
            let preamble = self.advance()?;
            self.set_mode(Mode::G2);
            let root_range = Range::point(preamble.range.span.end, preamble.range.end);
            self.push_front(Token::new(TokenKind::Identifier("root".to_string()), root_range));
            let root = g2::parse_node(self)?;
            if root.block_type() != Some(BlockType::Normal) {
                return Err(ParseError::RootNotEnclosed { range: root.range().clone() });
            }
            Ok(root)
        } else {
            self.set_mode(Mode::G1);
            let wrap_range = self.synthetic_range();
            self.push_front(Token::new(TokenKind::BlockStart, wrap_range.clone()));
            self.push_front(Token::new(TokenKind::Identifier("root".to_string()), wrap_range.clone()));
            self.push_front(Token::new(TokenKind::DefineElement { forward: false }, wrap_range));
            g1::parse_node(self, true)
        }
    }

    /// No forwarding buffer may be non-empty at end of parse.
    fn finish(&mut self) -> Result<(), ParseError> {
        if let Some(node) = self.forwarding_nodes.first() {
            return Err(ParseError::DanglingForwardingBuffer { range: node.range().clone() });
        }
        if let Some((_, _, range)) = self.forwarding_attributes.first() {
            return Err(ParseError::DanglingForwardingBuffer { range: range.clone() });
        }
        Ok(())
    }
}
