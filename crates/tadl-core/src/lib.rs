//! # tadl-core
//!
//! A lexer and parser for TADL, a markup language meant to replace XML for
//! document markup and DSL carrying.
//!
//! Pipeline
//!
//!     TADL has two coexisting grammars: a text-first grammar ("G1") and a
//!     node-first grammar ("G2"), plus a line-scoped excursion into G1 from
//!     inside G2 ("G1Line"). A document picks G2 by opening with `#!`;
//!     otherwise the whole document is G1, implicitly wrapped as if it read
//!     `# root { ... }`.
//!
//!     source text -> [reader] -> [lexer, mode-aware] -> [parser] -> [tree]
//!
//!     The reader is a one-rune-lookahead cursor over `&str` with line/column
//!     tracking. The lexer produces tokens under whichever grammar mode the
//!     parser has it set to; the parser is the only thing that ever flips
//!     that mode, between token requests. The parser also owns the two
//!     forwarding buffers (`##` elements, `@@` attributes) that this format
//!     uses to let a declaration at one lexical point attach to the next
//!     regular element the parser builds.
//!
//! Entry point
//!
//!     [`parse`] is the only public entry point; it returns a [`tree::Tree`]
//!     rooted at an element named `root`, or a [`error::ParseError`]
//!     carrying a position and the set of token kinds that would have been
//!     accepted there.
//!
//! Testing
//!
//!     Unit tests live alongside each module (`reader`, `lexer`, `lexer::g1`,
//!     `lexer::g2`, `parser`, `parser::g1`, `parser::g2`, `tree`, `error`).
//!     Cross-module scenarios, boundary cases, and the determinism/
//!     uniqueness/range-containment properties live under `tests/`.

#![allow(rustdoc::invalid_html_tags)]

pub mod error;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod reader;
pub mod token;
pub mod tree;

pub use error::ParseError;
pub use parser::parse;
pub use position::{Position, Range};
pub use token::{Mode, Token, TokenKind};
pub use tree::{BlockType, Node, NodeKind, NodeShape, Tree};
