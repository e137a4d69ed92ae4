//! Position and range tracking for TADL source locations.
//!
//! Mirrors the location model used throughout the lexer, parser, and parse
//! tree: every token and every node carries a [`Range`], never an optional
//! one. `Position` is 0-indexed in both line and column, consistent with
//! byte-offset arithmetic elsewhere in the crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range as ByteRange;

/// A line:column position in source text. Both fields are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A source range: a byte span plus its start/end line:column positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub span: ByteRange<usize>,
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(span: ByteRange<usize>, start: Position, end: Position) -> Self {
        Self { span, start, end }
    }

    /// A zero-width range anchored at a single position, used for synthetic
    /// tokens that have no corresponding source bytes.
    pub fn point(offset: usize, pos: Position) -> Self {
        Self::new(offset..offset, pos, pos)
    }

    pub fn contains(&self, pos: Position) -> bool {
        (self.start.line < pos.line || (self.start.line == pos.line && self.start.column <= pos.column))
            && (self.end.line > pos.line || (self.end.line == pos.line && self.end.column >= pos.column))
    }

    pub fn overlaps(&self, other: &Range) -> bool {
        self.contains(other.start)
            || self.contains(other.end)
            || other.contains(self.start)
            || other.contains(self.end)
    }

    /// Build the smallest range that spans `self` and `other`. Used when a
    /// node's range must cover its first through last consumed token.
    pub fn join(&self, other: &Range) -> Range {
        let span_start = self.span.start.min(other.span.start);
        let span_end = self.span.end.max(other.span.end);
        let start = if other.start < self.start { other.start } else { self.start };
        let end = if other.end > self.end { other.end } else { self.end };
        Range::new(span_start..span_end, start, end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::new(0..0, Position::default(), Position::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_display() {
        assert_eq!(format!("{}", Position::new(2, 4)), "2:4");
    }

    #[test]
    fn range_contains_single_line() {
        let r = Range::new(0..0, Position::new(0, 0), Position::new(0, 10));
        assert!(r.contains(Position::new(0, 5)));
        assert!(!r.contains(Position::new(0, 11)));
        assert!(!r.contains(Position::new(1, 0)));
    }

    #[test]
    fn range_join_picks_outer_bounds() {
        let a = Range::new(2..5, Position::new(0, 2), Position::new(0, 5));
        let b = Range::new(10..20, Position::new(3, 0), Position::new(4, 3));
        let joined = a.join(&b);
        assert_eq!(joined.span, 2..20);
        assert_eq!(joined.start, Position::new(0, 2));
        assert_eq!(joined.end, Position::new(4, 3));
    }


    #[test]
    fn range_overlaps() {
        let a = Range::new(0..0, Position::new(0, 0), Position::new(1, 5));
        let b = Range::new(0..0, Position::new(1, 0), Position::new(2, 5));
        let c = Range::new(0..0, Position::new(3, 0), Position::new(4, 5));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
