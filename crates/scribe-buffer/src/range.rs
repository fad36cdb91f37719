//! Text ranges.
//!
//! ## Learning: Range Types
//!
//! Like `std::ops::Range`, a `TextRange` has an exclusive end:
//! - Empty ranges (start == end) are natural
//! - Adjacent ranges share an endpoint without overlapping
//!
//! Unlike a UI selection, a `TextRange` is NOT normalized on construction.
//! A range whose end precedes its start is rejected by the buffer with
//! `InvalidRange`, so callers learn about the mistake instead of having it
//! silently swapped.

use crate::Position;
use serde::{Deserialize, Serialize};

/// A span of text between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl TextRange {
    /// Creates a range exactly as given.
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Creates a range from two positions in either order.
    ///
    /// Use this for anchor/cursor pairs coming from a UI drag.
    pub fn ordered(a: Position, b: Position) -> Self {
        if a <= b {
            Self::new(a, b)
        } else {
            Self::new(b, a)
        }
    }

    /// Creates a zero-width range at a position.
    pub const fn empty(position: Position) -> Self {
        Self::new(position, position)
    }

    /// Returns true if the range selects nothing.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if the end precedes the start.
    pub fn is_reversed(&self) -> bool {
        self.end < self.start
    }

    /// Returns true if the range spans multiple lines.
    pub fn is_multiline(&self) -> bool {
        self.start.line != self.end.line
    }

    /// Returns true if a position is within this range.
    pub fn contains(&self, pos: Position) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Returns true if this range overlaps with another.
    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for TextRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
