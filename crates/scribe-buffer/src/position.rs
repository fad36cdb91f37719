//! Line/column addressing.
//!
//! ## Learning: Newtype Pattern
//!
//! `Position` wraps a `(line, column)` pair in a named struct so the two
//! coordinates can't be swapped by accident, and so ordering can be defined
//! once (line-major, then column) instead of at every call site.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A position in the text buffer.
///
/// Lines are 1-based, columns are 0-based and counted in characters
/// (Unicode scalar values), not bytes. A column equal to the line length
/// addresses the slot after the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (0-based, in characters)
    pub column: usize,
}

impl Position {
    /// Position at the start of the document.
    pub const START: Position = Position { line: 1, column: 0 };

    /// Creates a new position.
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Returns true if this position is before another.
    pub fn is_before(&self, other: &Position) -> bool {
        self < other
    }

    /// Returns true if this position is after another.
    pub fn is_after(&self, other: &Position) -> bool {
        self > other
    }

    /// Returns the position reached by writing `text` starting here.
    ///
    /// `text` is expected to use `\n` as its only line terminator.
    pub fn advanced_by(&self, text: &str) -> Position {
        match text.rsplit_once('\n') {
            None => Position::new(self.line, self.column + text.chars().count()),
            Some((head, tail)) => Position::new(
                self.line + head.matches('\n').count() + 1,
                tail.chars().count(),
            ),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Columns are shown 1-based like a status bar would
        write!(f, "{}:{}", self.line, self.column + 1)
    }
}
