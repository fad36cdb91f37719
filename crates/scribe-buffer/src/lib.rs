//! # Scribe Buffer
//!
//! Line/column addressed text buffer, bounded undo history and literal
//! search.
//!
//! ## Key Concepts for Learning Rust
//!
//! ### Ownership & Borrowing
//! - `TextBuffer` owns the rope data structure
//! - `History` owns its records and borrows the buffer only while undoing
//! - `find_all` returns an iterator borrowing the buffer, so the buffer
//!   can't be edited while a search is being consumed
//!
//! ### Errors as Values
//! - Nothing here clamps or truncates silently
//! - Invalid positions, reversed ranges and empty histories all come back
//!   as a [`BufferError`] the caller has to look at

mod buffer;
mod history;
mod position;
mod range;
mod search;

pub use buffer::{TextBuffer, normalize_line_endings};
pub use history::{DEFAULT_CAPACITY, EditKind, EditRecord, History};
pub use position::Position;
pub use range::TextRange;
pub use search::{Matches, find_all, find_first_from};

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("Position {line}:{column} is out of range")]
    OutOfRange { line: usize, column: usize },

    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: Position, end: Position },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("No match found")]
    NotFound,
}

impl BufferError {
    /// Returns true for signals that only mean "nothing happened".
    ///
    /// An empty history or a search miss is not a failure; a UI would
    /// typically ignore these instead of showing an error.
    pub fn is_signal(&self) -> bool {
        matches!(
            self,
            BufferError::NothingToUndo | BufferError::NothingToRedo | BufferError::NotFound
        )
    }
}
