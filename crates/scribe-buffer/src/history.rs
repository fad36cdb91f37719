//! Undo/redo history management.
//!
//! ## Learning: The Command Pattern
//!
//! Each edit is stored as a record that can be:
//! - Reverted (undo: apply the inverse to the buffer)
//! - Reapplied (redo: apply the original operation again)
//!
//! The history never observes the buffer on its own. Whoever mutates the
//! buffer records the edit afterwards, which keeps `TextBuffer` free of any
//! knowledge about undo.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::{BufferError, BufferResult, Position, TextBuffer, TextRange};

/// Number of undo steps kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 50;

/// The type of edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditKind {
    /// Text was inserted
    Insert,
    /// Text was deleted
    Delete,
}

/// A single reversible edit.
///
/// ## Learning: Clone vs Copy
///
/// `EditRecord` implements `Clone` but not `Copy` because it owns a
/// `String`. `Position` on the other hand is plain data and is `Copy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    /// What kind of edit this is
    pub kind: EditKind,
    /// Where the edit happened
    pub position: Position,
    /// The text that was inserted or removed
    pub text: String,
    /// Cursor location after the edit was applied
    pub resulting_cursor: Position,
}

impl EditRecord {
    /// Creates an insert record.
    pub fn insert(position: Position, text: impl Into<String>, resulting_cursor: Position) -> Self {
        Self {
            kind: EditKind::Insert,
            position,
            text: text.into(),
            resulting_cursor,
        }
    }

    /// Creates a delete record.
    pub fn delete(position: Position, text: impl Into<String>, resulting_cursor: Position) -> Self {
        Self {
            kind: EditKind::Delete,
            position,
            text: text.into(),
            resulting_cursor,
        }
    }

    /// Range the recorded text occupies while it is present in the buffer.
    pub fn span(&self) -> TextRange {
        TextRange::new(self.position, self.position.advanced_by(&self.text))
    }

    /// Applies the inverse of this edit. Returns the cursor to restore.
    ///
    /// Undoing an insert leaves the cursor where the text used to start;
    /// undoing a delete leaves it after the restored text.
    pub fn revert(&self, buffer: &mut TextBuffer) -> BufferResult<Position> {
        match self.kind {
            EditKind::Insert => {
                buffer.delete(self.span())?;
                Ok(self.position)
            }
            EditKind::Delete => buffer.insert(self.position, &self.text),
        }
    }

    /// Applies this edit again. Returns the recorded resulting cursor.
    pub fn reapply(&self, buffer: &mut TextBuffer) -> BufferResult<Position> {
        match self.kind {
            EditKind::Insert => {
                buffer.insert(self.position, &self.text)?;
            }
            EditKind::Delete => {
                buffer.delete(self.span())?;
            }
        }
        Ok(self.resulting_cursor)
    }
}

/// Bounded undo/redo log.
///
/// ## Design Decisions
///
/// 1. **Bounded history**: once `capacity` records are stored, recording
///    another evicts the oldest. Evicted edits can never be undone.
/// 2. **No coalescing**: every record is its own undo step, matching one
///    keystroke-level insert or delete.
/// 3. **Linear history**: recording after an undo drops the redo log.
///
/// ## Learning: VecDeque
///
/// We use `VecDeque` for the undo log because we need efficient:
/// - Push to back (new edits)
/// - Pop from front (eviction at capacity)
/// - Pop from back (undo)
#[derive(Debug, Clone)]
pub struct History {
    /// Undoable records, most recent last
    undo_log: VecDeque<EditRecord>,
    /// Redoable records, most recently undone last
    redo_log: Vec<EditRecord>,
    /// Maximum number of undo records to keep
    capacity: usize,
}

impl History {
    /// Creates a new history with the given capacity.
    ///
    /// Only a default-sized log is reserved up front; a large capacity is a
    /// limit, not an allocation.
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_log: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            redo_log: Vec::new(),
            capacity,
        }
    }

    /// Records an edit that was just applied to the buffer.
    ///
    /// Clears the redo log. Returns the record evicted to stay within
    /// capacity, if any.
    pub fn record(&mut self, edit: EditRecord) -> Option<EditRecord> {
        self.redo_log.clear();
        self.undo_log.push_back(edit);

        if self.undo_log.len() > self.capacity {
            self.undo_log.pop_front()
        } else {
            None
        }
    }

    /// Reverts the most recent edit.
    ///
    /// On failure the record stays on the undo log and the buffer is
    /// untouched, since every buffer operation is all-or-nothing.
    pub fn undo(&mut self, buffer: &mut TextBuffer) -> BufferResult<Position> {
        let edit = self.undo_log.pop_back().ok_or(BufferError::NothingToUndo)?;

        match edit.revert(buffer) {
            Ok(cursor) => {
                self.redo_log.push(edit);
                Ok(cursor)
            }
            Err(err) => {
                self.undo_log.push_back(edit);
                Err(err)
            }
        }
    }

    /// Reapplies the most recently undone edit.
    pub fn redo(&mut self, buffer: &mut TextBuffer) -> BufferResult<Position> {
        let edit = self.redo_log.pop().ok_or(BufferError::NothingToRedo)?;

        match edit.reapply(buffer) {
            Ok(cursor) => {
                self.undo_log.push_back(edit);
                Ok(cursor)
            }
            Err(err) => {
                self.redo_log.push(edit);
                Err(err)
            }
        }
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_log.is_empty()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_log.is_empty()
    }

    /// Clears all history.
    pub fn clear(&mut self) {
        self.undo_log.clear();
        self.redo_log.clear();
    }

    /// Returns the number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo_log.len()
    }

    /// Returns the number of redo steps available.
    pub fn redo_count(&self) -> usize {
        self.redo_log.len()
    }

    /// Returns the maximum number of undo steps kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
