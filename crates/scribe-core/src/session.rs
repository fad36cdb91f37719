//! The document session.
//!
//! ## Learning: Composition over Inheritance
//!
//! `DocumentSession` owns a `TextBuffer`, a `History` and a `DirtyTracker`
//! and coordinates them. None of the parts knows about the others: the
//! buffer doesn't record history, the history doesn't mark anything dirty.
//! Keeping that wiring in one place is what lets each part stay simple.
//!
//! ## Lifecycle
//!
//! "New" and "open" replace the content wholesale and reset history and
//! dirty state. Whether it is OK to throw away unsaved edits is the
//! caller's decision: check [`DocumentSession::is_modified`] first.

use scribe_buffer::{
    EditRecord, History, Matches, Position, TextBuffer, TextRange, find_all, find_first_from,
    normalize_line_endings,
};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::dirty::DirtyTracker;
use crate::event::{EventBus, EventReceiver, SessionEvent};
use crate::{CoreError, CoreResult};

/// A single buffer mutation requested by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditRequest {
    /// Insert `text` at `at`
    Insert { at: Position, text: String },
    /// Remove the text in `range`
    Delete { range: TextRange },
}

/// One open document and everything needed to edit it.
///
/// # Thread Safety
///
/// The session does no locking. A UI that dispatches from several threads
/// must funnel all calls through one owner (a command queue, for example).
#[derive(Debug)]
pub struct DocumentSession {
    /// Document content
    buffer: TextBuffer,

    /// Undo/redo log
    history: History,

    /// Unsaved-changes flag
    dirty: DirtyTracker,

    /// Cursor position
    cursor: Position,

    /// File identity, owned by the caller (None for untitled documents)
    file: Option<PathBuf>,

    /// Last cut or copied text
    clipboard: Option<String>,

    /// Whether `find_next` wraps around to the start
    wrap_search: bool,

    /// Notifications for title bars and status lines
    events: EventBus,
}

impl DocumentSession {
    /// Creates a session holding an empty, untitled document.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Creates a session with custom configuration.
    pub fn with_config(config: &Config) -> Self {
        Self {
            buffer: TextBuffer::new(),
            history: History::new(config.history.capacity),
            dirty: DirtyTracker::new(),
            cursor: Position::START,
            file: None,
            clipboard: None,
            wrap_search: config.search.wrap,
            events: EventBus::new(),
        }
    }

    // ==================== Lifecycle ====================

    /// Replaces the document with an empty, untitled one.
    pub fn new_document(&mut self) {
        self.buffer = TextBuffer::new();
        self.reset();
        self.file = None;

        tracing::info!("Created new document");
        self.events.emit(SessionEvent::Created);
    }

    /// Replaces the document with loaded content.
    ///
    /// `file` is whatever identity the caller uses for the content (usually
    /// the path it was read from).
    pub fn open_document(&mut self, content: &str, file: Option<PathBuf>) {
        self.buffer.load(content);
        self.reset();
        self.file = file;

        tracing::info!(
            "Opened {} ({} lines)",
            self.display_name(),
            self.buffer.line_count()
        );
        self.events.emit(SessionEvent::Opened(self.file.clone()));
    }

    fn reset(&mut self) {
        self.history.clear();
        self.dirty.mark_clean();
        self.cursor = Position::START;
    }

    /// Returns the text to write to storage.
    ///
    /// Does not mark the document clean: call [`mark_saved`] once the write
    /// has actually succeeded.
    ///
    /// [`mark_saved`]: DocumentSession::mark_saved
    pub fn serialize_for_save(&self) -> String {
        self.buffer.serialize()
    }

    /// Records a confirmed save, optionally under a new identity (save-as).
    pub fn mark_saved(&mut self, file: Option<PathBuf>) {
        if file.is_some() {
            self.file = file;
        }
        self.dirty.mark_clean();

        tracing::info!("Saved {}", self.display_name());
        self.events.emit(SessionEvent::Saved(self.file.clone()));
    }

    // ==================== Editing ====================

    /// Applies an edit, records it for undo and marks the document modified.
    ///
    /// Returns the new cursor position. If the buffer rejects the edit,
    /// nothing is recorded and the modified flag is left alone. Edits that
    /// change nothing (empty insert, empty range) are validated but not
    /// recorded.
    pub fn apply_edit(&mut self, request: EditRequest) -> CoreResult<Position> {
        let (record, cursor) = match request {
            EditRequest::Insert { at, text } => {
                let text = normalize_line_endings(&text).into_owned();
                let cursor = self.buffer.insert(at, &text)?;
                tracing::debug!("Inserted {} chars at {}", text.chars().count(), at);
                ((!text.is_empty()).then(|| EditRecord::insert(at, text, cursor)), cursor)
            }
            EditRequest::Delete { range } => {
                let removed = self.buffer.delete(range)?;
                tracing::debug!("Deleted {}", range);
                let record = (!removed.is_empty())
                    .then(|| EditRecord::delete(range.start, removed, range.start));
                (record, range.start)
            }
        };

        if let Some(record) = record {
            if let Some(evicted) = self.history.record(record) {
                tracing::trace!("History full, dropped edit at {}", evicted.position);
            }
            self.dirty.mark_modified();
            self.events.emit(SessionEvent::Changed);
        }
        self.set_cursor(cursor);
        Ok(cursor)
    }

    /// Inserts text at a position.
    pub fn insert(&mut self, at: Position, text: impl Into<String>) -> CoreResult<Position> {
        self.apply_edit(EditRequest::Insert {
            at,
            text: text.into(),
        })
    }

    /// Deletes the text in a range.
    pub fn delete(&mut self, range: TextRange) -> CoreResult<Position> {
        self.apply_edit(EditRequest::Delete { range })
    }

    // ==================== Undo/Redo ====================

    /// Undoes the last edit.
    ///
    /// The document stays modified even when this brings the content back
    /// to what was last saved.
    pub fn undo(&mut self) -> CoreResult<Position> {
        let cursor = self.history.undo(&mut self.buffer)?;
        tracing::debug!("Undo, cursor at {}", cursor);
        self.after_history_step(cursor);
        Ok(cursor)
    }

    /// Redoes the last undone edit.
    pub fn redo(&mut self) -> CoreResult<Position> {
        let cursor = self.history.redo(&mut self.buffer)?;
        tracing::debug!("Redo, cursor at {}", cursor);
        self.after_history_step(cursor);
        Ok(cursor)
    }

    fn after_history_step(&mut self, cursor: Position) {
        self.dirty.mark_modified();
        self.events.emit(SessionEvent::Changed);
        self.set_cursor(cursor);
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ==================== Clipboard ====================

    /// Copies the text in `range` to the session clipboard.
    pub fn copy(&mut self, range: TextRange) -> CoreResult<String> {
        let text = self.buffer.read(range)?;
        self.clipboard = Some(text.clone());
        Ok(text)
    }

    /// Removes the text in `range` and keeps it on the clipboard.
    ///
    /// Recorded as a single delete.
    pub fn cut(&mut self, range: TextRange) -> CoreResult<String> {
        let text = self.buffer.read(range)?;
        self.delete(range)?;
        self.clipboard = Some(text.clone());
        Ok(text)
    }

    /// Inserts the clipboard contents at `at`, recorded as a single insert.
    pub fn paste(&mut self, at: Position) -> CoreResult<Position> {
        let text = self.clipboard.clone().ok_or(CoreError::EmptyClipboard)?;
        self.insert(at, text)
    }

    /// Returns the last cut or copied text.
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// Returns the range covering the whole document and moves the cursor
    /// to its start.
    pub fn select_all(&mut self) -> TextRange {
        self.set_cursor(Position::START);
        self.buffer.full_range()
    }

    // ==================== Search ====================

    /// Returns every match of `query`, in document order.
    pub fn search<'a>(&'a self, query: &'a str) -> Matches<'a> {
        find_all(&self.buffer, query)
    }

    /// Returns the first match of `query` at or after `from`.
    pub fn search_from(&self, query: &str, from: Position) -> CoreResult<TextRange> {
        Ok(find_first_from(&self.buffer, query, from)?)
    }

    /// Collects every match for highlighting and moves the cursor to the end
    /// of the first one, so a following [`find_next`] moves on to the second.
    /// The cursor stays put when nothing matches.
    ///
    /// [`find_next`]: DocumentSession::find_next
    pub fn find(&mut self, query: &str) -> Vec<TextRange> {
        let matches: Vec<TextRange> = self.search(query).collect();
        tracing::debug!("Found {} matches for {:?}", matches.len(), query);

        if let Some(first) = matches.first() {
            self.set_cursor(first.end);
        }
        matches
    }

    /// Finds the next match at or after the cursor and moves the cursor to
    /// its end, so repeated calls step through the document.
    ///
    /// Wraps to the start of the document when search wrapping is enabled.
    pub fn find_next(&mut self, query: &str) -> CoreResult<TextRange> {
        let found = match self.search_from(query, self.cursor) {
            Err(CoreError::Buffer(scribe_buffer::BufferError::NotFound)) if self.wrap_search => {
                self.search_from(query, Position::START)?
            }
            other => other?,
        };
        self.set_cursor(found.end);
        Ok(found)
    }

    // ==================== Cursor ====================

    /// Returns the cursor position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Moves the cursor. Fails with `OutOfRange` instead of clamping.
    pub fn move_cursor(&mut self, to: Position) -> CoreResult<()> {
        self.buffer.char_index(to)?;
        self.set_cursor(to);
        Ok(())
    }

    fn set_cursor(&mut self, to: Position) {
        if self.cursor != to {
            self.cursor = to;
            self.events.emit(SessionEvent::CursorMoved(to));
        }
    }

    /// Returns the cursor as a status bar label, e.g. `Line 3, Column 1`.
    pub fn cursor_label(&self) -> String {
        format!("Line {}, Column {}", self.cursor.line, self.cursor.column + 1)
    }

    // ==================== State Queries ====================

    /// Returns true if the document has unsaved edits.
    pub fn is_modified(&self) -> bool {
        self.dirty.is_modified()
    }

    /// Returns the file identity, if any.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Returns the file name, or `Untitled`.
    pub fn display_name(&self) -> Cow<'_, str> {
        self.file
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy())
            .unwrap_or(Cow::Borrowed("Untitled"))
    }

    /// Returns the text buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Returns the edit history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self::new()
    }
}
