//! Command interface for session actions.
//!
//! ## Learning: The Command Pattern
//!
//! Commands encapsulate actions as values:
//! - A menu item, a toolbar button and a key binding can all produce the
//!   same `Command`, so none of them needs to call into the session itself
//! - Every command returns an explicit `Outcome` or error, which the UI
//!   turns into a status message, a beep, or nothing at all
//!
//! File dialogs, reading and writing happen outside: `OpenDocument` carries
//! content that was already read, and `MarkSaved` is sent after a write
//! succeeded.

use scribe_buffer::{Position, TextRange};
use std::path::PathBuf;

use crate::session::{DocumentSession, EditRequest};
use crate::CoreResult;

/// Session commands.
///
/// ## Learning: Exhaustive Enums
///
/// With `#[non_exhaustive]`, we signal that new variants may be added.
/// Code outside this crate has to include a `_ =>` arm when matching.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    // File commands
    NewDocument,
    OpenDocument { content: String, file: Option<PathBuf> },
    MarkSaved { file: Option<PathBuf> },

    // Edit commands
    Insert { at: Position, text: String },
    Delete { range: TextRange },
    Undo,
    Redo,
    Cut { range: TextRange },
    Copy { range: TextRange },
    Paste { at: Position },
    SelectAll,

    // Search
    Find { query: String },
    FindNext { query: String },

    // Cursor movement
    MoveCursor { to: Position },
}

/// What a successfully executed command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report
    Done,
    /// The cursor ended up here
    Cursor(Position),
    /// Text that was cut or copied
    Text(String),
    /// A range to select or highlight
    Range(TextRange),
    /// Ranges to highlight, in document order
    Matches(Vec<TextRange>),
}

impl Command {
    /// Returns the command's display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Command::NewDocument => "New",
            Command::OpenDocument { .. } => "Open",
            Command::MarkSaved { .. } => "Save",
            Command::Insert { .. } => "Insert",
            Command::Delete { .. } => "Delete",
            Command::Undo => "Undo",
            Command::Redo => "Redo",
            Command::Cut { .. } => "Cut",
            Command::Copy { .. } => "Copy",
            Command::Paste { .. } => "Paste",
            Command::SelectAll => "Select All",
            Command::Find { .. } => "Find",
            Command::FindNext { .. } => "Find Next",
            Command::MoveCursor { .. } => "Go To",
        }
    }

    /// Returns true if the command replaces the whole document.
    ///
    /// The UI must run its unsaved-changes check before executing these.
    pub fn replaces_document(&self) -> bool {
        matches!(self, Command::NewDocument | Command::OpenDocument { .. })
    }

    /// Executes the command against a session.
    pub fn execute(self, session: &mut DocumentSession) -> CoreResult<Outcome> {
        tracing::trace!("Executing {}", self.display_name());

        let outcome = match self {
            Command::NewDocument => {
                session.new_document();
                Outcome::Done
            }
            Command::OpenDocument { content, file } => {
                session.open_document(&content, file);
                Outcome::Done
            }
            Command::MarkSaved { file } => {
                session.mark_saved(file);
                Outcome::Done
            }
            Command::Insert { at, text } => {
                Outcome::Cursor(session.apply_edit(EditRequest::Insert { at, text })?)
            }
            Command::Delete { range } => {
                Outcome::Cursor(session.apply_edit(EditRequest::Delete { range })?)
            }
            Command::Undo => Outcome::Cursor(session.undo()?),
            Command::Redo => Outcome::Cursor(session.redo()?),
            Command::Cut { range } => Outcome::Text(session.cut(range)?),
            Command::Copy { range } => Outcome::Text(session.copy(range)?),
            Command::Paste { at } => Outcome::Cursor(session.paste(at)?),
            Command::SelectAll => Outcome::Range(session.select_all()),
            Command::Find { query } => Outcome::Matches(session.find(&query)),
            Command::FindNext { query } => Outcome::Range(session.find_next(&query)?),
            Command::MoveCursor { to } => {
                session.move_cursor(to)?;
                Outcome::Cursor(to)
            }
        };
        Ok(outcome)
    }
}

impl DocumentSession {
    /// Executes a command. See [`Command::execute`].
    pub fn execute(&mut self, command: Command) -> CoreResult<Outcome> {
        command.execute(self)
    }
}
