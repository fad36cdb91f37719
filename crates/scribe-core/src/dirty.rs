//! Modified-state tracking.
//!
//! The tracker answers "has anything been edited since the last load or
//! save?", not "does the content differ from what is on disk?". Undoing back
//! to the saved text therefore leaves the document modified.

/// Tracks whether the document has unsaved edits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyTracker {
    modified: bool,
}

impl DirtyTracker {
    /// Creates a clean tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the buffer was mutated.
    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    /// Records a successful save, or a fresh new/open.
    pub fn mark_clean(&mut self) {
        self.modified = false;
    }

    /// Returns true if there are unsaved edits.
    pub fn is_modified(&self) -> bool {
        self.modified
    }
}
