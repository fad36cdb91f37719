//! # Scribe Core
//!
//! Document session logic and state management.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   DocumentSession                     │
//! │  ┌────────────┐ ┌─────────┐ ┌──────────────┐          │
//! │  │ TextBuffer │ │ History │ │ DirtyTracker │          │
//! │  └────────────┘ └─────────┘ └──────────────┘          │
//! │        ▲ read-only                                    │
//! │  ┌─────┴──────┐        ┌──────────┐                   │
//! │  │   search   │        │ EventBus │ ──▶ subscribers   │
//! │  └────────────┘        └──────────┘                   │
//! └──────────────────────────────────────────────────────┘
//!          ▲
//!          │ Command / Outcome
//!       UI front end (owns files, dialogs, rendering)
//! ```
//!
//! ## Learning: Module Organization
//!
//! Rust modules map to files:
//! - `mod foo;` looks for `foo.rs` or `foo/mod.rs`
//! - `pub use` re-exports items for cleaner public APIs

pub mod command;
pub mod config;
pub mod dirty;
pub mod event;
pub mod session;

pub use command::{Command, Outcome};
pub use config::{Config, ConfigError};
pub use dirty::DirtyTracker;
pub use event::{EventBus, EventReceiver, SessionEvent};
pub use session::{DocumentSession, EditRequest};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Buffer(#[from] scribe_buffer::BufferError),

    #[error("Clipboard is empty")]
    EmptyClipboard,
}

impl CoreError {
    /// Returns true for "nothing happened" signals (empty history, no
    /// match, nothing to paste) as opposed to rejected input.
    pub fn is_signal(&self) -> bool {
        match self {
            CoreError::Buffer(err) => err.is_signal(),
            CoreError::EmptyClipboard => true,
        }
    }
}
