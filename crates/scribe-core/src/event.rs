//! Session notifications.
//!
//! ## Learning: Observer Pattern in Rust
//!
//! Rather than registering callbacks that borrow the session, observers
//! (a title bar, a status line) hold a receiver on a broadcast channel.
//! Events are plain values; the session never knows who is listening.
//!
//! `tokio::sync::broadcast` works without a runtime: `send` and
//! `try_recv` are synchronous, which suits the single-threaded session.

use scribe_buffer::Position;
use std::path::PathBuf;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

/// Things that happen to a document session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A fresh, untitled document replaced the current one
    Created,
    /// Loaded content replaced the current document
    Opened(Option<PathBuf>),
    /// The buffer content changed (edit, undo or redo)
    Changed,
    /// The collaborator confirmed a successful save
    Saved(Option<PathBuf>),
    /// The cursor moved
    CursorMoved(Position),
}

/// Event bus for broadcasting session events.
///
/// Emitting with no subscribers is not an error.
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        // Capacity of 256 events in the buffer
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribes to future events.
    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

/// Non-blocking receiving end of the bus.
pub struct EventReceiver {
    receiver: broadcast::Receiver<SessionEvent>,
}

impl EventReceiver {
    /// Returns the next pending event, if any.
    ///
    /// A receiver that fell behind skips what it missed and keeps going.
    pub fn poll(&mut self) -> Option<SessionEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(n)) => {
                    tracing::warn!("Event receiver lagged, missed {} events", n);
                    continue;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drains every pending event.
    pub fn drain(&mut self) -> Vec<SessionEvent> {
        std::iter::from_fn(|| self.poll()).collect()
    }
}
