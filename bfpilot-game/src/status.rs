//! # Status channel
//!
//! Human-readable progress events for an external display (the original
//! renders these into a training-info element; the CLI prints them).
//! Status is observability only - nothing in the core depends on a
//! consumer existing, and a dropped receiver is ignored.

use std::fmt;
use tokio::sync::mpsc;

/// A status event from the trainer or scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// A training round is underway
    Training,
    /// The oracle finished its first warm-up and can generate
    Ready,
    /// A background retraining iteration completed
    Iteration(u64),
    /// Something failed; the system keeps running
    Error(String),
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEvent::Training => write!(f, "training"),
            StatusEvent::Ready => write!(f, "ready"),
            StatusEvent::Iteration(n) => write!(f, "iteration {}", n),
            StatusEvent::Error(e) => write!(f, "error: {}", e),
        }
    }
}

/// Sender half of the status channel.
pub type StatusSender = mpsc::UnboundedSender<StatusEvent>;

/// Receiver half of the status channel.
pub type StatusReceiver = mpsc::UnboundedReceiver<StatusEvent>;

/// Create a status channel.
pub fn status_channel() -> (StatusSender, StatusReceiver) {
    mpsc::unbounded_channel()
}

/// Send an event, ignoring a closed channel - status consumers are
/// optional.
pub fn emit(sender: &StatusSender, event: StatusEvent) {
    let _ = sender.send(event);
}
