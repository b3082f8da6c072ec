//! # Action decoding
//!
//! Maps interpreter output characters onto the small action vocabulary
//! the physics loop consumes. Decoding is total and stateless: every
//! character decodes independently, and characters with no mapping are
//! dropped rather than enqueued, so dead ticks never pollute the action
//! queue.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One discrete game command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Accelerate the player left
    MoveLeft,
    /// Accelerate the player right
    MoveRight,
    /// Jump, if grounded
    Jump,
    /// Do nothing this tick
    Noop,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::MoveLeft => "move-left",
            Action::MoveRight => "move-right",
            Action::Jump => "jump",
            Action::Noop => "no-op",
        };
        write!(f, "{}", s)
    }
}

/// Decode a single character, `None` when it has no mapping.
pub fn decode_char(c: char) -> Option<Action> {
    match c {
        '+' => Some(Action::MoveRight),
        '-' => Some(Action::MoveLeft),
        '>' => Some(Action::Jump),
        _ => None,
    }
}

/// Decode interpreter output into an ordered action sequence.
///
/// Never fails, for any input: unmapped characters (including the rest of
/// the instruction alphabet and arbitrary noise) are skipped, so the
/// result is never longer than the input.
pub fn decode(output: &str) -> Vec<Action> {
    output.chars().filter_map(decode_char).collect()
}
