//! # Seeds
//!
//! Deriving generation seeds from game state. The scheduler snapshots
//! the game at the moment a refill triggers and derives a short symbol
//! string from the snapshot; the oracle continues it. Seeds are consumed
//! once and never retain references into live state.

use bfpilot_vm::CONTEXT_LENGTH;
use serde::{Deserialize, Serialize};

/// An integral, by-value snapshot of the observable game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub player_x: i64,
    pub player_y: i64,
    pub goal_x: i64,
    pub goal_y: i64,
    pub level: u32,
    pub score: u64,
}

/// Derive a generation seed from a snapshot.
///
/// The formula is cheap, deterministic, and bounded: one `>` per digit
/// of the player's x position, one `+` per level (capped), and a final
/// symbol pointing at the goal (`+` when it lies to the right, `-`
/// otherwise). The result is truncated to the model context window, so
/// seed length can never grow with game state. Everything emitted is a
/// vocabulary symbol, so even a barely trained model finds the context
/// familiar.
pub fn derive_seed(snapshot: &GameSnapshot) -> String {
    let digits = snapshot.player_x.unsigned_abs().max(1).ilog10() as usize + 1;
    let levels = (snapshot.level as usize).min(6);

    let mut seed = String::with_capacity(CONTEXT_LENGTH);
    for _ in 0..digits.min(6) {
        seed.push('>');
    }
    for _ in 0..levels {
        seed.push('+');
    }
    seed.push(if snapshot.goal_x >= snapshot.player_x {
        '+'
    } else {
        '-'
    });

    seed.truncate(CONTEXT_LENGTH);
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> GameSnapshot {
        GameSnapshot {
            player_x: 123,
            player_y: 400,
            goal_x: 1250,
            goal_y: 400,
            level: 2,
            score: 100,
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(derive_seed(&snapshot()), derive_seed(&snapshot()));
    }

    #[test]
    fn test_formula() {
        // 3 digits of x, 2 levels, goal to the right
        assert_eq!(derive_seed(&snapshot()), ">>>+++");
    }

    #[test]
    fn test_goal_direction_symbol() {
        let mut snap = snapshot();
        snap.goal_x = 0;
        assert!(derive_seed(&snap).ends_with('-'));
    }

    #[test]
    fn test_bounded_for_extreme_states() {
        let snap = GameSnapshot {
            player_x: i64::MAX,
            player_y: 0,
            goal_x: 0,
            goal_y: 0,
            level: u32::MAX,
            score: u64::MAX,
        };
        let seed = derive_seed(&snap);
        assert!(seed.len() <= CONTEXT_LENGTH);
        assert!(!seed.is_empty());
    }

    #[test]
    fn test_snapshot_serializes_for_external_displays() {
        let json = serde_json::to_string(&snapshot()).unwrap();
        assert!(json.contains("\"player_x\":123"));
        assert!(json.contains("\"level\":2"));
    }

    #[test]
    fn test_zero_position() {
        let mut snap = snapshot();
        snap.player_x = 0;
        // Zero still counts one digit
        assert!(derive_seed(&snap).starts_with(">+"));
    }
}
