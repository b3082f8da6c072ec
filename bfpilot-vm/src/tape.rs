//! # Tape memory
//!
//! The interpreter's circular byte tape. The pointer wraps at both ends
//! and cell arithmetic wraps mod 256, so out-of-range access is
//! structurally impossible rather than checked.

use serde::{Deserialize, Serialize};

/// Default number of cells (matching the classic machine size)
pub const DEFAULT_TAPE_LEN: usize = 30_000;

/// A fixed-size circular array of byte cells with a movable pointer.
///
/// Snapshots serialize, so callers can inspect or persist memory between
/// continuation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Tape {
    /// Create a zeroed tape of the default length with the pointer at 0
    pub fn new() -> Self {
        Self::with_len(DEFAULT_TAPE_LEN)
    }

    /// Create a zeroed tape with a custom cell count.
    ///
    /// Lengths below 1 are rounded up to 1 so pointer arithmetic stays
    /// well-defined.
    pub fn with_len(len: usize) -> Self {
        Self {
            cells: vec![0; len.max(1)],
            pointer: 0,
        }
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A tape always has at least one cell
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Current pointer position
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Value of the cell under the pointer
    pub fn current(&self) -> u8 {
        self.cells[self.pointer]
    }

    /// Overwrite the cell under the pointer
    pub fn set_current(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    /// Value at an absolute cell index, wrapped into range
    pub fn get(&self, index: usize) -> u8 {
        self.cells[index % self.cells.len()]
    }

    /// Move the pointer one cell right, wrapping at the end
    pub fn move_right(&mut self) {
        self.pointer = (self.pointer + 1) % self.cells.len();
    }

    /// Move the pointer one cell left, wrapping at the start
    pub fn move_left(&mut self) {
        self.pointer = (self.pointer + self.cells.len() - 1) % self.cells.len();
    }

    /// Increment the current cell mod 256
    pub fn increment(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_add(1);
    }

    /// Decrement the current cell mod 256
    pub fn decrement(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_sub(1);
    }

    /// All cells, for memory inspection
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// A window of cells centered on the pointer, for display.
    ///
    /// Returns (start index, slice) clamped to the tape bounds.
    pub fn window(&self, width: usize) -> (usize, &[u8]) {
        let half = width / 2;
        let start = self.pointer.saturating_sub(half);
        let end = (start + width).min(self.cells.len());
        (start, &self.cells[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_tape() {
        let tape = Tape::new();
        assert_eq!(tape.len(), DEFAULT_TAPE_LEN);
        assert_eq!(tape.pointer(), 0);
        assert_eq!(tape.current(), 0);
    }

    #[test]
    fn test_pointer_wraps_left() {
        let mut tape = Tape::with_len(4);
        tape.move_left();
        assert_eq!(tape.pointer(), 3);
        tape.move_left();
        assert_eq!(tape.pointer(), 2);
    }

    #[test]
    fn test_pointer_wraps_right() {
        let mut tape = Tape::with_len(4);
        for _ in 0..4 {
            tape.move_right();
        }
        assert_eq!(tape.pointer(), 0);
    }

    #[test]
    fn test_cell_wraps_both_directions() {
        let mut tape = Tape::with_len(1);
        tape.decrement();
        assert_eq!(tape.current(), 255);
        tape.increment();
        assert_eq!(tape.current(), 0);
        for _ in 0..300 {
            tape.increment();
        }
        assert_eq!(tape.current(), 300 % 256);
    }

    #[test]
    fn test_window_clamps() {
        let mut tape = Tape::with_len(10);
        let (start, cells) = tape.window(6);
        assert_eq!(start, 0);
        assert_eq!(cells.len(), 6);

        for _ in 0..8 {
            tape.move_right();
        }
        let (start, cells) = tape.window(6);
        assert_eq!(start, 5);
        assert_eq!(cells.len(), 5); // clamped at the tape end
    }

    #[test]
    fn test_snapshot_round_trips() {
        let mut tape = Tape::with_len(4);
        tape.increment();
        tape.move_right();
        let json = serde_json::to_string(&tape).unwrap();
        let back: Tape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tape);
    }

    #[test]
    fn test_min_len_one() {
        let mut tape = Tape::with_len(0);
        assert_eq!(tape.len(), 1);
        tape.move_right();
        assert_eq!(tape.pointer(), 0);
    }
}
