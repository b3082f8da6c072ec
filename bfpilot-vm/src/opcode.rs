//! # Instruction alphabet
//!
//! The eight-symbol instruction set the tape machine executes and the
//! sequence oracle emits. The alphabet ordering is load-bearing: oracle
//! token indices are positions in [`ALPHABET`], and seed padding uses
//! `ALPHABET[0]`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The instruction alphabet, in canonical token order.
pub const ALPHABET: [char; 8] = ['>', '<', '+', '-', '.', ',', '[', ']'];

/// Number of symbols in the alphabet
pub const VOCAB_SIZE: usize = ALPHABET.len();

/// A single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    /// `>` - move the tape pointer right (wraps at tape end)
    Right,
    /// `<` - move the tape pointer left (wraps at tape start)
    Left,
    /// `+` - increment the current cell mod 256
    Inc,
    /// `-` - decrement the current cell mod 256
    Dec,
    /// `.` - append the current cell as a character to the output
    Output,
    /// `,` - read one input byte; accepted but inert (no input channel)
    Input,
    /// `[` - skip past the matching `]` when the current cell is zero
    LoopStart,
    /// `]` - jump back after the matching `[` when the current cell is nonzero
    LoopEnd,
}

impl Op {
    /// Decode a character; `None` for anything outside the alphabet.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '>' => Some(Op::Right),
            '<' => Some(Op::Left),
            '+' => Some(Op::Inc),
            '-' => Some(Op::Dec),
            '.' => Some(Op::Output),
            ',' => Some(Op::Input),
            '[' => Some(Op::LoopStart),
            ']' => Some(Op::LoopEnd),
            _ => None,
        }
    }

    /// The character this instruction is written as.
    pub fn as_char(&self) -> char {
        match self {
            Op::Right => '>',
            Op::Left => '<',
            Op::Inc => '+',
            Op::Dec => '-',
            Op::Output => '.',
            Op::Input => ',',
            Op::LoopStart => '[',
            Op::LoopEnd => ']',
        }
    }

    /// Token index of this instruction in [`ALPHABET`].
    pub fn token_index(&self) -> usize {
        match self {
            Op::Right => 0,
            Op::Left => 1,
            Op::Inc => 2,
            Op::Dec => 3,
            Op::Output => 4,
            Op::Input => 5,
            Op::LoopStart => 6,
            Op::LoopEnd => 7,
        }
    }

    /// Instruction for a token index, if in range.
    pub fn from_token_index(index: usize) -> Option<Self> {
        ALPHABET.get(index).copied().and_then(Op::from_char)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// An immutable instruction sequence.
///
/// Parsing drops characters outside the alphabet, so model output and
/// hand-typed programs with whitespace or commentary are both accepted.
/// Brackets need not balance; the interpreter tolerates unmatched ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    ops: Vec<Op>,
}

impl Program {
    /// Parse program text, keeping only alphabet symbols.
    pub fn parse(text: &str) -> Self {
        Self {
            ops: text.chars().filter_map(Op::from_char).collect(),
        }
    }

    /// Number of instructions
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the program has no instructions
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Instruction at a cursor position
    pub fn get(&self, index: usize) -> Option<Op> {
        self.ops.get(index).copied()
    }

    /// All instructions as a slice
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }
}

impl FromStr for Program {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            write!(f, "{}", op.as_char())?;
        }
        Ok(())
    }
}
