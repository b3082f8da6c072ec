//! # bfpilot VM
//!
//! The tape machine at the center of bfpilot, plus the pieces that
//! connect it to a game: decoding interpreter output into discrete
//! actions, and the sequence-oracle capability that generates new
//! programs.
//!
//! ## Core Concepts
//! - **Tape**: a fixed-size circular array of byte cells; pointer and
//!   cell arithmetic both wrap, so out-of-range access cannot happen
//! - **Program**: an immutable sequence over the 8-symbol alphabet
//! - **Interpreter**: pure execution of (program, tape, pointer) into
//!   (output, final tape, pointer); tolerant of malformed programs
//! - **Actions**: the closed command vocabulary the physics loop consumes
//! - **Oracle**: trait-based async access to a predict-next-token model

pub mod action;
pub mod interpreter;
pub mod opcode;
pub mod oracle;
pub mod tape;

pub use action::{decode, decode_char, Action};
pub use interpreter::{interpret, Execution, Halt, Interpreter, InterpreterLimits};
pub use opcode::{Op, Program, ALPHABET, VOCAB_SIZE};
pub use oracle::{
    MarkovConfig, MarkovOracle, OracleError, ScriptedOracle, SequenceOracle, SymbolChunk,
    SymbolStream, CONTEXT_LENGTH,
};
pub use tape::{Tape, DEFAULT_TAPE_LEN};
