//! # Interpreter
//!
//! Executes a [`Program`] against a [`Tape`]: a linear cursor scan with
//! stack-based loop matching. Execution is a pure function of
//! (program, tape, pointer) - the only outputs are the returned
//! [`Execution`] and the final tape state, readable afterwards for
//! continuation runs.
//!
//! Malformed programs never crash the machine. An unmatched bracket that
//! would require a jump ends the run early with whatever output had
//! accumulated, and a step limit bounds non-terminating loops, so
//! model-emitted garbage cannot wedge a frame pipeline.

use crate::opcode::{Op, Program};
use crate::tape::Tape;

/// Execution limits for one run
#[derive(Debug, Clone, Copy)]
pub struct InterpreterLimits {
    /// Maximum instructions executed before the run is cut off
    pub max_steps: usize,
}

impl Default for InterpreterLimits {
    fn default() -> Self {
        Self {
            max_steps: 1_000_000,
        }
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// The cursor ran off the end of the program
    Completed,
    /// A jump was required but no matching bracket exists; the run ended
    /// early with the output accumulated so far
    UnmatchedBracket,
    /// The step limit was reached
    StepLimit,
}

/// The result of one run: accumulated output plus how it ended.
///
/// Truncation is data, not an error - callers decode whatever output was
/// produced and carry on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Characters emitted by output instructions, in order
    pub output: String,
    /// How the run ended
    pub halt: Halt,
    /// Instructions executed
    pub steps: usize,
}

/// The tape machine.
///
/// Each [`run`](Interpreter::run) is an independent execution over the
/// machine's current tape; a fresh machine starts from a zeroed tape with
/// the pointer at 0, and [`with_tape`](Interpreter::with_tape) starts
/// from caller-supplied memory for continuation scenarios.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    tape: Tape,
    limits: InterpreterLimits,
}

impl Interpreter {
    /// Create a machine with a fresh zeroed tape
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a machine over caller-supplied memory
    pub fn with_tape(tape: Tape) -> Self {
        Self {
            tape,
            limits: InterpreterLimits::default(),
        }
    }

    /// Override the execution limits
    pub fn with_limits(mut self, limits: InterpreterLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The machine's tape (final state after a run)
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Consume the machine, returning its tape
    pub fn into_tape(self) -> Tape {
        self.tape
    }

    /// Execute a program over the machine's tape.
    ///
    /// Loop semantics (stack-based matching):
    /// - `[` with a zero cell scans forward past the matching `]`,
    ///   counting nesting; scanning off the end halts with
    ///   [`Halt::UnmatchedBracket`]. With a nonzero cell the cursor
    ///   position is pushed and execution falls through.
    /// - `]` with a nonzero cell jumps to just after the innermost open
    ///   `[`; with no open `[` the jump is impossible and the run halts.
    ///   With a zero cell the innermost open `[` is discarded; a stray
    ///   `]` over a zero cell is inert.
    pub fn run(&mut self, program: &Program) -> Execution {
        let mut cursor = 0usize;
        let mut steps = 0usize;
        let mut output = String::new();
        let mut loop_stack: Vec<usize> = Vec::new();

        while let Some(op) = program.get(cursor) {
            if steps >= self.limits.max_steps {
                return Execution {
                    output,
                    halt: Halt::StepLimit,
                    steps,
                };
            }
            steps += 1;

            match op {
                Op::Right => self.tape.move_right(),
                Op::Left => self.tape.move_left(),
                Op::Inc => self.tape.increment(),
                Op::Dec => self.tape.decrement(),
                Op::Output => output.push(self.tape.current() as char),
                // Input is accepted but inert: no input channel is
                // connected, and aborting on it would kill otherwise
                // runnable model output.
                Op::Input => {}
                Op::LoopStart => {
                    if self.tape.current() == 0 {
                        match matching_loop_end(program, cursor) {
                            Some(end) => cursor = end,
                            None => {
                                return Execution {
                                    output,
                                    halt: Halt::UnmatchedBracket,
                                    steps,
                                }
                            }
                        }
                    } else {
                        loop_stack.push(cursor);
                    }
                }
                Op::LoopEnd => {
                    if self.tape.current() != 0 {
                        match loop_stack.last() {
                            Some(&start) => {
                                cursor = start + 1;
                                continue;
                            }
                            None => {
                                return Execution {
                                    output,
                                    halt: Halt::UnmatchedBracket,
                                    steps,
                                }
                            }
                        }
                    } else {
                        loop_stack.pop();
                    }
                }
            }

            cursor += 1;
        }

        Execution {
            output,
            halt: Halt::Completed,
            steps,
        }
    }
}

/// Run a program on a fresh machine and return the execution.
pub fn interpret(code: &str) -> Execution {
    Interpreter::new().run(&Program::parse(code))
}

/// Position of the `]` matching the `[` at `start`, scanning forward with
/// a nesting counter. Bounded by the program length; `None` when the
/// program ends before the loop closes.
fn matching_loop_end(program: &Program, start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = start;
    while depth > 0 {
        i += 1;
        match program.get(i)? {
            Op::LoopStart => depth += 1,
            Op::LoopEnd => depth -= 1,
            _ => {}
        }
    }
    Some(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_increment_and_output() {
        let exec = interpret("+++.");
        assert_eq!(exec.halt, Halt::Completed);
        assert_eq!(exec.output, "\u{3}");
    }

    #[test]
    fn test_hello_style_loop() {
        // 6 * 7 = 42 via a counting loop, then output '*'
        let exec = interpret("++++++[>+++++++<-]>.");
        assert_eq!(exec.halt, Halt::Completed);
        assert_eq!(exec.output, "*");
    }

    #[test]
    fn test_pointer_wraps_instead_of_escaping() {
        let mut interp = Interpreter::with_tape(Tape::with_len(4));
        let exec = interp.run(&Program::parse("<+"));
        assert_eq!(exec.halt, Halt::Completed);
        assert_eq!(interp.tape().pointer(), 3);
        assert_eq!(interp.tape().current(), 1);
    }

    #[test]
    fn test_clear_loop_on_preloaded_cell() {
        let mut tape = Tape::with_len(8);
        tape.set_current(5);
        let mut interp = Interpreter::with_tape(tape);

        let exec = interp.run(&Program::parse("[-]"));
        assert_eq!(exec.halt, Halt::Completed);
        assert_eq!(exec.output, "");
        assert_eq!(interp.tape().current(), 0);
        assert_eq!(interp.tape().pointer(), 0);
    }

    #[test]
    fn test_unmatched_open_bracket_terminates() {
        let exec = interpret("[");
        assert_eq!(exec.halt, Halt::UnmatchedBracket);
        assert_eq!(exec.output, "");
    }

    #[test]
    fn test_unmatched_open_bracket_keeps_output() {
        let exec = interpret("+.[");
        assert_eq!(exec.halt, Halt::UnmatchedBracket);
        assert_eq!(exec.output, "\u{1}");
    }

    #[test]
    fn test_unmatched_close_needing_jump_terminates() {
        let exec = interpret("+]");
        assert_eq!(exec.halt, Halt::UnmatchedBracket);
    }

    #[test]
    fn test_stray_close_over_zero_cell_is_inert() {
        let exec = interpret("]+.");
        assert_eq!(exec.halt, Halt::Completed);
        assert_eq!(exec.output, "\u{1}");
    }

    #[test]
    fn test_nested_loops_skip_when_zero() {
        let exec = interpret("[[[+]]].");
        assert_eq!(exec.halt, Halt::Completed);
        assert_eq!(exec.output, "\u{0}");
    }

    #[test]
    fn test_input_is_inert() {
        let exec = interpret(",,.");
        assert_eq!(exec.halt, Halt::Completed);
        assert_eq!(exec.output, "\u{0}");
    }

    #[test]
    fn test_step_limit_cuts_infinite_loop() {
        let mut interp = Interpreter::new().with_limits(InterpreterLimits { max_steps: 500 });
        let exec = interp.run(&Program::parse("+[]"));
        assert_eq!(exec.halt, Halt::StepLimit);
        assert_eq!(exec.steps, 500);
    }

    #[test]
    fn test_continuation_keeps_tape() {
        let mut interp = Interpreter::new();
        interp.run(&Program::parse("+++"));
        let exec = interp.run(&Program::parse("."));
        assert_eq!(exec.output, "\u{3}");
    }

    #[test]
    fn test_determinism() {
        let a = interpret("++[>++<-]>.");
        let b = interpret("++[>++<-]>.");
        assert_eq!(a, b);
    }

    // Property: for bracket-free programs the output length equals the
    // number of output instructions and each byte is the per-cell
    // increment sum mod 256.
    proptest! {
        #[test]
        fn prop_linear_programs_sum_increments(code in "[><+.-]{0,64}") {
            let program = Program::parse(&code);
            let exec = Interpreter::with_tape(Tape::with_len(16)).run(&program);

            prop_assert_eq!(exec.halt, Halt::Completed);

            let mut cells = [0i64; 16];
            let mut pointer = 0usize;
            let mut expected = String::new();
            for op in program.ops() {
                match op {
                    Op::Right => pointer = (pointer + 1) % 16,
                    Op::Left => pointer = (pointer + 15) % 16,
                    Op::Inc => cells[pointer] += 1,
                    Op::Dec => cells[pointer] -= 1,
                    Op::Output => {
                        expected.push(cells[pointer].rem_euclid(256) as u8 as char)
                    }
                    _ => unreachable!(),
                }
            }
            let outputs = program.ops().iter().filter(|op| **op == Op::Output).count();
            prop_assert_eq!(exec.output.chars().count(), outputs);
            prop_assert_eq!(exec.output, expected);
        }

        // Property: arbitrary symbol soup never panics and never drives
        // the pointer out of range, including pathological wraparound.
        #[test]
        fn prop_pointer_and_cells_stay_bounded(code in "[><+.,\\-\\[\\]]{0,128}") {
            let mut interp = Interpreter::with_tape(Tape::with_len(8))
                .with_limits(InterpreterLimits { max_steps: 10_000 });
            let _ = interp.run(&Program::parse(&code));
            prop_assert!(interp.tape().pointer() < interp.tape().len());
        }
    }
}
