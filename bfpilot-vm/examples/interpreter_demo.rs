//! # Interpreter Demo
//!
//! Demonstrates running programs through the bfpilot tape machine and
//! decoding the output into game actions.

use bfpilot_vm::{decode, interpret, Halt, Interpreter, Program, Tape};

fn main() {
    println!("=== bfpilot VM Demo ===\n");

    // Example 1: arithmetic through a counting loop
    demo_counting_loop();

    // Example 2: malformed model output is truncated, not fatal
    demo_unmatched_bracket();

    // Example 3: output characters become game actions
    demo_action_decoding();
}

fn demo_counting_loop() {
    println!("--- Demo 1: Counting loop ---");

    let exec = interpret("++++++[>+++++++<-]>.");
    println!("output: {:?} (halt: {:?}, steps: {})\n", exec.output, exec.halt, exec.steps);
}

fn demo_unmatched_bracket() {
    println!("--- Demo 2: Unmatched bracket ---");

    let exec = interpret("+.[");
    assert_eq!(exec.halt, Halt::UnmatchedBracket);
    println!(
        "truncated run kept {} output character(s), halt: {:?}\n",
        exec.output.len(),
        exec.halt
    );
}

fn demo_action_decoding() {
    println!("--- Demo 3: Action decoding ---");

    // A tape preloaded with '+' (43) so output instructions emit a
    // symbol the decoder maps to move-right.
    let mut tape = Tape::with_len(64);
    tape.set_current(b'+');

    let mut interp = Interpreter::with_tape(tape);
    let exec = interp.run(&Program::parse("..."));

    let actions = decode(&exec.output);
    println!("output: {:?} -> actions: {:?}", exec.output, actions);
}
