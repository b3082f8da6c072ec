//! # bfpilot CLI
//!
//! Command-line interface for the model-piloted platformer.
//!
//! Usage:
//!   bfpilot interpret <CODE>
//!   bfpilot generate --seed <SEED> [--count N]
//!   bfpilot play [--frames N] [--manual]
//!
//! Examples:
//!   bfpilot interpret "++++++[>+++++++<-]>."
//!   bfpilot interpret --file program.bf --actions
//!   bfpilot generate --seed ">>++" --count 32 --corpus corpus.bf
//!   bfpilot play --frames 600 --corpus corpus.bf

use bfpilot_error::Result;
use bfpilot_game::{
    status_channel, ControlMode, GameLogic, PhysicsConfig, Scheduler, SchedulerConfig, Trainer,
    TrainerConfig,
};
use bfpilot_vm::{decode, Halt, Interpreter, MarkovOracle, Program, SequenceOracle};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

/// Program snippets the oracle trains on when no corpus files are given.
/// Biased toward output-heavy loops so a fresh pilot produces movement
/// rather than silence.
const DEFAULT_CORPUS: &[&str] = &[
    "+.+.+.+.>.+.+.",
    "++[>+.+.<-]>.",
    "+.-.+.+.>.+.",
    "+++.>.+.+.-.+.",
    "+.+.>.>.+.+.+.",
];

#[derive(Parser)]
#[command(name = "bfpilot")]
#[command(author, version, about = "bfpilot - a platformer piloted by a tiny sequence model")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (per-frame actions, raw symbols)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only show final results
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program through the tape machine
    Interpret {
        /// Program text (ignored when --file is given)
        code: Option<String>,

        /// Read the program from a file
        #[arg(short, long)]
        file: Option<String>,

        /// Also decode the output into game actions
        #[arg(short, long)]
        actions: bool,

        /// Show this many tape cells around the pointer after the run
        #[arg(long, default_value = "0")]
        cells: usize,
    },
    /// Train the oracle and extend a seed
    Generate {
        /// Seed the generation continues from
        #[arg(short, long, default_value = "")]
        seed: String,

        /// Symbols to generate
        #[arg(short, long, default_value = "32")]
        count: usize,

        /// Corpus files (program text); built-in corpus when omitted
        #[arg(long)]
        corpus: Vec<String>,
    },
    /// Run the game headless with the oracle at the controls
    Play {
        /// Frames to simulate
        #[arg(long, default_value = "600")]
        frames: u64,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: u64,

        /// Start in manual mode (the pilot stays idle)
        #[arg(long)]
        manual: bool,

        /// Symbols requested per queue refill
        #[arg(long, default_value = "16")]
        refill: usize,

        /// Corpus files (program text); built-in corpus when omitted
        #[arg(long)]
        corpus: Vec<String>,
    },
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len).collect();
        format!("{}…", head)
    }
}

/// Read corpus files, falling back to the built-in corpus.
fn load_corpus(files: &[String]) -> Result<Vec<String>> {
    if files.is_empty() {
        return Ok(DEFAULT_CORPUS.iter().map(|s| s.to_string()).collect());
    }

    let mut corpus = Vec::with_capacity(files.len());
    for path in files {
        let text = std::fs::read_to_string(path)
            .map_err(|e| bfpilot_error::Error::from(e).with_context("path", path.clone()))?;
        corpus.push(text);
    }
    Ok(corpus)
}

fn run_interpret(
    code: Option<String>,
    file: Option<String>,
    actions: bool,
    cells: usize,
    quiet: bool,
) -> Result<()> {
    let source = match (code, file) {
        (_, Some(path)) => std::fs::read_to_string(&path)
            .map_err(|e| bfpilot_error::Error::from(e).with_context("path", path))?,
        (Some(text), None) => text,
        (None, None) => {
            return Err(bfpilot_error::Error::invalid_argument(
                "provide program text or --file",
            ))
        }
    };

    let program = Program::parse(&source);
    let mut interp = Interpreter::new();
    let exec = interp.run(&program);

    if quiet {
        println!("{}", exec.output);
    } else {
        println!("Program: {} instruction(s)", program.len());
        println!("Output: {:?}", truncate(&exec.output, 120));
        match exec.halt {
            Halt::Completed => println!("Halted: completed in {} step(s)", exec.steps),
            Halt::UnmatchedBracket => {
                println!("Halted: unmatched bracket after {} step(s), output truncated", exec.steps)
            }
            Halt::StepLimit => println!("Halted: step limit after {} step(s)", exec.steps),
        }
    }

    if actions {
        let decoded = decode(&exec.output);
        println!("Actions ({}):", decoded.len());
        for action in decoded {
            println!("  - {}", action);
        }
    }

    if cells > 0 {
        let (start, window) = interp.tape().window(cells);
        println!("Tape around pointer {}:", interp.tape().pointer());
        for (offset, value) in window.iter().enumerate() {
            let index = start + offset;
            let marker = if index == interp.tape().pointer() { " <-" } else { "" };
            println!("  [{:5}] {:3}{}", index, value, marker);
        }
    }

    Ok(())
}

async fn run_generate(seed: String, count: usize, corpus: Vec<String>, quiet: bool) -> Result<()> {
    let corpus = load_corpus(&corpus)?;
    let oracle = MarkovOracle::default();

    if !quiet {
        println!("Training on {} corpus text(s)...", corpus.len());
    }
    oracle.warm_up(&corpus).await?;

    let symbols = oracle.extend(&seed, count).await?;
    if quiet {
        println!("{}", symbols);
    } else {
        println!("Seed:      {:?}", seed);
        println!("Generated: {}", symbols);
        println!("Actions:   {:?}", decode(&symbols));
    }
    Ok(())
}

async fn run_play(
    frames: u64,
    fps: u64,
    manual: bool,
    refill: usize,
    corpus: Vec<String>,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let corpus = load_corpus(&corpus)?;
    let oracle = Arc::new(MarkovOracle::default());
    let (status_tx, mut status_rx) = status_channel();

    let trainer = Trainer::spawn(
        Arc::clone(&oracle),
        corpus,
        TrainerConfig::default(),
        status_tx.clone(),
    );

    let mut game = GameLogic::new(PhysicsConfig::default());
    let mut scheduler = Scheduler::new(Arc::clone(&oracle), status_tx)
        .with_config(SchedulerConfig {
            refill_count: refill,
        });
    if !manual {
        scheduler.set_mode(ControlMode::Pilot);
    }

    if !quiet {
        println!(
            "Playing {} frame(s) at {} fps ({} mode)\n",
            frames,
            fps,
            if manual { "manual" } else { "pilot" }
        );
    }

    let frame_millis = (1000 / fps.max(1)).max(1);
    let mut interval = tokio::time::interval(Duration::from_millis(frame_millis));
    for frame in 0..frames {
        interval.tick().await;

        while let Ok(event) = status_rx.try_recv() {
            if !quiet {
                println!("   [{}]", event);
            }
        }

        let snapshot = game.snapshot();
        scheduler.maybe_refill(&snapshot);
        if let Some(action) = scheduler.tick() {
            if verbose {
                println!("   frame {:4}: {}", frame, action);
            }
            game.apply(action);
        }
        game.update();

        if !quiet && frame % (fps * 5).max(1) == 0 {
            let snap = game.snapshot();
            println!(
                "frame {:5} | level {} | score {} | player ({}, {}) | queue {}",
                frame,
                snap.level,
                snap.score,
                snap.player_x,
                snap.player_y,
                scheduler.queue_len()
            );
        }
    }

    trainer.stop().await;

    let snap = game.snapshot();
    if quiet {
        println!("{}", serde_json::to_string(&snap).unwrap_or_default());
    } else {
        println!("\n--- Final state ---");
        println!("Level: {} | Score: {}", snap.level, snap.score);
        println!(
            "Player at ({}, {}), goal at ({}, {})",
            snap.player_x, snap.player_y, snap.goal_x, snap.goal_y
        );
        if oracle.is_ready() {
            println!("Oracle: ready after {} training round(s)", oracle.rounds().await);
        } else {
            println!("Oracle: never became ready");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Interpret {
            code,
            file,
            actions,
            cells,
        } => run_interpret(code, file, actions, cells, cli.quiet),
        Commands::Generate {
            seed,
            count,
            corpus,
        } => run_generate(seed, count, corpus, cli.quiet).await,
        Commands::Play {
            frames,
            fps,
            manual,
            refill,
            corpus,
        } => run_play(frames, fps, manual, refill, corpus, cli.verbose, cli.quiet).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
