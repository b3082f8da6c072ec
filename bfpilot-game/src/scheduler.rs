//! # Scheduler
//!
//! Owns the action queue and the bridge between the frame tick and the
//! oracle. The frame loop calls [`maybe_refill`](Scheduler::maybe_refill)
//! then [`tick`](Scheduler::tick) once per frame; refills run on spawned
//! tasks and are only ever *initiated* and *polled* from the tick, never
//! awaited on it, so a slow oracle cannot stall frame production.
//!
//! Shared mutable state (queue, mode, generation) is owned here and
//! mutated only from the tick path. A completed refill is applied on a
//! later tick and only after its generation token matches the current
//! one, so a refill that raced a mode toggle is discarded instead of
//! leaking stale actions.

use crate::seed::{derive_seed, GameSnapshot};
use crate::status::{emit, StatusEvent, StatusSender};
use bfpilot_vm::{decode, Action, OracleError, SequenceOracle};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Who is driving the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Keyboard/manual input; the scheduler stays idle
    Manual,
    /// The oracle drives; empty queue triggers refills
    Pilot,
}

/// Scheduler tunables
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Symbols requested from the oracle per refill
    pub refill_count: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { refill_count: 16 }
    }
}

struct PendingRefill {
    /// Generation the refill was started under; results only apply
    /// while this still matches
    generation: u64,
    rx: oneshot::Receiver<Result<String, OracleError>>,
}

/// Owns the bounded action backlog and refill discipline.
pub struct Scheduler<O> {
    oracle: Arc<O>,
    config: SchedulerConfig,
    status: StatusSender,
    queue: VecDeque<Action>,
    mode: ControlMode,
    generation: u64,
    pending: Option<PendingRefill>,
}

impl<O: SequenceOracle + 'static> Scheduler<O> {
    /// Create a scheduler in manual mode with an empty queue
    pub fn new(oracle: Arc<O>, status: StatusSender) -> Self {
        Self {
            oracle,
            config: SchedulerConfig::default(),
            status,
            queue: VecDeque::new(),
            mode: ControlMode::Manual,
            generation: 0,
            pending: None,
        }
    }

    /// Override the scheduler tunables
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Current control mode
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Actions currently queued
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Whether a refill is outstanding
    pub fn refill_in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Switch control mode.
    ///
    /// The queue is cleared and the generation bumped atomically with
    /// the flip, so actions queued under the old mode can never be
    /// dequeued under the new one. An outstanding oracle call is NOT
    /// aborted - its eventual result fails the generation check and is
    /// discarded.
    pub fn set_mode(&mut self, mode: ControlMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.generation += 1;
        self.queue.clear();
    }

    /// Called once per frame, before [`tick`](Scheduler::tick): applies
    /// a completed refill, then starts a new one if warranted.
    ///
    /// A refill starts only when the queue is empty, mode is
    /// [`ControlMode::Pilot`], the oracle reports ready, and no refill
    /// is already outstanding (at-most-one in flight, for any sequence
    /// of ticks and toggles).
    pub fn maybe_refill(&mut self, snapshot: &GameSnapshot) {
        self.poll_pending();

        if self.mode != ControlMode::Pilot
            || !self.queue.is_empty()
            || self.pending.is_some()
            || !self.oracle.is_ready()
        {
            return;
        }

        let seed = derive_seed(snapshot);
        let count = self.config.refill_count;
        let oracle = Arc::clone(&self.oracle);
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let result = oracle.extend(&seed, count).await;
            let _ = tx.send(result);
        });

        self.pending = Some(PendingRefill {
            generation: self.generation,
            rx,
        });
    }

    /// Pop the next action, if any. While a refill is outstanding this
    /// keeps returning `None` rather than stalling the frame.
    pub fn tick(&mut self) -> Option<Action> {
        self.queue.pop_front()
    }

    /// Non-blocking check on the outstanding refill. Completed results
    /// are decoded into the queue when fresh; stale or failed results
    /// leave the queue empty (failure is surfaced on the status channel
    /// and the next eligible tick retries).
    fn poll_pending(&mut self) {
        let Some(pending) = &mut self.pending else {
            return;
        };

        match pending.rx.try_recv() {
            Ok(result) => {
                let refill_generation = pending.generation;
                self.pending = None;
                if refill_generation != self.generation {
                    // Raced a mode toggle; the world moved on
                    return;
                }
                match result {
                    Ok(symbols) => self.queue.extend(decode(&symbols)),
                    Err(err) => emit(&self.status, StatusEvent::Error(err.to_string())),
                }
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                self.pending = None;
                emit(
                    &self.status,
                    StatusEvent::Error("refill task dropped before completing".to_string()),
                );
            }
        }
    }
}
