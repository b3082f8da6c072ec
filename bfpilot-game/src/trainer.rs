//! # Trainer
//!
//! The continuous background retraining loop: a repeating task with a
//! fixed inter-iteration delay that refits the shared oracle, fully
//! decoupled from gameplay. The oracle itself serializes training
//! against generation, so the loop can run while the scheduler refills.
//!
//! The loop carries an explicit stop signal rather than running
//! unconditionally, so tests and the CLI can tear it down cleanly. An
//! in-progress warm-up is never cancelled mid-flight; stop takes effect
//! at the next loop boundary.

use crate::status::{emit, StatusEvent, StatusSender};
use bfpilot_vm::SequenceOracle;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Trainer tunables
#[derive(Debug, Clone, Copy)]
pub struct TrainerConfig {
    /// Delay between retraining iterations
    pub interval: Duration,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}

/// Handle to the background retraining task.
pub struct Trainer {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Trainer {
    /// Spawn the retraining loop over a shared oracle and a fixed
    /// corpus. Every round emits status events; failures are reported
    /// and the loop keeps going - oracle health is never fatal.
    pub fn spawn<O: SequenceOracle + 'static>(
        oracle: Arc<O>,
        corpus: Vec<String>,
        config: TrainerConfig,
        status: StatusSender,
    ) -> Self {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut iteration: u64 = 0;
            loop {
                emit(&status, StatusEvent::Training);
                match oracle.warm_up(&corpus).await {
                    Ok(()) => {
                        iteration += 1;
                        if iteration == 1 {
                            emit(&status, StatusEvent::Ready);
                        }
                        emit(&status, StatusEvent::Iteration(iteration));
                    }
                    Err(err) => emit(&status, StatusEvent::Error(err.to_string())),
                }

                tokio::select! {
                    _ = tokio::time::sleep(config.interval) => {}
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            stop: stop_tx,
            handle,
        }
    }

    /// Signal the loop to stop and wait for it to finish its current
    /// round.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.handle.await;
    }

    /// Whether the loop has exited
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::status_channel;
    use bfpilot_vm::{MarkovOracle, ScriptedOracle};

    #[tokio::test(start_paused = true)]
    async fn test_ready_after_first_round_then_iterates() {
        let oracle = Arc::new(MarkovOracle::default());
        let (tx, mut rx) = status_channel();

        let trainer = Trainer::spawn(
            Arc::clone(&oracle),
            vec!["++[>+<-]>.".to_string()],
            TrainerConfig {
                interval: Duration::from_secs(5),
            },
            tx,
        );

        tokio::time::sleep(Duration::from_secs(12)).await;
        trainer.stop().await;

        assert!(oracle.is_ready());
        assert!(oracle.rounds().await >= 2);

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(events[0], StatusEvent::Training);
        assert!(events.contains(&StatusEvent::Ready));
        assert!(events.contains(&StatusEvent::Iteration(2)));
        // Ready announced exactly once, on the first completed round
        let readies = events.iter().filter(|e| **e == StatusEvent::Ready).count();
        assert_eq!(readies, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_rounds_keep_looping() {
        let oracle = Arc::new(MarkovOracle::default());
        let (tx, mut rx) = status_channel();

        // Corpus with no vocabulary symbols: every round fails
        let trainer = Trainer::spawn(
            Arc::clone(&oracle),
            vec!["nothing usable".to_string()],
            TrainerConfig {
                interval: Duration::from_secs(1),
            },
            tx,
        );

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(!trainer.is_finished());
        trainer.stop().await;

        assert!(!oracle.is_ready());
        let mut errors = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, StatusEvent::Error(_)) {
                errors += 1;
            }
        }
        assert!(errors >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_prompt() {
        let oracle = Arc::new(ScriptedOracle::new());
        let (tx, _rx) = status_channel();

        let trainer = Trainer::spawn(
            Arc::clone(&oracle),
            Vec::new(),
            TrainerConfig {
                interval: Duration::from_secs(3600),
            },
            tx,
        );

        tokio::task::yield_now().await;
        // Even with an hour-long interval, stop returns without waiting
        // out the sleep
        trainer.stop().await;
        assert!(oracle.warm_ups() >= 1);
    }
}
