//! # Scripted oracle
//!
//! A canned-response oracle for tests and offline play. It answers
//! `extend` from a fixed script, records the seeds it was asked about,
//! and carries an in-flight gauge whose high-water mark lets tests prove
//! the scheduler's at-most-one-outstanding-refill invariant. An optional
//! gate holds `extend` open until the test releases it, so "refill still
//! outstanding" is an observable state rather than a race.

use super::{OracleError, SequenceOracle};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Deterministic oracle stub.
#[derive(Debug)]
pub struct ScriptedOracle {
    responses: Mutex<VecDeque<Result<String, OracleError>>>,
    fallback: Option<String>,
    seeds: Mutex<Vec<String>>,
    ready: AtomicBool,
    warm_ups: AtomicUsize,
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedOracle {
    /// A ready oracle with an empty script
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: None,
            seeds: Mutex::new(Vec::new()),
            ready: AtomicBool::new(true),
            warm_ups: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            high_water: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Queue responses returned by successive `extend` calls
    pub fn with_responses(
        self,
        responses: impl IntoIterator<Item = Result<String, OracleError>>,
    ) -> Self {
        self.responses.lock().unwrap().extend(responses);
        self
    }

    /// Response returned once the script is exhausted (otherwise
    /// exhaustion is a generation error)
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Start not-ready; `warm_up` flips readiness as usual
    pub fn unready(self) -> Self {
        self.ready.store(false, Ordering::Release);
        self
    }

    /// Hold every `extend` call open until [`release`](Self::release)
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Let one gated `extend` call proceed
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Append a response after construction
    pub fn push_response(&self, response: Result<String, OracleError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Seeds passed to `extend`, in call order
    pub fn seeds(&self) -> Vec<String> {
        self.seeds.lock().unwrap().clone()
    }

    /// Completed warm-up calls
    pub fn warm_ups(&self) -> usize {
        self.warm_ups.load(Ordering::Acquire)
    }

    /// Calls currently inside `extend`
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Most calls ever concurrently inside `extend`.
    ///
    /// Under a correctly serialized scheduler this never exceeds 1.
    pub fn high_water(&self) -> usize {
        self.high_water.load(Ordering::Acquire)
    }

    fn enter(&self) -> InFlightGuard<'_> {
        let current = self.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.high_water.fetch_max(current, Ordering::AcqRel);
        InFlightGuard(&self.in_flight)
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl SequenceOracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    async fn warm_up(&self, _corpus: &[String]) -> Result<(), OracleError> {
        self.warm_ups.fetch_add(1, Ordering::AcqRel);
        self.ready.store(true, Ordering::Release);
        Ok(())
    }

    async fn extend(&self, seed: &str, _count: usize) -> Result<String, OracleError> {
        let _guard = self.enter();
        self.seeds.lock().unwrap().push(seed.to_string());

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| OracleError::Other("gate closed".to_string()))?;
            permit.forget();
        }

        let scripted = self.responses.lock().unwrap().pop_front();
        match scripted {
            Some(response) => response,
            None => self
                .fallback
                .clone()
                .ok_or_else(|| OracleError::Generation("script exhausted".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_order() {
        let oracle = ScriptedOracle::new().with_responses(vec![
            Ok("+++".to_string()),
            Err(OracleError::Generation("flaky".to_string())),
        ]);

        assert_eq!(oracle.extend("a", 3).await.unwrap(), "+++");
        assert!(oracle.extend("b", 3).await.is_err());
        assert_eq!(oracle.seeds(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_exhausted_without_fallback_errors() {
        let oracle = ScriptedOracle::new();
        let err = oracle.extend("s", 1).await.unwrap_err();
        assert_eq!(
            err,
            OracleError::Generation("script exhausted".to_string())
        );
    }

    #[tokio::test]
    async fn test_fallback_repeats() {
        let oracle = ScriptedOracle::new().with_fallback("+>");
        assert_eq!(oracle.extend("s", 2).await.unwrap(), "+>");
        assert_eq!(oracle.extend("s", 2).await.unwrap(), "+>");
    }

    #[tokio::test]
    async fn test_unready_until_warm_up() {
        let oracle = ScriptedOracle::new().unready();
        assert!(!oracle.is_ready());
        oracle.warm_up(&[]).await.unwrap();
        assert!(oracle.is_ready());
        assert_eq!(oracle.warm_ups(), 1);
    }

    #[tokio::test]
    async fn test_gate_holds_and_releases() {
        let oracle = Arc::new(ScriptedOracle::new().gated().with_fallback("+"));

        let task = tokio::spawn({
            let oracle = Arc::clone(&oracle);
            async move { oracle.extend("s", 1).await }
        });

        // The call parks on the gate and stays observable as in-flight
        tokio::task::yield_now().await;
        assert_eq!(oracle.in_flight(), 1);

        oracle.release();
        assert_eq!(task.await.unwrap().unwrap(), "+");
        assert_eq!(oracle.in_flight(), 0);
        assert_eq!(oracle.high_water(), 1);
    }

    #[tokio::test]
    async fn test_high_water_sees_overlap() {
        let oracle = Arc::new(ScriptedOracle::new().gated().with_fallback("+"));

        let a = tokio::spawn({
            let oracle = Arc::clone(&oracle);
            async move { oracle.extend("a", 1).await }
        });
        let b = tokio::spawn({
            let oracle = Arc::clone(&oracle);
            async move { oracle.extend("b", 1).await }
        });

        tokio::task::yield_now().await;
        assert_eq!(oracle.in_flight(), 2);

        oracle.release();
        oracle.release();
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();
        assert_eq!(oracle.high_water(), 2);
    }
}
