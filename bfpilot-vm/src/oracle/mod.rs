//! # Sequence oracle interface
//!
//! A trait-based abstraction over the generative model that supplies new
//! instruction symbols. The rest of the system treats the model as an
//! opaque predict-next-token capability: warm-up (training) and extension
//! (generation) are both long-running async operations that may fail, are
//! never assumed to complete synchronously, and must never run on the
//! tick that advances physics.
//!
//! ## Design
//! - `SequenceOracle` trait defines the capability contract
//! - Implementations: order-k Markov model, scripted test oracle
//! - Per-symbol streaming via async streams
//! - Methods return `Send` futures so schedulers can spawn refills onto
//!   background tasks

pub mod markov;
pub mod scripted;

pub use markov::{MarkovConfig, MarkovOracle};
pub use scripted::ScriptedOracle;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Model context window, in symbols. Seeds are padded/truncated to this
/// length before generation.
pub const CONTEXT_LENGTH: usize = 16;

// ============================================================================
// Errors
// ============================================================================

/// Error type for oracle operations.
///
/// This is the oracle boundary type; the scheduler and CLI convert it
/// into `bfpilot_error::Error` at their edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// Training/refit failed
    Training(String),
    /// Symbol generation failed
    Generation(String),
    /// The oracle has not completed its initial warm-up round
    NotReady,
    /// The corpus contained no vocabulary symbols
    EmptyCorpus,
    /// Other error
    Other(String),
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Training(e) => write!(f, "training failed: {}", e),
            Self::Generation(e) => write!(f, "generation failed: {}", e),
            Self::NotReady => write!(f, "oracle not ready"),
            Self::EmptyCorpus => write!(f, "corpus contains no vocabulary symbols"),
            Self::Other(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for OracleError {}

impl From<OracleError> for bfpilot_error::Error {
    fn from(err: OracleError) -> Self {
        use bfpilot_error::{Error, ErrorKind};
        let kind = match &err {
            OracleError::Training(_) => ErrorKind::TrainingFailed,
            OracleError::Generation(_) => ErrorKind::GenerationFailed,
            OracleError::NotReady => ErrorKind::OracleNotReady,
            OracleError::EmptyCorpus => ErrorKind::CorpusEmpty,
            OracleError::Other(_) => ErrorKind::Unexpected,
        };
        Error::new(kind, err.to_string()).with_operation("oracle")
    }
}

// ============================================================================
// Oracle trait
// ============================================================================

/// The sequence-prediction capability.
///
/// Implementations must serialize training and generation internally
/// (single-flight: at most one operation mutating model state at a time)
/// so a background retraining loop and a queue refill sharing the same
/// instance cannot corrupt it.
pub trait SequenceOracle: Send + Sync {
    /// Implementation name (e.g., "markov", "scripted")
    fn name(&self) -> &str;

    /// Whether at least one warm-up round has completed.
    ///
    /// Schedulers check this before requesting a refill; generation
    /// before readiness fails with [`OracleError::NotReady`].
    fn is_ready(&self) -> bool;

    /// Fit (or refit) the model on a corpus of program text.
    ///
    /// Long-running. May be invoked repeatedly; later rounds refit on the
    /// given corpus.
    fn warm_up(&self, corpus: &[String]) -> impl Future<Output = Result<(), OracleError>> + Send;

    /// Produce `count` further symbols continuing `seed`.
    ///
    /// Long-running. The returned text contains only alphabet symbols.
    fn extend(
        &self,
        seed: &str,
        count: usize,
    ) -> impl Future<Output = Result<String, OracleError>> + Send;

    /// Produce `count` further symbols one at a time.
    ///
    /// The default forwards to [`extend`](Self::extend) and replays the
    /// result; implementations that can yield incrementally override it.
    fn stream(
        &self,
        seed: &str,
        count: usize,
    ) -> impl Future<Output = Result<SymbolStream, OracleError>> + Send {
        async move {
            let symbols = self.extend(seed, count).await?;
            Ok(SymbolStream::from_string(symbols))
        }
    }
}

// ============================================================================
// Symbol streaming
// ============================================================================

/// One item from a streaming generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolChunk {
    /// The next generated symbol
    Symbol(char),
    /// Generation finished
    Done,
    /// Generation failed mid-stream
    Error(String),
}

/// Receiver for streamed symbols.
pub struct SymbolStream {
    inner: Pin<Box<dyn futures_core::Stream<Item = SymbolChunk> + Send>>,
}

impl SymbolStream {
    /// Wrap a stream of symbol chunks
    pub fn new<S>(stream: S) -> Self
    where
        S: futures_core::Stream<Item = SymbolChunk> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }

    /// A stream that replays an already-generated string
    pub fn from_string(symbols: String) -> Self {
        let chunks: Vec<SymbolChunk> = symbols
            .chars()
            .map(SymbolChunk::Symbol)
            .chain(std::iter::once(SymbolChunk::Done))
            .collect();
        Self::new(futures_util::stream::iter(chunks))
    }

    /// Collect all symbols into a single string
    pub async fn collect(mut self) -> Result<String, OracleError> {
        use futures_util::StreamExt;

        let mut symbols = String::new();
        while let Some(chunk) = self.inner.next().await {
            match chunk {
                SymbolChunk::Symbol(c) => symbols.push(c),
                SymbolChunk::Done => break,
                SymbolChunk::Error(e) => return Err(OracleError::Generation(e)),
            }
        }
        Ok(symbols)
    }
}

impl fmt::Debug for SymbolStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolStream").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_replay_collect() {
        let stream = SymbolStream::from_string(">>++".to_string());
        assert_eq!(tokio_test::block_on(stream.collect()).unwrap(), ">>++");
    }

    #[test]
    fn test_stream_error_propagates() {
        let stream = SymbolStream::new(futures_util::stream::iter(vec![
            SymbolChunk::Symbol('+'),
            SymbolChunk::Error("model table empty".to_string()),
        ]));
        let err = tokio_test::block_on(stream.collect()).unwrap_err();
        assert_eq!(err, OracleError::Generation("model table empty".to_string()));
    }

    #[test]
    fn test_error_kind_mapping() {
        use bfpilot_error::ErrorKind;
        let err: bfpilot_error::Error = OracleError::NotReady.into();
        assert_eq!(err.kind(), ErrorKind::OracleNotReady);
        assert!(err.is_retryable());

        let err: bfpilot_error::Error = OracleError::EmptyCorpus.into();
        assert_eq!(err.kind(), ErrorKind::CorpusEmpty);
    }
}
