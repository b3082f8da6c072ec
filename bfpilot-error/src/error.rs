//! The main Error type for bfpilot

use crate::{ErrorKind, ErrorStatus};
use std::fmt;

/// The unified error type for all bfpilot operations.
///
/// This error type provides:
/// - `kind`: What type of error occurred
/// - `message`: Human-readable description
/// - `status`: Whether the error is retryable
/// - `operation`: What operation caused the error
/// - `context`: Key-value pairs for debugging
/// - `source`: The underlying error (if any)
///
/// # Example
///
/// ```rust
/// use bfpilot_error::{Error, ErrorKind, ErrorStatus};
///
/// let err = Error::new(ErrorKind::TrainingFailed, "corpus window shorter than model order")
///     .with_operation("trainer::round")
///     .with_status(ErrorStatus::Temporary)
///     .with_context("iteration", "3")
///     .with_context("corpus_symbols", "12");
///
/// assert_eq!(err.kind(), ErrorKind::TrainingFailed);
/// assert!(err.status().is_retryable());
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: ErrorStatus,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let status = if kind.is_retryable() {
            ErrorStatus::Temporary
        } else {
            ErrorStatus::Permanent
        };

        Self {
            kind,
            message: message.into(),
            status,
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the error status
    pub fn status(&self) -> ErrorStatus {
        self.status
    }

    /// Get the operation that caused this error
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the context key-value pairs
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Get the source error (if any)
    pub fn source_ref(&self) -> Option<&anyhow::Error> {
        self.source.as_ref()
    }

    // =========================================================================
    // Builders (chainable)
    // =========================================================================

    /// Set the error status
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark as temporary (retryable)
    pub fn temporary(mut self) -> Self {
        self.status = ErrorStatus::Temporary;
        self
    }

    /// Mark as permanent (not retryable)
    pub fn permanent(mut self) -> Self {
        self.status = ErrorStatus::Permanent;
        self
    }

    /// Set the operation that caused this error.
    ///
    /// If an operation was already set, the previous one is moved to context
    /// as "called" to preserve the call chain.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Set the source error.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if source was already set.
    pub fn set_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(source.into());
        self
    }

    /// Mark as persistent after failed retries
    pub fn persist(mut self) -> Self {
        self.status = self.status.persist();
        self
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.status.is_retryable()
    }
}

// =============================================================================
// Display - compact, single-line format for logs
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) at {}", self.kind, self.status, self.operation)?;

        if !self.context.is_empty() {
            write!(f, ", context {{ ")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key, value)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

// =============================================================================
// Debug - verbose, multi-line format for debugging
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}) at {}", self.kind, self.status, self.operation)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {:?}", source)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

// =============================================================================
// Convenient From implementations (be careful not to leak raw errors!)
// =============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        Error::new(kind, err.to_string())
            .with_operation("io")
            .set_source(err)
    }
}

// =============================================================================
// Convenience constructors
// =============================================================================

impl Error {
    /// Create an Unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Create an Unsupported error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unsupported, message)
    }

    /// Create a TrainingFailed error
    pub fn training_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TrainingFailed, message)
    }

    /// Create a GenerationFailed error
    pub fn generation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::GenerationFailed, message)
    }

    /// Create an OracleNotReady error
    pub fn oracle_not_ready() -> Self {
        Self::new(ErrorKind::OracleNotReady, "oracle has not finished warm-up")
    }

    /// Create a CorpusEmpty error
    pub fn corpus_empty() -> Self {
        Self::new(
            ErrorKind::CorpusEmpty,
            "training corpus contains no vocabulary symbols",
        )
    }

    /// Create a ChannelClosed error
    pub fn channel_closed(channel: &'static str) -> Self {
        Self::new(ErrorKind::ChannelClosed, format!("channel '{}' closed", channel))
            .with_context("channel", channel)
    }

    /// Create a ParseFailed error
    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseFailed, message)
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::new(ErrorKind::CorpusEmpty, "no symbols after filtering");
        assert_eq!(err.kind(), ErrorKind::CorpusEmpty);
        assert_eq!(err.message(), "no symbols after filtering");
        assert_eq!(err.status(), ErrorStatus::Permanent);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::new(ErrorKind::GenerationFailed, "model table empty")
            .with_operation("oracle::extend")
            .with_context("seed", ">>>+")
            .with_context("count", "5");

        assert_eq!(err.operation(), "oracle::extend");
        assert_eq!(err.context().len(), 2);
        assert_eq!(err.context()[0], ("seed", ">>>+".to_string()));
    }

    #[test]
    fn test_operation_chaining() {
        let err = Error::new(ErrorKind::IoFailed, "read failed")
            .with_operation("corpus::load")
            .with_operation("cli::generate");

        assert_eq!(err.operation(), "cli::generate");
        assert_eq!(err.context().len(), 1);
        assert_eq!(err.context()[0], ("called", "corpus::load".to_string()));
    }

    #[test]
    fn test_temporary_status() {
        let err = Error::new(ErrorKind::GenerationFailed, "transient");
        assert!(err.is_retryable()); // GenerationFailed defaults to temporary

        let err = Error::new(ErrorKind::InvalidArgument, "bad count");
        assert!(!err.is_retryable()); // InvalidArgument defaults to permanent
    }

    #[test]
    fn test_persist() {
        let err = Error::training_failed("round failed").temporary();
        assert!(err.is_retryable());

        let err = err.persist();
        assert!(!err.is_retryable());
        assert_eq!(err.status(), ErrorStatus::Persistent);
    }

    #[test]
    fn test_display() {
        let err = Error::new(ErrorKind::TrainingFailed, "refit interrupted")
            .with_operation("trainer::round")
            .with_context("iteration", "7");

        let display = format!("{}", err);
        assert!(display.contains("TrainingFailed"));
        assert!(display.contains("temporary"));
        assert!(display.contains("trainer::round"));
        assert!(display.contains("iteration: 7"));
    }

    #[test]
    fn test_convenience_constructors() {
        let err = Error::oracle_not_ready();
        assert_eq!(err.kind(), ErrorKind::OracleNotReady);
        assert!(err.is_retryable());

        let err = Error::channel_closed("status");
        assert_eq!(err.kind(), ErrorKind::ChannelClosed);
        assert!(err.message().contains("status"));
    }

    #[test]
    fn test_set_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "corpus.txt not found");
        let err = Error::new(ErrorKind::FileNotFound, "corpus.txt not found").set_source(io_err);

        assert!(err.source_ref().is_some());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }
}
