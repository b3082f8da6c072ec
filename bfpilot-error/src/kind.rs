//! Error kinds for bfpilot operations

use std::fmt;

/// The kind of error that occurred.
///
/// This enum categorizes errors to help callers write clear handling logic.
/// Callers can match on ErrorKind to decide how to handle specific cases —
/// in particular whether the frame loop should retry on a later tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// The requested feature or operation is not supported
    Unsupported,

    /// Invalid configuration or parameters
    ConfigInvalid,

    // =========================================================================
    // Oracle errors
    // =========================================================================
    /// Model training/refit failed
    TrainingFailed,

    /// Symbol generation failed
    GenerationFailed,

    /// The oracle has not completed its initial warm-up round
    OracleNotReady,

    /// The training corpus contained no usable symbols
    CorpusEmpty,

    // =========================================================================
    // Scheduler errors
    // =========================================================================
    /// A status or refill channel closed unexpectedly
    ChannelClosed,

    // =========================================================================
    // IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    // =========================================================================
    // Parse errors
    // =========================================================================
    /// Failed to parse input
    ParseFailed,

    /// Invalid argument passed to function
    InvalidArgument,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unexpected => "Unexpected",
            ErrorKind::Unsupported => "Unsupported",
            ErrorKind::ConfigInvalid => "ConfigInvalid",

            ErrorKind::TrainingFailed => "TrainingFailed",
            ErrorKind::GenerationFailed => "GenerationFailed",
            ErrorKind::OracleNotReady => "OracleNotReady",
            ErrorKind::CorpusEmpty => "CorpusEmpty",

            ErrorKind::ChannelClosed => "ChannelClosed",

            ErrorKind::FileNotFound => "FileNotFound",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::IoFailed => "IoFailed",

            ErrorKind::ParseFailed => "ParseFailed",
            ErrorKind::InvalidArgument => "InvalidArgument",
        }
    }

    /// Check if this error kind is retryable by default.
    ///
    /// Oracle failures are retryable: the scheduler leaves the queue empty
    /// and tries again on the next eligible tick, and the trainer keeps
    /// its loop running.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::TrainingFailed
                | ErrorKind::GenerationFailed
                | ErrorKind::OracleNotReady
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
