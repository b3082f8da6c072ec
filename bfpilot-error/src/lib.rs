//! # bfpilot-error
//!
//! Unified error handling for bfpilot.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what error occurred (e.g., CorpusEmpty, GenerationFailed)
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary, Persistent)
//! - **Error Context**: Assist in locating the cause with rich context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use bfpilot_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::GenerationFailed, "oracle produced no symbols")
//!         .with_operation("scheduler::refill")
//!         .with_context("seed", ">>++")
//!         .with_context("count", "16"))
//! }
//! ```
//!
//! ## Principles
//!
//! - Fallible workspace APIs return `Result<T, bfpilot_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context
//! - Don't abuse `From<OtherError>` to prevent raw error leakage
//!
//! A truncated interpreter run (unmatched bracket, step limit) is NOT an
//! error: the interpreter reports it as data alongside the output it
//! accumulated. Only conditions a caller may need to retry or surface
//! live here.

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using bfpilot Error
pub type Result<T> = std::result::Result<T, Error>;
