//! Error types for PPM compression and range coding.
//!
//! This module provides the [`Error`] enum which represents every failure
//! mode of the coder, the model and the driver, along with a convenient
//! [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! Arithmetic coding is strictly sequential: once a call fails, the coder
//! and model state can no longer be trusted, so every error aborts the whole
//! compression or decompression session. Nothing in this crate retries.
//!
//! ```rust
//! use ppmz::{Error, PpmOptions};
//!
//! fn describe(error: &Error) -> &'static str {
//!     match error {
//!         Error::Io(_) => "file error",
//!         Error::InvalidConfig(_) => "bad options",
//!         e if e.is_corruption() => "stream is corrupt or truncated",
//!         _ => "internal error",
//!     }
//! }
//!
//! let err = PpmOptions::new().order(99).unwrap_err();
//! assert_eq!(describe(&err), "bad options");
//! ```

use std::io;

/// The main error type for PPM compression.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io] | Reading the source or writing the sink |
/// | Configuration | [`InvalidConfig`][Self::InvalidConfig] | Bad options or table construction |
/// | Usage | [`InvalidArgument`][Self::InvalidArgument] | Out-of-range symbol, zero-width symbol |
/// | Integrity | [`InvariantViolation`][Self::InvariantViolation], [`EndOfStream`][Self::EndOfStream] | Coder bug or desynchronized stream |
/// | Resources | [`ResourceLimitExceeded`][Self::ResourceLimitExceeded] | Output limit reached |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred on the underlying byte source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A coder, model or table was constructed with invalid parameters.
    ///
    /// Raised at construction time and never silently corrected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A call received an argument it cannot honour.
    ///
    /// Mutating calls on [`SimpleFrequencyTable`](crate::SimpleFrequencyTable)
    /// leave the table unchanged when they return this error.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An internal consistency check failed.
    ///
    /// Indicates a bug in the coder or a desynchronized stream. The session
    /// must be abandoned.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A strict bit read went past the end of the input.
    #[error("unexpected end of bit stream")]
    EndOfStream,

    /// Decoding produced more output than the configured limit allows.
    ///
    /// Garbage input can decode indefinitely because the decoder treats the
    /// end of the stream as an infinite run of zero bits.
    #[error("resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),
}

impl Error {
    /// Returns `true` if this error points at damaged or mismatched input.
    ///
    /// A stream compressed with different options than the ones used to
    /// decompress it typically surfaces as one of these.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::InvariantViolation(_) | Error::EndOfStream | Error::ResourceLimitExceeded(_)
        )
    }

    /// Returns `true` if this error was caused by the caller.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Error::InvalidConfig(_) | Error::InvalidArgument(_))
    }
}

/// A specialized Result type for PPM operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_invalid_config_message() {
        let err = Error::InvalidConfig("state bits 0 out of range".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: state bits 0 out of range"
        );
        assert!(err.is_usage_error());
        assert!(!err.is_corruption());
    }

    #[test]
    fn test_corruption_classification() {
        assert!(Error::EndOfStream.is_corruption());
        assert!(Error::InvariantViolation("code out of range".into()).is_corruption());
        assert!(Error::ResourceLimitExceeded("output".into()).is_corruption());
        assert!(!Error::InvalidArgument("symbol".into()).is_corruption());
    }
}
