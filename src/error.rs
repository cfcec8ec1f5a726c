//! Error types for soda-dl
//!
//! Failures split into two tiers:
//! - [`PageError`]: scoped to a single page request. Never fatal to a run;
//!   the fetch loop records the page offset as failed and moves on.
//! - [`Error`]: configuration and local filesystem failures that abort the
//!   run, since losing the ability to persist chunks makes continuing
//!   pointless.

use thiserror::Error;

/// Result type alias for soda-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Run-fatal error type for soda-dl
///
/// Everything here aborts the run. Failures of individual page requests are
/// [`PageError`] and are absorbed by the fetch loop instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "page_size")
        key: Option<String>,
    },

    /// I/O error (output directory creation, chunk write, failure log)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors scoped to a single page request
///
/// All variants are handled identically by the fetch loop: log, record the
/// offset as failed, advance past the page. The distinction matters only for
/// retry classification and diagnostics.
#[derive(Debug, Error)]
pub enum PageError {
    /// Request exceeded the configured timeout
    #[error("request timed out at offset {offset}")]
    Timeout {
        /// Page offset of the request that timed out
        offset: u64,
    },

    /// Transport-level failure (DNS, connection refused, TLS)
    #[error("transport error at offset {offset}: {reason}")]
    Transport {
        /// Page offset of the failed request
        offset: u64,
        /// Underlying transport failure description
        reason: String,
    },

    /// Server answered with a non-200 status
    #[error("server returned HTTP {status} at offset {offset}")]
    Server {
        /// Page offset of the rejected request
        offset: u64,
        /// HTTP status code of the response
        status: u16,
    },

    /// Response body was not a JSON array of objects
    #[error("malformed page body at offset {offset}: {reason}")]
    Decode {
        /// Page offset of the undecodable response
        offset: u64,
        /// Parse failure description
        reason: String,
    },
}

impl PageError {
    /// Page offset this error occurred at
    pub fn offset(&self) -> u64 {
        match self {
            PageError::Timeout { offset }
            | PageError::Transport { offset, .. }
            | PageError::Server { offset, .. }
            | PageError::Decode { offset, .. } => *offset,
        }
    }
}
