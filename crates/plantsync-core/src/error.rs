//! Error types for plantsync-core.
//!
//! The synchronization engine distinguishes four failure classes, and the
//! distinction drives all recovery behavior:
//!
//! | Error class | Strategy |
//! |-------------|----------|
//! | [`Error::Credential`] | Surface to the setup flow, never retry automatically |
//! | [`Error::Timeout`] | Retry with linear backoff (the only retried class) |
//! | [`Error::Unauthorized`] | Re-authenticate once, then retry the call once |
//! | [`Error::Http`] / [`Error::Payload`] | Log, degrade to empty/none, never retry |
//!
//! Real-world 401s and malformed payloads are not recoverable by
//! retrying, but slow connections are; keeping the classes apart avoids
//! masking credential problems as network blips. Nothing in this crate is
//! permitted to crash the process — every public operation degrades to
//! "no change" at the engine boundary.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while talking to the remote telemetry service.
///
/// Marked `#[non_exhaustive]` to allow adding variants without breaking
/// downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Login rejected or credentials missing. Fatal to the operation;
    /// never retried automatically.
    #[error("Credential error: {0}")]
    Credential(String),

    /// A data call was rejected with an authorization failure. Signals
    /// that the access token has expired and a re-authentication is due.
    #[error("Authorization rejected by remote service")]
    Unauthorized,

    /// No authenticated session is available for an authorized call.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// A request timed out. The only transient class; eligible for retry.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The timeout that elapsed.
        duration: Duration,
    },

    /// The remote service answered with an unexpected HTTP status.
    #[error("Remote service returned HTTP {status}: {message}")]
    Http {
        /// The HTTP status code.
        status: u16,
        /// Response body or status text.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("Unexpected payload: {0}")]
    Payload(String),

    /// The request could not be performed (connection refused, DNS, TLS).
    /// Not retried: unlike a timeout, these rarely resolve within a
    /// backoff window.
    #[error("Request failed: {0}")]
    Request(reqwest::Error),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a timeout error with operation context.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a credential error.
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential(message.into())
    }

    /// Create a payload error.
    pub fn payload(message: impl Into<String>) -> Self {
        Self::Payload(message.into())
    }

    /// Whether this error is transient and worth retrying.
    ///
    /// Only timeouts qualify; everything else aborts immediately.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Classify a `reqwest` transport error for a named operation.
    ///
    /// Timeouts become [`Error::Timeout`] so the retry layer can pick
    /// them up; everything else is surfaced as [`Error::Request`].
    pub fn from_request(operation: &str, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(operation, timeout)
        } else {
            Self::Request(err)
        }
    }
}

/// Result type alias using plantsync-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
