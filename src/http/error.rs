//! Error type for HTTP transport operations.

use thiserror::Error;

/// Error raised by an [`HttpClient`](super::HttpClient) implementation.
///
/// Describes what went wrong at the wire level without dictating a recovery
/// strategy; the retry layer decides which of these are worth re-attempting.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// Covers DNS resolution failures, connection refused, and other
    /// I/O-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server did not respond within the transport's timeout.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be constructed by the transport.
    ///
    /// This indicates a configuration defect (bad URL or request parts),
    /// not a transient failure.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
