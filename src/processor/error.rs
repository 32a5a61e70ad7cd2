//! Error taxonomy for message processing.
//!
//! Three terminal failure families, matching how they propagate:
//! - [`ResolutionError`]: request construction failed, never retried.
//! - [`TransportError`]: the HTTP round trip failed, retryable per policy.
//! - [`ExtractionError`]: reply derivation from a successful response
//!   failed, never retried.

use thiserror::Error;

use crate::expr::EvalError;
use crate::http::HttpError;

/// Terminal failure for one inbound message.
///
/// Exactly one of these (or one outbound message) is produced per inbound
/// message; no partial output is ever emitted alongside a failure.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The outbound request could not be constructed.
    #[error("Request resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    /// The HTTP call failed with a non-retryable transport error.
    #[error("Request failed: {0}")]
    Transport(#[source] TransportError),

    /// The retry budget was consumed without a successful response.
    #[error("Request failed after {attempts} attempts: {last}")]
    Exhausted {
        /// Total attempts made, including the first.
        attempts: u32,
        /// The transport error from the final attempt.
        #[source]
        last: TransportError,
    },

    /// The reply could not be derived from a successful response.
    #[error("Reply extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
}

/// Request construction failure: a per-message configuration defect,
/// independent of network conditions. Never retried.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// Neither a static URL nor a URL expression is configured.
    #[error("No URL configured: set url or url_expr")]
    MissingUrl,

    /// The URL expression produced an empty string.
    #[error("URL expression '{expr}' produced an empty result")]
    EmptyUrl {
        /// The URL expression source text
        expr: String,
    },

    /// The resolved URL is not syntactically valid.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The resolved URL string
        url: String,
        /// Parse failure reason
        reason: String,
    },

    /// The resolved method name is not a valid HTTP method.
    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),

    /// The headers expression did not produce a JSON object.
    #[error("Headers expression produced '{rendered}', expected a JSON object: {reason}")]
    HeadersNotAMap {
        /// What the expression rendered to
        rendered: String,
        /// Why it was rejected
        reason: String,
    },

    /// A resolved header name is not a valid HTTP header name.
    #[error("Invalid header name '{name}': {reason}")]
    InvalidHeaderName {
        /// The offending header name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// A resolved header value is not a valid HTTP header value.
    #[error("Invalid header value for '{name}': {reason}")]
    InvalidHeaderValue {
        /// The header the value belongs to
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// An expression failed to evaluate against the message context.
    #[error(transparent)]
    Evaluation(#[from] EvalError),
}

/// Reply derivation failure from a successful response: a mismatch
/// between configuration and the actual response shape. Never retried.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The response body could not be decoded as the expected type.
    #[error("Response body is not valid {expected}: {reason}")]
    Decode {
        /// The configured response type
        expected: &'static str,
        /// Decode failure reason
        reason: String,
    },

    /// The reply expression failed to evaluate against the response.
    #[error(transparent)]
    Evaluation(#[from] EvalError),
}

/// A failed HTTP round trip: either the transport itself failed or the
/// server answered with a non-2xx status.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport layer failed before a response was received.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The server responded with a non-success status.
    #[error("Server returned {status}: {}", body.as_deref().unwrap_or("<no body>"))]
    Status {
        /// The non-2xx status code.
        status: http::StatusCode,
        /// Response body, when it is readable text.
        body: Option<String>,
    },
}
