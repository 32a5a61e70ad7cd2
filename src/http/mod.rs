//! HTTP transport seam.
//!
//! This module provides:
//! - Request/response value types ([`HttpRequest`], [`HttpResponse`])
//! - The client abstraction ([`HttpClient`])
//! - Production client implementation ([`ReqwestClient`])
//! - Transport-level errors ([`HttpError`])
//!
//! Everything above this seam is transport-agnostic: the processor core only
//! ever sees `(method, url, headers, body) -> (status, headers, body)`.

mod client;
mod error;
mod transport;

#[cfg(test)]
mod transport_tests;

pub use client::ReqwestClient;
pub use error::HttpError;
pub use transport::{HttpClient, HttpRequest, HttpResponse};
