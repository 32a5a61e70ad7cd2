//! http-relay: a message-to-HTTP relay processor.
//!
//! Accepts inbound messages, derives an HTTP request from each one via
//! configurable expressions, executes the request with optional
//! exponential-backoff retry, and produces an outbound message from the
//! response.

pub mod config;
pub mod expr;
pub mod http;
pub mod processor;
pub mod time;
