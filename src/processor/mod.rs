//! The processor core: request building, retry-wrapped execution, and reply
//! extraction.
//!
//! This module provides:
//! - Message and payload types ([`InboundMessage`], [`OutboundMessage`],
//!   [`Payload`], [`ResponseEnvelope`], [`ResponseType`])
//! - Processor configuration ([`ProcessorConfig`])
//! - Retry policy ([`RetryPolicy`])
//! - The orchestrator ([`Processor`]) exposing
//!   `process(InboundMessage) -> OutboundMessage | ProcessError`
//! - The error taxonomy ([`ProcessError`], [`ResolutionError`],
//!   [`TransportError`], [`ExtractionError`])

mod builder;
mod config;
mod error;
mod executor;
mod message;
mod reply;
mod retry;

#[cfg(test)]
mod builder_tests;
#[cfg(test)]
mod message_tests;

pub use config::ProcessorConfig;
pub use error::{ExtractionError, ProcessError, ResolutionError, TransportError};
pub use executor::Processor;
pub use message::{InboundMessage, OutboundMessage, Payload, ResponseEnvelope, ResponseType};
pub use retry::RetryPolicy;
