//! Message and payload types flowing through the processor.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use super::error::ExtractionError;
use crate::http::HttpResponse;

/// A payload value, in one of the closed set of representations the
/// processor understands.
///
/// Response decoding selects among these via [`ResponseType`]; inbound
/// payloads may arrive in any of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Raw bytes, passed through untouched.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
    /// Structured JSON.
    Json(Value),
}

impl Payload {
    /// Serializes the payload into request-body bytes.
    #[must_use]
    pub fn to_body_bytes(&self) -> Vec<u8> {
        match self {
            Self::Bytes(bytes) => bytes.clone(),
            Self::Text(text) => text.clone().into_bytes(),
            Self::Json(value) => value.to_string().into_bytes(),
        }
    }

    /// Returns the payload as a JSON value for expression contexts.
    ///
    /// Binary payloads are rendered lossily as text; expressions that need
    /// exact bytes should not reference binary payloads.
    #[must_use]
    pub fn context_value(&self) -> Value {
        match self {
            Self::Bytes(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
            Self::Text(text) => Value::String(text.clone()),
            Self::Json(value) => value.clone(),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => write!(f, "{}", String::from_utf8_lossy(bytes)),
            Self::Text(text) => write!(f, "{text}"),
            Self::Json(value) => write!(f, "{value}"),
        }
    }
}

/// The unit of work received from the hosting channel.
///
/// Immutable for the duration of one request/reply cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// The message payload.
    pub payload: Payload,
    /// String-keyed message headers.
    pub headers: HashMap<String, String>,
}

impl InboundMessage {
    /// Creates a message with the given payload and no headers.
    #[must_use]
    pub fn new(payload: Payload) -> Self {
        Self {
            payload,
            headers: HashMap::new(),
        }
    }

    /// Creates a text message.
    #[must_use]
    pub fn text(payload: impl Into<String>) -> Self {
        Self::new(Payload::Text(payload.into()))
    }

    /// Creates a structured JSON message.
    #[must_use]
    pub fn json(payload: Value) -> Self {
        Self::new(Payload::Json(payload))
    }

    /// Adds a message header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// The outbound message produced for one successfully processed inbound
/// message. No headers are synthesized by the processor core.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    /// The reply payload.
    pub payload: Payload,
}

impl OutboundMessage {
    /// Creates an outbound message carrying the given payload.
    #[must_use]
    pub const fn new(payload: Payload) -> Self {
        Self { payload }
    }
}

/// A completed HTTP response with the body decoded per the configured
/// [`ResponseType`]. This is the context reply expressions evaluate against.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    /// HTTP status code of the response.
    pub status: http::StatusCode,
    /// Response headers.
    pub headers: http::HeaderMap,
    /// Decoded response body.
    pub body: Payload,
}

/// The semantic type the response body is decoded as.
///
/// A closed set of decoding variants selected by configuration; drives
/// response deserialization only, never request construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// Keep the body as raw bytes.
    Bytes,
    /// Decode the body as UTF-8 text.
    #[default]
    Text,
    /// Parse the body as JSON.
    Json,
}

impl ResponseType {
    /// Decodes a transport response into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Decode`] when the body does not match the
    /// expected shape (invalid UTF-8 for text, invalid JSON for json). This
    /// is a configuration/response mismatch and is never retried.
    pub fn decode(self, response: HttpResponse) -> Result<ResponseEnvelope, ExtractionError> {
        let body = match self {
            Self::Bytes => Payload::Bytes(response.body),
            Self::Text => {
                let text = String::from_utf8(response.body).map_err(|e| {
                    ExtractionError::Decode {
                        expected: "text",
                        reason: e.to_string(),
                    }
                })?;
                Payload::Text(text)
            }
            Self::Json => {
                let value = serde_json::from_slice(&response.body).map_err(|e| {
                    ExtractionError::Decode {
                        expected: "json",
                        reason: e.to_string(),
                    }
                })?;
                Payload::Json(value)
            }
        };

        Ok(ResponseEnvelope {
            status: response.status,
            headers: response.headers,
            body,
        })
    }
}
