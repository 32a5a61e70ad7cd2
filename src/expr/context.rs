//! Read-only expression contexts for messages and responses.
//!
//! Adapts an inbound message or a response envelope into the JSON value an
//! expression is evaluated against. Pure read views: nothing here mutates
//! the message or the envelope.

use std::collections::HashMap;

use serde_json::{Value, json};

use crate::processor::{InboundMessage, ResponseEnvelope};

/// Builds the message context: `payload`, `headers`, and the ambient `env`
/// properties configured on the processor.
///
/// `payload` is the inbound payload (text as a string, structured bodies as
/// JSON, binary rendered lossily as text). Absent fields referenced by an
/// expression surface as evaluation errors, not here.
#[must_use]
pub fn message_context(message: &InboundMessage, properties: &HashMap<String, String>) -> Value {
    json!({
        "payload": message.payload.context_value(),
        "headers": message.headers,
        "env": properties,
    })
}

/// Builds the response context: `status`, `headers`, and the decoded `body`.
#[must_use]
pub fn response_context(envelope: &ResponseEnvelope) -> Value {
    json!({
        "status": envelope.status.as_u16(),
        "headers": header_values(&envelope.headers),
        "body": envelope.body.context_value(),
    })
}

/// Flattens a `HeaderMap` into a string map for expression lookup.
///
/// Header names are already lowercase in `http`; repeated names keep the
/// last value, which is enough for expression lookup.
fn header_values(headers: &http::HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}
