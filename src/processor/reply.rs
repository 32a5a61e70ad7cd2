//! Reply extractor: derives the outbound payload from a completed response.

use super::ProcessorConfig;
use super::error::ExtractionError;
use super::message::{Payload, ResponseEnvelope};
use crate::expr::{self, Evaluator};

/// Derives the outbound payload from a [`ResponseEnvelope`].
///
/// With no configured reply expression the decoded body passes through
/// unchanged. With one, the expression is evaluated against the full
/// envelope (`status`, `headers`, `body`) and the rendered text becomes the
/// payload.
pub(super) struct ReplyExtractor<'a, E> {
    config: &'a ProcessorConfig,
    evaluator: &'a E,
}

impl<'a, E: Evaluator> ReplyExtractor<'a, E> {
    pub(super) const fn new(config: &'a ProcessorConfig, evaluator: &'a E) -> Self {
        Self { config, evaluator }
    }

    /// Extracts the reply payload.
    ///
    /// Failures reflect a mismatch between configuration and the actual
    /// response shape and are terminal, never retried.
    pub(super) fn extract(&self, envelope: &ResponseEnvelope) -> Result<Payload, ExtractionError> {
        let Some(reply_expr) = &self.config.reply_expr else {
            return Ok(envelope.body.clone());
        };

        let context = expr::response_context(envelope);
        let rendered = self.evaluator.evaluate(reply_expr, &context)?;
        Ok(Payload::Text(rendered))
    }
}
