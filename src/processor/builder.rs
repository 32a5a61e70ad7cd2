//! Request builder: resolves method, URL, headers, and body for one
//! inbound message.

use http::header::{HeaderName, HeaderValue};

use super::ProcessorConfig;
use super::error::ResolutionError;
use super::message::InboundMessage;
use crate::expr::{self, Evaluator};
use crate::http::HttpRequest;

/// Builds a [`HttpRequest`] from an inbound message and the configured
/// expressions. Stateless; expressions are evaluated exactly once per
/// message, and the produced request is reused across retry attempts.
pub(super) struct RequestBuilder<'a, E> {
    config: &'a ProcessorConfig,
    evaluator: &'a E,
}

impl<'a, E: Evaluator> RequestBuilder<'a, E> {
    pub(super) const fn new(config: &'a ProcessorConfig, evaluator: &'a E) -> Self {
        Self { config, evaluator }
    }

    /// Resolves the full request.
    ///
    /// Any failure here is a [`ResolutionError`]: a per-message construction
    /// defect, independent of network conditions, and never retried.
    pub(super) fn build(&self, message: &InboundMessage) -> Result<HttpRequest, ResolutionError> {
        let context = expr::message_context(message, &self.config.properties);

        let url = self.resolve_url(&context)?;
        let method = self.resolve_method(&context)?;
        let headers = self.resolve_headers(&context)?;
        let body = self.resolve_body(message, &context)?;

        let mut request = HttpRequest::new(method, url);
        request.headers = headers;
        request.body = Some(body);
        Ok(request)
    }

    fn resolve_url(&self, context: &serde_json::Value) -> Result<url::Url, ResolutionError> {
        if let Some(expr) = &self.config.url_expr {
            let resolved = self.evaluator.evaluate(expr, context)?;
            if resolved.is_empty() {
                return Err(ResolutionError::EmptyUrl { expr: expr.clone() });
            }
            return url::Url::parse(&resolved).map_err(|e| ResolutionError::InvalidUrl {
                url: resolved,
                reason: e.to_string(),
            });
        }

        self.config
            .url
            .clone()
            .ok_or(ResolutionError::MissingUrl)
    }

    fn resolve_method(&self, context: &serde_json::Value) -> Result<http::Method, ResolutionError> {
        let Some(expr) = &self.config.method_expr else {
            return Ok(self
                .config
                .method
                .clone()
                .unwrap_or(http::Method::GET));
        };

        let resolved = self.evaluator.evaluate(expr, context)?;
        let canonical = resolved.trim().to_uppercase();
        canonical
            .parse::<http::Method>()
            .map_err(|_| ResolutionError::InvalidMethod(resolved))
    }

    fn resolve_headers(
        &self,
        context: &serde_json::Value,
    ) -> Result<http::HeaderMap, ResolutionError> {
        let mut headers = self.config.headers.clone();

        let Some(expr) = &self.config.headers_expr else {
            return Ok(headers);
        };

        let rendered = self.evaluator.evaluate(expr, context)?;
        let value: serde_json::Value =
            serde_json::from_str(&rendered).map_err(|e| ResolutionError::HeadersNotAMap {
                rendered: rendered.clone(),
                reason: e.to_string(),
            })?;
        let serde_json::Value::Object(entries) = value else {
            return Err(ResolutionError::HeadersNotAMap {
                rendered,
                reason: "not a JSON object".to_string(),
            });
        };

        for (name, value) in &entries {
            // Entries with a null value are dropped, per the config contract
            if value.is_null() {
                continue;
            }

            let header_name =
                name.parse::<HeaderName>()
                    .map_err(|e| ResolutionError::InvalidHeaderName {
                        name: name.clone(),
                        reason: e.to_string(),
                    })?;
            let header_value = HeaderValue::from_str(&stringify(value)).map_err(|e| {
                ResolutionError::InvalidHeaderValue {
                    name: name.clone(),
                    reason: e.to_string(),
                }
            })?;

            // Expression entries override static headers of the same name
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    /// Body precedence: static `body` > `body_expr` > raw inbound payload.
    fn resolve_body(
        &self,
        message: &InboundMessage,
        context: &serde_json::Value,
    ) -> Result<Vec<u8>, ResolutionError> {
        if let Some(body) = &self.config.body {
            return Ok(stringify(body).into_bytes());
        }

        if let Some(expr) = &self.config.body_expr {
            let rendered = self.evaluator.evaluate(expr, context)?;
            return Ok(rendered.into_bytes());
        }

        Ok(message.payload.to_body_bytes())
    }
}

/// Renders a JSON value as a plain string: strings unquoted, everything
/// else in JSON notation.
fn stringify(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
