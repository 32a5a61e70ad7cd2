//! Processor configuration: the expression set driving request construction
//! and reply extraction.

use std::collections::HashMap;

use super::RetryPolicy;
use super::message::ResponseType;

/// Immutable, process-wide configuration for the processor.
///
/// Loaded once and shared read-only across concurrent message processings.
/// Each `*_expr` field holds an expression evaluated per message (or per
/// response, for `reply_expr`); the non-expression counterpart is the static
/// fallback.
///
/// # Example
///
/// ```
/// use http_relay::processor::{ProcessorConfig, RetryPolicy};
///
/// let config = ProcessorConfig::new()
///     .with_url_expr("http://localhost:{{env.port}}/{{payload}}")
///     .with_property("port", "8080")
///     .with_retry(RetryPolicy::enabled().with_max_attempts(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProcessorConfig {
    /// Static request URL, used when `url_expr` is unset.
    pub url: Option<url::Url>,

    /// Expression yielding the request URL per message.
    ///
    /// Must resolve to a non-empty, syntactically valid URL. One of `url`
    /// or `url_expr` is required.
    pub url_expr: Option<String>,

    /// Static HTTP method; GET when left unset.
    pub method: Option<http::Method>,

    /// Expression yielding the method name per message, overriding `method`.
    pub method_expr: Option<String>,

    /// Static request headers, applied before `headers_expr` output.
    pub headers: http::HeaderMap,

    /// Expression yielding the request headers per message.
    ///
    /// Must render to a JSON object; entries with a null value are dropped,
    /// all other values are stringified. Rendered entries override static
    /// `headers` entries of the same name.
    pub headers_expr: Option<String>,

    /// Static request body. Always wins over `body_expr` and the payload.
    pub body: Option<serde_json::Value>,

    /// Expression yielding the request body per message.
    ///
    /// Consulted only when `body` is unset; when both are unset the raw
    /// inbound payload is sent as the body.
    pub body_expr: Option<String>,

    /// How the response body is decoded (bytes, text, or JSON).
    pub response_type: ResponseType,

    /// Expression deriving the outbound payload from the response.
    ///
    /// Evaluated against `status`, `headers`, and the decoded `body`;
    /// defaults to the decoded body unchanged.
    pub reply_expr: Option<String>,

    /// Retry policy wrapping the HTTP call.
    pub retry: RetryPolicy,

    /// Ambient properties exposed to expressions as `env.*`.
    pub properties: HashMap<String, String>,
}

impl ProcessorConfig {
    /// Creates an empty configuration: no URL, GET, text responses, retry
    /// disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the static request URL.
    #[must_use]
    pub fn with_url(mut self, url: url::Url) -> Self {
        self.url = Some(url);
        self
    }

    /// Sets the URL expression.
    #[must_use]
    pub fn with_url_expr(mut self, expr: impl Into<String>) -> Self {
        self.url_expr = Some(expr.into());
        self
    }

    /// Sets the static HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: http::Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the per-message method expression.
    #[must_use]
    pub fn with_method_expr(mut self, expr: impl Into<String>) -> Self {
        self.method_expr = Some(expr.into());
        self
    }

    /// Sets the static request headers.
    #[must_use]
    pub fn with_headers(mut self, headers: http::HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the headers expression.
    #[must_use]
    pub fn with_headers_expr(mut self, expr: impl Into<String>) -> Self {
        self.headers_expr = Some(expr.into());
        self
    }

    /// Sets the static request body.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the body expression.
    #[must_use]
    pub fn with_body_expr(mut self, expr: impl Into<String>) -> Self {
        self.body_expr = Some(expr.into());
        self
    }

    /// Sets the response decoding type.
    #[must_use]
    pub const fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Sets the reply expression.
    #[must_use]
    pub fn with_reply_expr(mut self, expr: impl Into<String>) -> Self {
        self.reply_expr = Some(expr.into());
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Adds one ambient property, visible to expressions as `env.<name>`.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Replaces the ambient property map.
    #[must_use]
    pub fn with_properties(mut self, properties: HashMap<String, String>) -> Self {
        self.properties = properties;
        self
    }
}
