//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from the TOML file.
///
/// All fields are optional so partial configuration can be merged with CLI
/// arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Request construction section
    #[serde(default)]
    pub request: RequestSection,

    /// Response handling section
    #[serde(default)]
    pub response: ResponseSection,

    /// Retry policy section
    #[serde(default)]
    pub retry: RetrySection,

    /// Ambient properties exposed to expressions as `env.*`
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

/// Request construction configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestSection {
    /// Static request URL
    pub url: Option<String>,

    /// Expression yielding the request URL per message
    pub url_expr: Option<String>,

    /// Static HTTP method (default: GET)
    pub http_method: Option<String>,

    /// Expression yielding the method name per message
    pub http_method_expr: Option<String>,

    /// Static HTTP headers as key-value pairs
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Expression rendering to a JSON object of headers
    pub headers_expr: Option<String>,

    /// Static request body (any TOML value)
    pub body: Option<serde_json::Value>,

    /// Expression yielding the request body per message
    pub body_expr: Option<String>,
}

/// Response handling configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseSection {
    /// Response decoding type: "bytes", "text", or "json"
    pub expected_type: Option<String>,

    /// Expression deriving the outbound payload from the response
    pub reply_expr: Option<String>,
}

/// Retry policy configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Whether to retry failed HTTP calls at all
    pub enabled: Option<bool>,

    /// Maximum number of attempts, including the first
    pub max_attempts: Option<u32>,

    /// Initial retry delay in milliseconds
    pub initial_delay_ms: Option<u64>,

    /// Maximum retry delay in milliseconds
    pub max_delay_ms: Option<u64>,

    /// Backoff multiplier
    pub multiplier: Option<f64>,

    /// Explicit list of retryable status codes (unset = 5xx + 408 + 429)
    pub retry_on_status: Option<Vec<u16>>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# http-relay configuration file

[request]
# Static request URL, or an expression evaluated per message.
# Expressions see {{payload}}, {{headers.*}} and {{env.*}}.
# url = "http://localhost:8080/greet"
# url_expr = "http://localhost:{{env.port}}/{{payload}}"

# HTTP method (default: GET), optionally derived per message.
# http_method = "POST"
# http_method_expr = "{{headers.method}}"

# Static HTTP headers
# [request.headers]
# Content-Type = "application/json"

# Headers expression: must render to a JSON object. Entries with a null
# value are dropped; rendered entries override static headers.
# headers_expr = '{"X-Trace": "{{headers.trace-id}}"}'

# Static body (always wins), or a body expression; when both are unset
# the inbound payload is sent as the body.
# body = { foo = "bar" }
# body_expr = '{"wrapped": "{{payload}}"}'

[response]
# How the response body is decoded: "bytes", "text", or "json".
# expected_type = "text"

# Expression deriving the outbound payload from the response
# ({{status}}, {{headers.*}}, {{body}}); default is the decoded body.
# reply_expr = "{{substr body 3 8}}"

[retry]
# Retry failed HTTP calls with exponential backoff (default: disabled).
# enabled = true

# Maximum number of attempts, including the first (default: 3)
# max_attempts = 3

# Initial retry delay in milliseconds (default: 1000)
# initial_delay_ms = 1000

# Maximum retry delay in milliseconds (default: 30000)
# max_delay_ms = 30000

# Backoff multiplier (default: 2.0)
# multiplier = 2.0

# Status codes to retry; when unset, any 5xx plus 408 and 429.
# retry_on_status = [500, 502, 503]

# Ambient properties, visible to expressions as env.*
# [properties]
# port = "8080"
"#
    .to_string()
}
