//! Validated configuration after merging CLI and TOML sources.
//!
//! All validation happens during construction: URLs and methods are parsed,
//! expression syntax is compile-checked, and retry invariants are enforced,
//! so the processor never trips over a statically bad value at runtime.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use url::Url;

use crate::expr::TemplateEvaluator;
use crate::processor::{ProcessorConfig, ResponseType, RetryPolicy};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// The processor core configuration.
    pub processor: ProcessorConfig,

    /// Verbose logging enabled.
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.processor.url_expr.as_ref().map_or_else(
            || {
                self.processor
                    .url
                    .as_ref()
                    .map_or_else(|| "<unset>".to_string(), ToString::to_string)
            },
            |expr| format!("expr({expr})"),
        );

        write!(
            f,
            "Config {{ target: {}, method: {}, response: {:?}, retry: {} }}",
            target,
            self.processor
                .method
                .as_ref()
                .unwrap_or(&Method::GET),
            self.processor.response_type,
            if self.processor.retry.enabled {
                format!(
                    "{}x/{}ms",
                    self.processor.retry.max_attempts,
                    self.processor.retry.initial_delay.as_millis()
                )
            } else {
                "off".to_string()
            },
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional
    /// TOML config. CLI arguments take precedence over TOML values.
    ///
    /// # Errors
    ///
    /// Returns an error if no URL source is configured, or any URL, method,
    /// header, response type, expression, or retry value is invalid.
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let evaluator = TemplateEvaluator::new();

        let mut processor = ProcessorConfig::new();

        let (url, url_expr) = Self::resolve_target(cli, toml, &evaluator)?;
        processor.url = url;
        processor.url_expr = url_expr;

        processor.method = Some(Self::resolve_method(cli, toml)?);
        processor.method_expr =
            Self::checked_expr(toml.and_then(|t| t.request.http_method_expr.clone()),
                "http_method_expr", &evaluator)?;

        processor.headers = Self::resolve_headers(cli, toml)?;
        processor.headers_expr =
            Self::checked_expr(toml.and_then(|t| t.request.headers_expr.clone()),
                "headers_expr", &evaluator)?;

        processor.body = cli
            .body
            .clone()
            .map(serde_json::Value::String)
            .or_else(|| toml.and_then(|t| t.request.body.clone()));
        processor.body_expr =
            Self::checked_expr(toml.and_then(|t| t.request.body_expr.clone()),
                "body_expr", &evaluator)?;

        processor.response_type = Self::resolve_response_type(toml)?;
        processor.reply_expr = Self::checked_expr(
            cli.reply_expr
                .clone()
                .or_else(|| toml.and_then(|t| t.response.reply_expr.clone())),
            "reply_expr",
            &evaluator,
        )?;

        processor.retry = Self::build_retry_policy(toml)?;
        processor.properties = toml.map(|t| t.properties.clone()).unwrap_or_default();

        Ok(Self {
            processor,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or the
    /// merged configuration is invalid.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Resolves the request target: a URL expression wins over a static
    /// URL, and CLI sources win over TOML. At least one must be set.
    fn resolve_target(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        evaluator: &TemplateEvaluator,
    ) -> Result<(Option<Url>, Option<String>), ConfigError> {
        let url_expr = cli
            .url_expr
            .clone()
            .or_else(|| toml.and_then(|t| t.request.url_expr.clone()));

        if let Some(expr) = Self::checked_expr(url_expr, "url_expr", evaluator)? {
            return Ok((None, Some(expr)));
        }

        let url_str = cli
            .url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.request.url.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::URL,
                    "Use --url / --url-expr or set request.url in the config file",
                )
            })?;

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        Ok((Some(url), None))
    }

    fn resolve_method(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Method, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let method_str = cli
            .method
            .as_deref()
            .or_else(|| toml.and_then(|t| t.request.http_method.as_deref()))
            .unwrap_or(defaults::METHOD);

        method_str
            .to_uppercase()
            .parse::<Method>()
            .map_err(|_| ConfigError::InvalidMethod(method_str.to_string()))
    }

    fn resolve_headers(cli: &Cli, toml: Option<&TomlConfig>) -> Result<HeaderMap, ConfigError> {
        let mut headers = HeaderMap::new();

        // TOML headers first, so CLI can override
        if let Some(toml) = toml {
            for (name, value) in &toml.request.headers {
                let header_name = parse_header_name(name)?;
                let header_value = parse_header_value(name, value)?;
                headers.insert(header_name, header_value);
            }
        }

        for header_str in &cli.headers {
            let (name, value) = parse_header_string(header_str)?;
            let header_name = parse_header_name(&name)?;
            let header_value = parse_header_value(&name, &value)?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    fn resolve_response_type(toml: Option<&TomlConfig>) -> Result<ResponseType, ConfigError> {
        let value = toml
            .and_then(|t| t.response.expected_type.as_deref())
            .unwrap_or(defaults::RESPONSE_TYPE);

        match value.to_lowercase().as_str() {
            "bytes" | "binary" => Ok(ResponseType::Bytes),
            "text" | "string" => Ok(ResponseType::Text),
            "json" => Ok(ResponseType::Json),
            _ => Err(ConfigError::InvalidResponseType {
                value: value.to_string(),
            }),
        }
    }

    fn build_retry_policy(toml: Option<&TomlConfig>) -> Result<RetryPolicy, ConfigError> {
        let retry = toml.map(|t| &t.retry);

        let enabled = retry.and_then(|r| r.enabled).unwrap_or(false);
        let max_attempts = retry
            .and_then(|r| r.max_attempts)
            .unwrap_or(defaults::RETRY_MAX_ATTEMPTS);
        let initial_delay_ms = retry
            .and_then(|r| r.initial_delay_ms)
            .unwrap_or(defaults::RETRY_INITIAL_DELAY_MS);
        let max_delay_ms = retry
            .and_then(|r| r.max_delay_ms)
            .unwrap_or(defaults::RETRY_MAX_DELAY_MS);
        let multiplier = retry
            .and_then(|r| r.multiplier)
            .unwrap_or(defaults::RETRY_MULTIPLIER);

        if max_attempts == 0 {
            return Err(ConfigError::InvalidRetry(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if multiplier < 1.0 || !multiplier.is_finite() {
            return Err(ConfigError::InvalidRetry(
                "multiplier must be a finite number >= 1.0".to_string(),
            ));
        }

        if max_delay_ms < initial_delay_ms {
            return Err(ConfigError::InvalidRetry(format!(
                "max_delay_ms ({max_delay_ms}) must be >= initial_delay_ms ({initial_delay_ms})"
            )));
        }

        let mut policy = if enabled {
            RetryPolicy::enabled()
        } else {
            RetryPolicy::disabled()
        }
        .with_max_attempts(max_attempts)
        .with_initial_delay(Duration::from_millis(initial_delay_ms))
        .with_max_delay(Duration::from_millis(max_delay_ms))
        .with_multiplier(multiplier);

        if let Some(statuses) = retry.and_then(|r| r.retry_on_status.clone()) {
            policy = policy.with_retry_on_status(statuses);
        }

        Ok(policy)
    }

    /// Compile-checks an optional expression, tagging errors with the field
    /// name.
    fn checked_expr(
        expr: Option<String>,
        field: &'static str,
        evaluator: &TemplateEvaluator,
    ) -> Result<Option<String>, ConfigError> {
        if let Some(ref e) = expr {
            evaluator
                .check_syntax(e)
                .map_err(|err| ConfigError::InvalidExpression {
                    field,
                    reason: err.to_string(),
                })?;
        }
        Ok(expr)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    // Try "Key=Value" format first
    if let Some((name, value)) = s.split_once('=') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    // Try "Key: Value" format
    if let Some((name, value)) = s.split_once(':') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    Err(ConfigError::InvalidHeader {
        value: s.to_string(),
    })
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
