//! Tests for the request builder.

use serde_json::json;

use super::builder::RequestBuilder;
use super::config::ProcessorConfig;
use super::error::ResolutionError;
use super::message::InboundMessage;
use crate::expr::TemplateEvaluator;
use crate::http::HttpRequest;

fn build(config: &ProcessorConfig, message: &InboundMessage) -> Result<HttpRequest, ResolutionError> {
    let evaluator = TemplateEvaluator::new();
    RequestBuilder::new(config, &evaluator).build(message)
}

fn static_url() -> url::Url {
    url::Url::parse("http://localhost:8080/greet").unwrap()
}

mod url_resolution {
    use super::*;

    #[test]
    fn static_url_is_used_when_no_expression() {
        let config = ProcessorConfig::new().with_url(static_url());
        let request = build(&config, &InboundMessage::text("...")).unwrap();
        assert_eq!(request.url.as_str(), "http://localhost:8080/greet");
    }

    #[test]
    fn url_expression_builds_path_from_payload() {
        let config = ProcessorConfig::new().with_url_expr("http://localhost:8080/{{payload}}");
        let request = build(&config, &InboundMessage::text("greet")).unwrap();
        assert_eq!(request.url.as_str(), "http://localhost:8080/greet");
    }

    #[test]
    fn url_expression_reads_env_properties() {
        let config = ProcessorConfig::new()
            .with_url_expr("http://localhost:{{env.port}}/greet")
            .with_property("port", "9090");
        let request = build(&config, &InboundMessage::text("...")).unwrap();
        assert_eq!(request.url.as_str(), "http://localhost:9090/greet");
    }

    #[test]
    fn missing_url_fails() {
        let config = ProcessorConfig::new();
        let result = build(&config, &InboundMessage::text("..."));
        assert!(matches!(result, Err(ResolutionError::MissingUrl)));
    }

    #[test]
    fn empty_expression_result_fails() {
        let config = ProcessorConfig::new()
            .with_url_expr("{{env.target}}")
            .with_property("target", "");
        let result = build(&config, &InboundMessage::text("..."));
        assert!(matches!(result, Err(ResolutionError::EmptyUrl { .. })));
    }

    #[test]
    fn malformed_resolved_url_fails() {
        let config = ProcessorConfig::new().with_url_expr("not a url {{payload}}");
        let result = build(&config, &InboundMessage::text("x"));
        assert!(matches!(result, Err(ResolutionError::InvalidUrl { .. })));
    }

    #[test]
    fn unbound_reference_fails_as_evaluation_error() {
        let config = ProcessorConfig::new().with_url_expr("http://host/{{headers.missing}}");
        let result = build(&config, &InboundMessage::text("x"));
        assert!(matches!(result, Err(ResolutionError::Evaluation(_))));
    }
}

mod method_resolution {
    use super::*;

    #[test]
    fn defaults_to_get() {
        let config = ProcessorConfig::new().with_url(static_url());
        let request = build(&config, &InboundMessage::text("...")).unwrap();
        assert_eq!(request.method, http::Method::GET);
    }

    #[test]
    fn static_method_is_used() {
        let config = ProcessorConfig::new()
            .with_url(static_url())
            .with_method(http::Method::POST);
        let request = build(&config, &InboundMessage::text("...")).unwrap();
        assert_eq!(request.method, http::Method::POST);
    }

    #[test]
    fn method_expression_overrides_static_method() {
        let config = ProcessorConfig::new()
            .with_url(static_url())
            .with_method(http::Method::GET)
            .with_method_expr("{{headers.verb}}");
        let message = InboundMessage::text("...").with_header("verb", "put");
        let request = build(&config, &message).unwrap();
        assert_eq!(request.method, http::Method::PUT);
    }

    #[test]
    fn unparseable_method_fails() {
        let config = ProcessorConfig::new()
            .with_url(static_url())
            .with_method_expr("{{headers.verb}}");
        let message = InboundMessage::text("...").with_header("verb", "not a method");
        let result = build(&config, &message);
        assert!(matches!(result, Err(ResolutionError::InvalidMethod(_))));
    }
}

mod header_resolution {
    use super::*;

    #[test]
    fn no_expression_yields_static_headers_only() {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::ACCEPT,
            http::HeaderValue::from_static("text/plain"),
        );
        let config = ProcessorConfig::new()
            .with_url(static_url())
            .with_headers(headers);

        let request = build(&config, &InboundMessage::text("...")).unwrap();

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.headers[http::header::ACCEPT], "text/plain");
    }

    #[test]
    fn expression_entries_are_added() {
        let config = ProcessorConfig::new()
            .with_url(static_url())
            .with_headers_expr(r#"{"Key1": "value1", "Key2": "value2"}"#);

        let request = build(&config, &InboundMessage::text("...")).unwrap();

        assert_eq!(request.headers["key1"], "value1");
        assert_eq!(request.headers["key2"], "value2");
    }

    #[test]
    fn null_valued_entries_are_dropped() {
        let config = ProcessorConfig::new()
            .with_url(static_url())
            .with_headers_expr(r#"{"Keep": "yes", "Drop": null}"#);

        let request = build(&config, &InboundMessage::text("...")).unwrap();

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.headers["keep"], "yes");
        assert!(!request.headers.contains_key("drop"));
    }

    #[test]
    fn non_string_values_are_stringified() {
        let config = ProcessorConfig::new()
            .with_url(static_url())
            .with_headers_expr(r#"{"X-Count": 3}"#);

        let request = build(&config, &InboundMessage::text("...")).unwrap();

        assert_eq!(request.headers["x-count"], "3");
    }

    #[test]
    fn expression_overrides_static_header_of_same_name() {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::ACCEPT,
            http::HeaderValue::from_static("text/plain"),
        );
        let config = ProcessorConfig::new()
            .with_url(static_url())
            .with_headers(headers)
            .with_headers_expr(r#"{"Accept": "application/json"}"#);

        let request = build(&config, &InboundMessage::text("...")).unwrap();

        assert_eq!(request.headers[http::header::ACCEPT], "application/json");
    }

    #[test]
    fn headers_expression_can_read_message_headers() {
        let config = ProcessorConfig::new()
            .with_url(static_url())
            .with_headers_expr(r#"{"X-Tenant": "{{headers.tenant}}"}"#);
        let message = InboundMessage::text("...").with_header("tenant", "acme");

        let request = build(&config, &message).unwrap();

        assert_eq!(request.headers["x-tenant"], "acme");
    }

    #[test]
    fn non_object_rendering_fails() {
        let config = ProcessorConfig::new()
            .with_url(static_url())
            .with_headers_expr(r#"["not", "a", "map"]"#);

        let result = build(&config, &InboundMessage::text("..."));

        assert!(matches!(result, Err(ResolutionError::HeadersNotAMap { .. })));
    }

    #[test]
    fn invalid_header_name_fails() {
        let config = ProcessorConfig::new()
            .with_url(static_url())
            .with_headers_expr(r#"{"bad name": "v"}"#);

        let result = build(&config, &InboundMessage::text("..."));

        assert!(matches!(result, Err(ResolutionError::InvalidHeaderName { .. })));
    }
}

mod body_resolution {
    use super::*;

    #[test]
    fn falls_back_to_inbound_payload() {
        let config = ProcessorConfig::new().with_url(static_url());
        let request = build(&config, &InboundMessage::text("the payload")).unwrap();
        assert_eq!(request.body.as_deref(), Some(b"the payload".as_slice()));
    }

    #[test]
    fn body_expression_is_used_when_no_static_body() {
        let config = ProcessorConfig::new()
            .with_url(static_url())
            .with_body_expr(r#"{"wrapped": "{{payload}}"}"#);
        let request = build(&config, &InboundMessage::text("x")).unwrap();
        assert_eq!(request.body.as_deref(), Some(br#"{"wrapped": "x"}"#.as_slice()));
    }

    #[test]
    fn static_body_wins_over_expression_and_payload() {
        // Precedence law: body > body_expr > payload
        let config = ProcessorConfig::new()
            .with_url(static_url())
            .with_body(json!({ "foo": "bar" }))
            .with_body_expr("{{payload}}");
        let request = build(&config, &InboundMessage::text("ignored")).unwrap();

        let body = String::from_utf8(request.body.unwrap()).unwrap();
        assert!(body.contains("foo"));
        assert!(body.contains("bar"));
        assert!(!body.contains("ignored"));
    }

    #[test]
    fn static_string_body_is_sent_unquoted() {
        let config = ProcessorConfig::new()
            .with_url(static_url())
            .with_body(json!("plain text"));
        let request = build(&config, &InboundMessage::text("...")).unwrap();
        assert_eq!(request.body.as_deref(), Some(b"plain text".as_slice()));
    }

    #[test]
    fn json_payload_is_serialized_as_fallback_body() {
        let config = ProcessorConfig::new().with_url(static_url());
        let message = InboundMessage::json(json!({ "name": "Fred" }));
        let request = build(&config, &message).unwrap();
        let body = String::from_utf8(request.body.unwrap()).unwrap();
        assert!(body.contains("Fred"));
    }
}
