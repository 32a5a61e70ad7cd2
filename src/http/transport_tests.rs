//! Tests for HTTP request/response value types.

use super::{HttpRequest, HttpResponse};

fn test_url() -> url::Url {
    url::Url::parse("https://example.com/greet").unwrap()
}

mod http_request {
    use super::*;

    #[test]
    fn new_starts_with_empty_headers_and_no_body() {
        let request = HttpRequest::new(http::Method::PUT, test_url());

        assert_eq!(request.method, http::Method::PUT);
        assert_eq!(request.url.as_str(), "https://example.com/greet");
        assert!(request.headers.is_empty());
        assert!(request.body.is_none());
    }

    #[test]
    fn get_uses_get_method() {
        let request = HttpRequest::get(test_url());
        assert_eq!(request.method, http::Method::GET);
    }

    #[test]
    fn post_uses_post_method() {
        let request = HttpRequest::post(test_url());
        assert_eq!(request.method, http::Method::POST);
    }

    #[test]
    fn with_body_sets_body() {
        let request = HttpRequest::post(test_url()).with_body(b"payload".to_vec());
        assert_eq!(request.body.as_deref(), Some(b"payload".as_slice()));
    }

    #[test]
    fn with_header_appends_repeated_names() {
        let request = HttpRequest::get(test_url())
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("text/plain"),
            )
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("application/json"),
            );

        let values: Vec<_> = request.headers.get_all(http::header::ACCEPT).iter().collect();
        assert_eq!(values.len(), 2);
    }
}

mod http_response {
    use super::*;

    #[test]
    fn is_success_for_2xx() {
        let response = HttpResponse::new(http::StatusCode::CREATED, http::HeaderMap::new(), vec![]);
        assert!(response.is_success());
    }

    #[test]
    fn is_not_success_for_5xx() {
        let response = HttpResponse::new(
            http::StatusCode::INTERNAL_SERVER_ERROR,
            http::HeaderMap::new(),
            vec![],
        );
        assert!(!response.is_success());
    }

    #[test]
    fn body_text_returns_utf8_body() {
        let response = HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            b"Hello World".to_vec(),
        );
        assert_eq!(response.body_text(), Some("Hello World"));
    }

    #[test]
    fn body_text_returns_none_for_invalid_utf8() {
        let response = HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            vec![0xff, 0xfe],
        );
        assert_eq!(response.body_text(), None);
    }
}
