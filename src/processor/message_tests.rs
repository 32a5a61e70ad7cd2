//! Tests for payload types and response decoding.

use serde_json::json;

use super::error::ExtractionError;
use super::message::{InboundMessage, Payload, ResponseType};
use crate::http::HttpResponse;

mod payload {
    use super::*;

    #[test]
    fn text_body_bytes_are_utf8() {
        let payload = Payload::Text("hello".to_string());
        assert_eq!(payload.to_body_bytes(), b"hello");
    }

    #[test]
    fn json_body_bytes_are_serialized() {
        let payload = Payload::Json(json!({ "foo": "bar" }));
        let body = String::from_utf8(payload.to_body_bytes()).unwrap();
        assert!(body.contains("foo"));
        assert!(body.contains("bar"));
    }

    #[test]
    fn bytes_body_passes_through() {
        let payload = Payload::Bytes(vec![0x01, 0x02]);
        assert_eq!(payload.to_body_bytes(), vec![0x01, 0x02]);
    }

    #[test]
    fn display_renders_json_compactly() {
        let payload = Payload::Json(json!({ "a": 1 }));
        assert_eq!(payload.to_string(), r#"{"a":1}"#);
    }
}

mod inbound_message {
    use super::*;

    #[test]
    fn text_constructor_sets_text_payload() {
        let message = InboundMessage::text("greet");
        assert_eq!(message.payload, Payload::Text("greet".to_string()));
        assert!(message.headers.is_empty());
    }

    #[test]
    fn with_header_adds_headers() {
        let message = InboundMessage::text("x")
            .with_header("a", "1")
            .with_header("b", "2");
        assert_eq!(message.headers.len(), 2);
        assert_eq!(message.headers["a"], "1");
    }
}

mod response_decoding {
    use super::*;

    fn response(body: &[u8]) -> HttpResponse {
        HttpResponse::new(http::StatusCode::OK, http::HeaderMap::new(), body.to_vec())
    }

    #[test]
    fn text_decodes_utf8() {
        let envelope = ResponseType::Text.decode(response(b"Hello World")).unwrap();
        assert_eq!(envelope.body, Payload::Text("Hello World".to_string()));
        assert_eq!(envelope.status, http::StatusCode::OK);
    }

    #[test]
    fn text_rejects_invalid_utf8() {
        let result = ResponseType::Text.decode(response(&[0xff, 0xfe]));
        assert!(matches!(
            result,
            Err(ExtractionError::Decode { expected: "text", .. })
        ));
    }

    #[test]
    fn json_decodes_structured_body() {
        let envelope = ResponseType::Json.decode(response(br#"{"id":7}"#)).unwrap();
        assert_eq!(envelope.body, Payload::Json(json!({ "id": 7 })));
    }

    #[test]
    fn json_rejects_malformed_body() {
        let result = ResponseType::Json.decode(response(b"not json"));
        assert!(matches!(
            result,
            Err(ExtractionError::Decode { expected: "json", .. })
        ));
    }

    #[test]
    fn bytes_accepts_anything() {
        let envelope = ResponseType::Bytes.decode(response(&[0xff, 0xfe])).unwrap();
        assert_eq!(envelope.body, Payload::Bytes(vec![0xff, 0xfe]));
    }

    #[test]
    fn default_is_text() {
        assert_eq!(ResponseType::default(), ResponseType::Text);
    }
}
