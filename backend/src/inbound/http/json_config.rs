//! JSON body extraction limits and error mapping.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, web};
use serde_json::json;
use tracing::debug;

use crate::domain::Error;

/// Map extractor failures onto the API error payload.
fn payload_error(err: &JsonPayloadError) -> Error {
    match err {
        JsonPayloadError::Overflow { limit } => {
            Error::payload_too_large(format!("request body exceeds {limit} bytes"))
                .with_details(json!({ "limit": limit }))
        }
        JsonPayloadError::OverflowKnownLength { length, limit } => {
            Error::payload_too_large(format!("request body of {length} bytes exceeds {limit} bytes"))
                .with_details(json!({ "limit": limit }))
        }
        JsonPayloadError::ContentType => Error::invalid_request("expected a JSON request body")
            .with_details(json!({ "reason": "content_type" })),
        JsonPayloadError::Deserialize(source) => Error::invalid_request("malformed JSON body")
            .with_details(json!({ "reason": source.to_string() })),
        other => Error::invalid_request("unreadable request body")
            .with_details(json!({ "reason": other.to_string() })),
    }
}

/// JSON extractor configuration limiting bodies to `limit` bytes.
///
/// Image uploads travel inline as data URLs, so the limit must leave room
/// for a base64-encoded image.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, req: &HttpRequest| {
            let mapped = payload_error(&err);
            debug!(path = %req.path(), error = %err, "rejected JSON body");
            mapped.into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::{App, HttpResponse, http::StatusCode, post, test as actix_test};
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Deserialize)]
    struct Body {
        #[expect(dead_code, reason = "only the extraction outcome matters")]
        title: String,
    }

    #[post("/echo")]
    async fn echo(_body: web::Json<Body>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[rstest]
    #[case::oversized(format!("{{\"title\":\"{}\"}}", "x".repeat(256)), StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large")]
    #[case::malformed("{\"title\":".to_owned(), StatusCode::BAD_REQUEST, "invalid_request")]
    #[case::wrong_type("{\"title\":5}".to_owned(), StatusCode::BAD_REQUEST, "invalid_request")]
    #[actix_web::test]
    async fn maps_extractor_failures(
        #[case] body: String,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let app =
            actix_test::init_service(App::new().app_data(json_config(128)).service(echo)).await;
        let request = actix_test::TestRequest::post()
            .uri("/echo")
            .insert_header(("content-type", "application/json"))
            .set_payload(body)
            .to_request();

        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), status);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["code"], code);
    }

    #[rstest]
    fn deserialize_errors_carry_a_reason() {
        let source = serde_json::from_str::<Value>("{").expect_err("invalid json");
        let err = payload_error(&JsonPayloadError::Deserialize(source));

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(err.details().and_then(|d| d.get("reason")).is_some());
    }
}
