//! Error-body test helpers
//!
//! Assert the stable API error contract without depending on API types:
//! a JSON `{ "code", "description" }` body, the expected status, and an
//! `x-trace-id` header.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use serde_json::Value;

/// Assert that a response carries the expected error code and status.
///
/// Returns the parsed body so callers can check `description`.
pub async fn assert_error_body(
    resp: ServiceResponse<BoxBody>,
    expected_status: StatusCode,
    expected_code: &str,
) -> Value {
    assert_eq!(resp.status(), expected_status);

    let headers = resp.headers().clone();
    let trace_id = headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present and valid UTF-8");
    assert!(!trace_id.is_empty(), "x-trace-id header should not be empty");

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/json"),
        "Content-Type must be application/json (got {content_type})"
    );

    let body = actix_web::test::read_body(resp).await;
    let json: Value =
        serde_json::from_slice(&body).expect("error body should be valid JSON");

    assert_eq!(json["code"], expected_code, "unexpected error code in {json}");
    assert!(
        json["description"].is_string(),
        "description should be a string in {json}"
    );
    assert_eq!(
        json.as_object().map(|o| o.len()),
        Some(2),
        "error body should only carry code and description: {json}"
    );

    json
}
