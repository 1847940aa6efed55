//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly and need no HTTP server.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use dci_api::error::{AppError, PageError};
use dci_convert::ConvertError;
use dci_core::error::CoreError;
use dci_core::inchi::InchiError;
use dci_db::repositories::LookupError;
use http_body_util::BodyExt;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// -- Core and HTTP variants ---------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "PubChem compound",
        id: "42".to_string(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "PubChem compound with id 42 not found");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("Specify term.".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Specify term.");
}

#[tokio::test]
async fn malformed_identifier_lookup_returns_400() {
    let err: AppError = LookupError::Identifier(InchiError::Empty).into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn timeout_error_returns_504() {
    let err = AppError::Timeout("The search took too long".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json["code"], "TIMEOUT");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert!(!json.to_string().contains("secret"));
    assert_eq!(json["error"], "An internal error occurred");
}

// -- Conversion variants ------------------------------------------------------

#[tokio::test]
async fn conversion_timeout_returns_504() {
    let err = AppError::Convert(ConvertError::Timeout(Duration::from_secs(60)));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json["code"], "TIMEOUT");
}

#[tokio::test]
async fn missing_identifier_returns_422_with_reason() {
    let err = AppError::Convert(ConvertError::NoIdentifier);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "CONVERSION_FAILED");
    assert_eq!(json["error"], "no InChI was produced for the structure");
}

#[tokio::test]
async fn failed_job_returns_422() {
    let err = AppError::Convert(ConvertError::JobFailed("bad valence".into()));

    let (status, _) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn rejected_submission_is_sanitized_500() {
    let err = AppError::Convert(ConvertError::SubmitFailed("schedd at 10.0.0.7 refused".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!json.to_string().contains("10.0.0.7"));
}

#[tokio::test]
async fn remote_failure_returns_502() {
    let err = AppError::Convert(ConvertError::Remote("connection refused".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["code"], "UPSTREAM_ERROR");
}

// -- HTML pages ---------------------------------------------------------------

#[tokio::test]
async fn page_error_renders_html_with_same_status() {
    let response = PageError(AppError::BadRequest("No structure <provided>".into())).into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("400 Bad Request"));
    assert!(html.contains("No structure &lt;provided&gt;"));
}
