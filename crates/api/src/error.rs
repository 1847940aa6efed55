use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use dci_convert::ConvertError;
use dci_core::error::CoreError;
use dci_db::repositories::LookupError;
use serde_json::json;

use crate::views;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses;
/// HTML handlers wrap it in [`PageError`] instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `dci_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A conversion backend error.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An operation exceeded its own deadline.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Identifier(e) => AppError::Core(e.into()),
            LookupError::Database(e) => AppError::Database(e),
        }
    }
}

impl AppError {
    /// Classify into an HTTP status, an error code and a client-safe message.
    ///
    /// Internal details are logged here and replaced with a generic message.
    pub fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Conversion errors ---
            AppError::Convert(err) => classify_convert_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// An [`AppError`] rendered as an HTML error page.
#[derive(Debug)]
pub struct PageError(pub AppError);

/// Convenience type alias for HTML handler return values.
pub type PageResult<T> = Result<T, PageError>;

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        PageError(err)
    }
}

impl From<CoreError> for PageError {
    fn from(err: CoreError) -> Self {
        PageError(err.into())
    }
}

impl From<sqlx::Error> for PageError {
    fn from(err: sqlx::Error) -> Self {
        PageError(err.into())
    }
}

impl From<ConvertError> for PageError {
    fn from(err: ConvertError) -> Self {
        PageError(err.into())
    }
}

impl From<LookupError> for PageError {
    fn from(err: LookupError) -> Self {
        PageError(err.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, _code, message) = self.0.classify();
        (status, Html(views::error::page(status, &message))).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

/// Classify a conversion error.
///
/// - Deadlines (the job's or a single tool's) map to 504.
/// - A structure that yields no identifier, or a job that reports an error,
///   maps to 422 with the reason.
/// - An unreachable remote converter maps to 502.
/// - Local setup problems (missing tools, scratch I/O, a rejected
///   submission) map to 500 with a sanitized message.
fn classify_convert_error(err: &ConvertError) -> (StatusCode, &'static str, String) {
    match err {
        ConvertError::Timeout(_) | ConvertError::ToolTimeout { .. } => (
            StatusCode::GATEWAY_TIMEOUT,
            "TIMEOUT",
            "Structure conversion timed out".to_string(),
        ),
        ConvertError::NoIdentifier
        | ConvertError::InvalidIdentifier(_)
        | ConvertError::JobFailed(_)
        | ConvertError::ToolFailed { .. } => {
            tracing::info!(error = %err, "Conversion failed");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CONVERSION_FAILED",
                err.to_string(),
            )
        }
        ConvertError::Remote(_) => {
            tracing::error!(error = %err, "Remote converter error");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "The conversion service is unavailable".to_string(),
            )
        }
        ConvertError::Io(_) | ConvertError::ToolNotFound { .. } | ConvertError::SubmitFailed(_) => {
            tracing::error!(error = %err, "Converter error");
            internal()
        }
    }
}
