use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use costumier_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent
/// `{ "error", "details" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `costumier_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Generic error label for sanitized 500 responses.
const GENERIC_ERROR: &str = "Failed to generate image";

/// Generic details for sanitized 500 responses.
const GENERIC_DETAILS: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Core(core) => classify_core_error(core),

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Invalid request", msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_ERROR,
                    GENERIC_DETAILS.to_string(),
                )
            }
        };

        let body = json!({
            "error": error,
            "details": details,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map the domain taxonomy onto HTTP statuses.
///
/// Remote failure classes keep their distinct statuses (401 auth, 422
/// unprocessable, 429 rate limited, 504 timeout) so callers can
/// distinguish transient from permanent failures without parsing text.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::Validation(msg) => {
            (StatusCode::BAD_REQUEST, "Invalid request", msg.clone())
        }
        CoreError::Encoding(msg) => {
            (StatusCode::BAD_REQUEST, "Invalid image data", msg.clone())
        }
        CoreError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            "Not found",
            err.user_message(),
        ),
        CoreError::RemoteAuth(_) => (
            StatusCode::UNAUTHORIZED,
            "Authentication failed",
            err.user_message(),
        ),
        CoreError::RemoteUnprocessable(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Failed to process image",
            err.user_message(),
        ),
        CoreError::RemoteBadRequest(_) => (
            StatusCode::BAD_REQUEST,
            "Invalid request",
            err.user_message(),
        ),
        CoreError::RemoteRateLimited(_) => (
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limited",
            err.user_message(),
        ),
        CoreError::RemoteTimeout(_) => (
            StatusCode::GATEWAY_TIMEOUT,
            "Generation timed out",
            err.user_message(),
        ),
        CoreError::Storage(msg) => {
            tracing::error!(error = %msg, "Storage error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_ERROR,
                err.user_message(),
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_ERROR,
                GENERIC_DETAILS.to_string(),
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error label, and details.
///
/// `RowNotFound` maps to 404; everything else maps to 500 with a
/// sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "Not found",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_ERROR,
                GENERIC_DETAILS.to_string(),
            )
        }
    }
}
