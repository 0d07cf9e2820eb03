//! Maps domain `AppError` to HTTP responses.
//!
//! `AppError` lives in `shopkit-core`, so the response impl sits on the
//! local [`ApiError`] wrapper. Handlers return [`ApiResult`] and `?` on any
//! `AppResult` converts through `From`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use validator::ValidationErrors;

use shopkit_core::error::{AppError, ErrorKind};
use shopkit_core::types::ApiErrorResponse;

/// Message sent in place of any server-side failure.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Status code and machine-readable code for an error kind.
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::Authentication | ErrorKind::Session => {
            (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
        }
        ErrorKind::Authorization => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::ServiceUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Cache
        | ErrorKind::Configuration
        | ErrorKind::Serialization => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

/// An [`AppError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_code) = status_for(err.kind);

        let message = if err.kind.is_server_error() {
            tracing::error!(
                kind = %err.kind,
                error = %err.message,
                source = ?err.source,
                "Internal server error"
            );
            INTERNAL_MESSAGE.to_string()
        } else {
            err.message
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

/// A 400 response listing the failing fields under `details`.
pub fn validation_response(errors: &ValidationErrors) -> Response {
    let body = ApiErrorResponse {
        error: "VALIDATION_ERROR".to_string(),
        message: "request validation failed".to_string(),
        details: serde_json::to_value(errors.field_errors()).ok(),
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}
