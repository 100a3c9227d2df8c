//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use stela_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Newtype over [`AppError`] carrying the HTTP mapping.
///
/// Handlers return `Result<_, ApiError>`; the `From` impl lets `?`
/// propagate service errors directly.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Resolve the HTTP status and machine-readable code for an error kind.
///
/// `ACTIVE_VERSION_PROTECTED` gets its own code so clients can show
/// "activate another version first" instead of a generic failure.
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::ActiveVersionProtected => {
            (StatusCode::CONFLICT, "ACTIVE_VERSION_PROTECTED")
        }
        ErrorKind::Storage => (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_ERROR"),
        ErrorKind::Consistency => (StatusCode::INTERNAL_SERVER_ERROR, "CONSISTENCY_ERROR"),
        ErrorKind::Database
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = status_for(self.0.kind);

        if status.is_server_error() {
            tracing::error!(kind = %self.0.kind, error = %self.0.message, "Request failed");
        }

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message: self.0.message,
        };

        (status, Json(body)).into_response()
    }
}
