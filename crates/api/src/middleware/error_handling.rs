//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and the uniform response
//! envelope, so every failure leaves the API in the same
//! `{"success": false, "message": ..., "data": {}}` shape.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gymfinder_core::{envelope::ApiResponse, errors::GymError};

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps domain-specific `GymError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and enveloped JSON payloads.
#[derive(Debug)]
pub struct AppError(pub GymError);

/// Converts application errors to HTTP responses.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            GymError::NotFound(_) => StatusCode::NOT_FOUND,
            GymError::Validation(_) => StatusCode::BAD_REQUEST,
            GymError::Authentication(_) => StatusCode::UNAUTHORIZED,
            GymError::Authorization(_) => StatusCode::FORBIDDEN,
            GymError::Conflict(_) => StatusCode::CONFLICT,
            GymError::InvalidState(_) => StatusCode::CONFLICT,
            GymError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GymError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as an envelope
        let body = Json(ApiResponse::error(self.0.to_string()));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from GymError to AppError.
///
/// This implementation allows using the `?` operator with functions that
/// return `Result<T, GymError>` in handler functions that return
/// `Result<T, AppError>`.
impl From<GymError> for AppError {
    fn from(err: GymError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError.
///
/// Wraps the eyre error in a `GymError::Database` variant so repository
/// failures propagate with `?`.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(GymError::Database(err))
    }
}
