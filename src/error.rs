//! Error types for the library server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Numeric error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 3,
    NoSuchData = 4,
    NoCopiesAvailable = 7,
    Duplicate = 8,
    BadValue = 18,
    AlreadyApproved = 30,
    NotApproved = 31,
    InvalidTransition = 32,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Reservation {0} is already approved")]
    AlreadyApproved(i32),

    #[error("Reservation {0} is not approved")]
    NotApproved(i32),

    #[error("No copies of book {0} are available")]
    NoCopiesAvailable(i32),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Duplicate),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
            AppError::AlreadyApproved(_) => (StatusCode::CONFLICT, ErrorCode::AlreadyApproved),
            AppError::NotApproved(_) => (StatusCode::CONFLICT, ErrorCode::NotApproved),
            AppError::NoCopiesAvailable(_) => (StatusCode::CONFLICT, ErrorCode::NoCopiesAvailable),
            AppError::InvalidTransition(_) => (StatusCode::CONFLICT, ErrorCode::InvalidTransition),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_errors_are_conflicts() {
        for err in [
            AppError::AlreadyApproved(1),
            AppError::NotApproved(1),
            AppError::NoCopiesAvailable(1),
            AppError::InvalidTransition("returned".to_string()),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::NotFound("Reservation 9 not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_error_hides_details() {
        let (status, code) = AppError::Database(sqlx::Error::RowNotFound).status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, ErrorCode::DbFailure);
    }

    #[test]
    fn test_codes_are_distinct_for_transition_errors() {
        assert_eq!(AppError::AlreadyApproved(1).status_and_code().1, ErrorCode::AlreadyApproved);
        assert_eq!(AppError::NotApproved(1).status_and_code().1, ErrorCode::NotApproved);
        assert_eq!(
            AppError::NoCopiesAvailable(1).status_and_code().1,
            ErrorCode::NoCopiesAvailable
        );
    }

    #[test]
    fn test_validation_maps_to_400() {
        let (status, code) = AppError::Validation("score out of range".to_string()).status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, ErrorCode::BadValue);
    }
}
