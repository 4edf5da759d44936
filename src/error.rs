//! Error types for FieldReserve server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::booking::{BookingError, ErrorKind};

/// Numeric error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    Forbidden = 3,
    DbFailure = 4,
    NotFound = 5,
    Duplicate = 6,
    BadValue = 7,
    RuleViolation = 8,
    BookingOverlap = 9,
    BookingFinal = 10,
    DependencyFailure = 11,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Booking error: {0}")]
    Booking(#[from] BookingError),
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

fn booking_status(err: &BookingError) -> (StatusCode, ErrorCode) {
    match (err.kind(), err) {
        (_, BookingError::BookingOverlap) => (StatusCode::CONFLICT, ErrorCode::BookingOverlap),
        (_, BookingError::AlreadyFinal) => (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::BookingFinal),
        (ErrorKind::Input, _) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
        (ErrorKind::BusinessRule, _) => (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::RuleViolation),
        (ErrorKind::NotFound, _) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
        (ErrorKind::Dependency, _) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DependencyFailure),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::Forbidden, msg.clone())
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone())
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::RuleViolation, msg.clone())
            }
            AppError::Booking(err) => {
                let (status, code) = booking_status(err);
                if status.is_server_error() {
                    tracing::error!("Booking dependency failure: {}", err);
                }
                (status, code, err.to_string())
            }
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

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_booking_errors_map_to_http_status() {
        assert_eq!(status_of(BookingError::InvalidDateFormat.into()), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(BookingError::TooSoon.into()), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_of(BookingError::BookingOverlap.into()), StatusCode::CONFLICT);
        assert_eq!(status_of(BookingError::AlreadyFinal.into()), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_of(BookingError::FieldNotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(status_of(BookingError::NotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(BookingError::CreateFailed("db down".to_string()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_errors() {
        assert_eq!(
            status_of(AppError::Authentication("no token".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Authorization("admin only".to_string())),
            StatusCode::FORBIDDEN
        );
    }
}
