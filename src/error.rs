//! Error types for Bookshelf server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::storage::StorageError;

/// Application error codes reported in error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 2,
    BadValue = 3,
    UserExists = 4,
    NoSuchUser = 5,
    InvalidPassword = 6,
    NoSuchBook = 7,
    EmptyCatalog = 8,
    NotImplemented = 9,
    CountOverflow = 10,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    fn parts(&self) -> (StatusCode, ErrorCode, String) {
        match self {
            AppError::Storage(e) => storage_parts(e),
            AppError::Validation(msg) | AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::NotImplemented(msg) => (
                StatusCode::NOT_IMPLEMENTED,
                ErrorCode::NotImplemented,
                msg.clone(),
            ),
        }
    }
}

fn storage_parts(error: &StorageError) -> (StatusCode, ErrorCode, String) {
    if !error.is_domain() {
        return opaque_parts(error);
    }

    let (status, code) = match error {
        StorageError::UserExists => (StatusCode::CONFLICT, ErrorCode::UserExists),
        StorageError::UserDoesNotExist | StorageError::UserNotFound => {
            (StatusCode::NOT_FOUND, ErrorCode::NoSuchUser)
        }
        StorageError::InvalidPassword => (StatusCode::UNAUTHORIZED, ErrorCode::InvalidPassword),
        StorageError::BookDoesNotExist => (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook),
        StorageError::EmptyBookList => (StatusCode::NOT_FOUND, ErrorCode::EmptyCatalog),
        StorageError::CopyCountOverflow => (StatusCode::CONFLICT, ErrorCode::CountOverflow),
        other => return opaque_parts(other),
    };

    (status, code, error.to_string())
}

/// Infrastructure failures are logged and hidden from clients
fn opaque_parts(error: &StorageError) -> (StatusCode, ErrorCode, String) {
    match error {
        StorageError::Database(e) => {
            tracing::error!("Database error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DbFailure,
                "Database error".to_string(),
            )
        }
        other => {
            tracing::error!("Internal error: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::Failure,
                "Internal server error".to_string(),
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_client_error() {
            tracing::debug!(%status, "request rejected: {}", message);
        }

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
