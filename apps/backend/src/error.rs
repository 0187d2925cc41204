//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lexicard_core::{QuizError, StoreError};
use serde::Serialize;
use thiserror::Error;

use crate::storage::StorageError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::EmptyField { .. } => ApiError::Validation(e.to_string()),
            StoreError::LanguageExists(_) | StoreError::SubcategoryExists { .. } => {
                ApiError::Conflict(e.to_string())
            }
            StoreError::LanguageNotFound(_)
            | StoreError::SubcategoryNotFound { .. }
            | StoreError::FlashcardNotFound { .. } => ApiError::NotFound(e.to_string()),
        }
    }
}

impl From<QuizError> for ApiError {
    fn from(e: QuizError) -> Self {
        match e {
            QuizError::NotInProgress => ApiError::NotFound(e.to_string()),
            QuizError::NotEnoughFlashcards { .. }
            | QuizError::NotEnoughDistinctAnswers { .. }
            | QuizError::NotMultipleChoice
            | QuizError::InvalidChoice { .. } => ApiError::Validation(e.to_string()),
        }
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
