//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("{kind} request not found: {id}")]
    RequestNotFound { kind: &'static str, id: String },

    #[error("Request already settled: current status is {0}")]
    RequestAlreadySettled(String),

    #[error("Already in cart")]
    DuplicateCartEntry,

    #[error("Already in favorites")]
    DuplicateFavorite,

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(_) | AppError::InsufficientBalance => {
                StatusCode::BAD_REQUEST
            }

            // 404 Not Found
            AppError::UserNotFound(_)
            | AppError::ProductNotFound(_)
            | AppError::OrderNotFound(_)
            | AppError::CategoryNotFound(_)
            | AppError::RequestNotFound { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::RequestAlreadySettled(_)
            | AppError::DuplicateCartEntry
            | AppError::DuplicateFavorite => StatusCode::CONFLICT,

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Clients get a machine-readable string only; detail stays in the log.
        let error = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_status_codes() {
        let cases = vec![
            (
                AppError::InvalidRequest("Missing required fields".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::InsufficientBalance, StatusCode::BAD_REQUEST),
            (
                AppError::UserNotFound("ghost@example.com".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::RequestNotFound {
                    kind: "withdrawal",
                    id: "abc".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::RequestAlreadySettled("Approved".to_string()),
                StatusCode::CONFLICT,
            ),
            (AppError::DuplicateCartEntry, StatusCode::CONFLICT),
        ];

        for (error, expected) in cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let error = AppError::Internal("connection pool exhausted".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_insufficient_balance_message() {
        // The storefront UI matches on this exact string.
        assert_eq!(
            AppError::InsufficientBalance.to_string(),
            "Insufficient balance"
        );
    }
}
