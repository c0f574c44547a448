use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use users_shared::error::StoreError;
use users_shared::models::ErrorResponse;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::InternalError(msg) => AppError::Internal(msg),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request error: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: msg,
                        details: None,
                    },
                )
            }
            AppError::NotFound(msg) => {
                tracing::warn!("Not found error: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: msg,
                        details: None,
                    },
                )
            }
            AppError::Internal(details) => {
                tracing::error!("Internal server error: {}", details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal server error".to_string(),
                        details: Some(details),
                    },
                )
            }
        };

        tracing::info!("Returning error response: status={}", status);
        let body = serde_json::to_value(&body).unwrap_or_default();
        ApiResponse::new(status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
