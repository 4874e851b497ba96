use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::order::OrderStatus;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("illegal transition: {from:?} -> {to:?}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("driver {0} is not available")]
    DriverUnavailable(String),

    #[error("no zone could be resolved for the delivery address")]
    UnresolvedZone,

    #[error("batch {0} is closed")]
    BatchClosed(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Only storage failures are worth retrying; every other kind is
    /// permanent for the given input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StorageUnavailable(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::IllegalTransition { .. }
            | AppError::InvalidState(_)
            | AppError::DriverUnavailable(_)
            | AppError::BatchClosed(_) => StatusCode::CONFLICT,
            AppError::UnresolvedZone => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "retryable": self.is_retryable(),
        }));

        (status, body).into_response()
    }
}
