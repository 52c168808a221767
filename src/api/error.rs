//! Mapping from core errors to HTTP responses

use crate::{FormatError, ValidatorError};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

/// Error returned by HTTP handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body was missing, not JSON, or missing required fields
    #[error(transparent)]
    Body(#[from] JsonRejection),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Validator(#[from] ValidatorError),

    #[error("request timed out")]
    Timeout,
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Format(_) => StatusCode::BAD_REQUEST,
            ApiError::Validator(err) => match err {
                ValidatorError::NotFound { .. } => StatusCode::NOT_FOUND,
                ValidatorError::Duplicate { .. } | ValidatorError::ConstraintViolation { .. } => {
                    StatusCode::CONFLICT
                }
                ValidatorError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
