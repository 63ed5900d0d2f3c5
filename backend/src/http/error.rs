//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::ServiceError;

/// API error response body: `{"Error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "Error")]
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Malformed body or a missing required field
    BadRequest(String),
    /// Missing, malformed or expired token
    Unauthorized,
    Conflict(String),
    /// Everything else, not-found included
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::BadRequest(msg) | AppError::Conflict(msg) | AppError::Internal(msg) => {
                ApiError::new(msg)
            }
            AppError::Unauthorized => ApiError::new("Unauthorized"),
        };

        (status, Json(error)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => AppError::BadRequest(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::Repository(e) => AppError::Internal(e.message().to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}
