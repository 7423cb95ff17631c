//! Error handling for the HTTP API server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    // Common error constructors
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert from core errors
impl From<campusbot_core::BotError> for ApiError {
    fn from(err: campusbot_core::BotError) -> Self {
        use campusbot_core::BotError;

        match err {
            BotError::Validation { message, reply } => {
                // The chat-facing rejection text is the more useful message
                // when one exists.
                ApiError::validation(reply.unwrap_or(message))
            }
            BotError::Permission { sender } => {
                ApiError::forbidden(format!("Sender '{}' is not the admin", sender))
            }
            BotError::Database { message, .. } => {
                ApiError::internal(format!("Database error: {}", message))
            }
            BotError::Delivery { message } => {
                ApiError::internal(format!("Delivery error: {}", message))
            }
            BotError::Parse(message) => ApiError::internal(format!("Parse error: {}", message)),
            BotError::Serialization(e) => {
                ApiError::internal(format!("Serialization error: {}", e))
            }
            BotError::Io(e) => ApiError::internal(format!("IO error: {}", e)),
            BotError::Internal(message) => ApiError::internal(message),
        }
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
