//! # HTTP Errors
//!
//! Errors that end a request early. Every variant renders as
//! `{ "success": false, "message": ... }`.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::AuthError;
use crate::store::StoreError;

/// Result type for route handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Request-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bearer token missing or not registered
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Request body is not valid JSON
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Missing required parameter
    #[error("Missing required parameter: {0}")]
    MissingParam(&'static str),

    /// Parameter present but malformed
    #[error("Invalid parameter {name}: {value}")]
    InvalidParam { name: &'static str, value: String },

    /// Unhandled database failure
    #[error("{0}")]
    Database(#[from] StoreError),

    /// Background task died
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(auth_err) => {
                StatusCode::from_u16(auth_err.status_code()).unwrap_or(StatusCode::UNAUTHORIZED)
            }
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingParam(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidParam { .. } => StatusCode::BAD_REQUEST,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// `{ success, message }` body shared by errors and write operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Auth(e) => tracing::warn!(reason = e.reason(), "request rejected"),
            ApiError::Database(e) => tracing::error!(error = %e, "unhandled database error"),
            ApiError::Internal(e) => tracing::error!(error = %e, "internal error"),
            other => tracing::debug!(error = %other, "bad request"),
        }

        let challenge = matches!(self, ApiError::Auth(_));
        let mut response = (status, Json(MessageResponse::failure(self.to_string()))).into_response();

        if challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(AuthError::InvalidToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::MissingParam("id").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidBody("eof".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::Database(sqlx::Error::RowNotFound)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal("join".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_rejection_has_challenge_header() {
        let response = ApiError::from(AuthError::MissingToken).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_message_response_serialization() {
        let json = serde_json::to_value(MessageResponse::ok("done")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "done"}));
    }
}
