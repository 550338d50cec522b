//! Error handling module
//!
//! Provides unified error types and handling for the entire application.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("incorrect username or password")]
    InvalidCredentials,

    #[error("token could not be decoded: {0}")]
    TokenDecode(String),

    #[error("token subject no longer exists")]
    SubjectNotFound,

    #[error("required scope missing from token")]
    ScopeDenied,

    #[error("role requirement not satisfied")]
    RoleDenied,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Incorrect username or password".to_string(),
                None,
            ),
            AppError::TokenDecode(detail) => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_DECODE",
                "Could not validate credentials".to_string(),
                Some(detail.clone()),
            ),
            AppError::SubjectNotFound => (
                StatusCode::UNAUTHORIZED,
                "SUBJECT_NOT_FOUND",
                "Could not validate credentials".to_string(),
                None,
            ),
            AppError::ScopeDenied => (
                StatusCode::UNAUTHORIZED,
                "SCOPE_DENIED",
                "Not enough permissions".to_string(),
                None,
            ),
            AppError::RoleDenied => (
                StatusCode::UNAUTHORIZED,
                "ROLE_DENIED",
                "Not authorized".to_string(),
                None,
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
                None,
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                msg.clone(),
                None,
            ),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::Config(msg) => {
                error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIG_ERROR",
                    "A configuration error occurred".to_string(),
                    Some(msg.clone()),
                )
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            error: details,
            code: Some(error_code.to_string()),
        });

        let mut response = (status, body).into_response();

        // Bearer challenge on every authorization failure
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;
