/*
 * Responsibility
 * - the single error type every handler and middleware returns (AppError)
 * - IntoResponse: HTTP status + `{ "error": { "code", "message" } }` body
 * - conversions from repo / auth errors so handlers can use `?`
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthRejection;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    BadRequest { code: &'static str, message: String },
    #[error("No authentication token, access denied")]
    NoToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Token is valid, but user not found")]
    UserNotFound,
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("User not authorized to {action} this {resource}")]
    Forbidden {
        action: &'static str,
        resource: &'static str,
    },
    #[error("{0}")]
    Conflict(String),
    #[error("request timed out")]
    Timeout,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::bad_request("VALIDATION_ERROR", message)
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn forbidden(action: &'static str, resource: &'static str) -> Self {
        Self::Forbidden { action, resource }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NoToken
            | AppError::InvalidToken
            | AppError::TokenExpired
            | AppError::UserNotFound => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest { code, .. } => code,
            AppError::NoToken => "NO_TOKEN",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::TokenExpired => "TOKEN_EXPIRED",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::Forbidden { .. } => "FORBIDDEN",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Timeout => "REQUEST_TIMEOUT",
            AppError::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict(what) => AppError::Conflict(format!("{what} already exists")),
            RepoError::Db(err) => {
                // detail stays in the log; the client only sees the generic message
                tracing::error!(error = %err, "store operation failed");
                AppError::Internal
            }
        }
    }
}

impl From<AuthRejection> for AppError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::NoToken => AppError::NoToken,
            AuthRejection::InvalidToken => AppError::InvalidToken,
            AuthRejection::TokenExpired => AppError::TokenExpired,
            AuthRejection::UserNotFound => AppError::UserNotFound,
            AuthRejection::Internal => AppError::Internal,
        }
    }
}
