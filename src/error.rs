/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - identity authority 由来の詳細は外に出さない (generic message のみ)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// No `Authorization` header (or an empty one). Answered without a body.
    #[error("missing credential")]
    MissingCredential,
    #[error("Invalid session token")]
    InvalidCredential,
    /// `Origin` header outside the CORS allowlist. Answered without a body.
    #[error("origin not allowed")]
    ForbiddenOrigin,
    #[error("Error retrieving user")]
    ProfileRetrieval,
    #[error("Request timeout")]
    RequestTimeout,
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::MissingCredential => return StatusCode::UNAUTHORIZED.into_response(),
            AppError::ForbiddenOrigin => return StatusCode::FORBIDDEN.into_response(),
            AppError::InvalidCredential => (StatusCode::UNAUTHORIZED, "Invalid session token"),
            AppError::ProfileRetrieval => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving user")
            }
            AppError::RequestTimeout => (StatusCode::REQUEST_TIMEOUT, "Request timeout"),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
