//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Every error becomes a JSON
//! body of the form `{"message": "..."}`; server-side failures are logged and
//! captured to Sentry, and their details never reach the client. Malformed
//! bodies and query strings reach this type through the extractors in
//! [`crate::extract`].

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use yamweb_core::{EmailError, IdError};

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::listing::ListParamsError;

/// Body message for 401 responses.
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized access";

/// Body message for 403 responses.
pub const FORBIDDEN_MESSAGE: &str = "forbidden access";

const INTERNAL_MESSAGE: &str = "internal server error";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Session issue or check failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<IdError> for AppError {
    fn from(err: IdError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<ListParamsError> for AppError {
    fn from(err: ListParamsError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<EmailError> for AppError {
    fn from(err: EmailError) -> Self {
        Self::Auth(AuthError::InvalidEmail(err))
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Auth(err) => match err {
                AuthError::MissingCredential
                | AuthError::InvalidCredential(_)
                | AuthError::InvalidIdentity(_) => StatusCode::UNAUTHORIZED,
                AuthError::Forbidden => StatusCode::FORBIDDEN,
                AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) | Self::Auth(AuthError::TokenIssue(_)) => {
                INTERNAL_MESSAGE.to_string()
            }
            Self::Auth(AuthError::Forbidden) => FORBIDDEN_MESSAGE.to_string(),
            Self::Auth(AuthError::InvalidEmail(err)) => format!("invalid email: {err}"),
            Self::Auth(_) => UNAUTHORIZED_MESSAGE.to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "message": self.message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::from(AuthError::MissingCredential).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::Forbidden).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(EmailError::MissingAtSymbol).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(IdError::InvalidCharacter(3)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(RepositoryError::DataCorruption("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_unauthorized_body() {
        let (status, body) = body_of(AuthError::MissingCredential.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "unauthorized access" }));
    }

    #[tokio::test]
    async fn test_forbidden_body() {
        let (status, body) = body_of(AuthError::Forbidden.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "message": "forbidden access" }));
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let err = AppError::Internal("connection string leaked here".to_string());
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "internal server error" }));
    }
}
