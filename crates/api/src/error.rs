//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; the response body is always `{ "message": ... }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("Store error: {0}")]
    Repository(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// The request carries no usable identity.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// JSON error body, the shape every client of this API expects.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Repository(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Validation(_)
                | RepositoryError::InsufficientPoints { .. }
                | RepositoryError::EmptyCart => StatusCode::BAD_REQUEST,
                RepositoryError::Conflict(_)
                | RepositoryError::InvalidTransition { .. }
                | RepositoryError::RewardInactive => StatusCode::CONFLICT,
                RepositoryError::Forbidden(_) => StatusCode::FORBIDDEN,
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::AccountDeactivated => StatusCode::FORBIDDEN,
                AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        };

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Auth(AuthError::PasswordHash) => "Internal server error".to_owned(),
            Self::Repository(err) => err.to_string(),
            Self::Auth(err) => err.to_string(),
            Self::Unauthorized(message) => message.clone(),
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Repository(RepositoryError::EmptyCart);
        assert_eq!(err.to_string(), "Store error: order has no items");

        let err = AppError::Unauthorized("login required".to_string());
        assert_eq!(err.to_string(), "Unauthorized: login required");
    }

    #[test]
    fn test_repository_error_status_codes() {
        assert_eq!(
            get_status(RepositoryError::NotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(RepositoryError::Validation("price".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(
                RepositoryError::InsufficientPoints {
                    balance: 40,
                    requested: -50
                }
                .into()
            ),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(RepositoryError::EmptyCart.into()), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_status(RepositoryError::Conflict("email taken".to_string()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(
                RepositoryError::InvalidTransition {
                    from: levelup_core::OrderStatus::Delivered,
                    to: levelup_core::OrderStatus::Pending
                }
                .into()
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(RepositoryError::RewardInactive.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(RepositoryError::Forbidden("primary admin".to_string()).into()),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            get_status(AuthError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AuthError::AccountDeactivated.into()),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AuthError::WeakPassword("too short".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AuthError::PasswordHash.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Unauthorized("login required".to_string())),
            StatusCode::UNAUTHORIZED
        );
    }
}
