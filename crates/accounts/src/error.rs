//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. The mapping from error to
//! HTTP status and client-facing message lives here and nowhere else.
//! Bodies are always JSON `{"message": "..."}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::{AuthError, TokenError};

/// Application-level error type for the accounts API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Account or token operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Request body could not be read as the expected JSON.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        Self::Auth(AuthError::Token(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_)
                | AuthError::MissingField(_)
                | AuthError::InvalidCredentials
                | AuthError::AccountAlreadyExists => StatusCode::BAD_REQUEST,
                AuthError::AccountNotFound => StatusCode::NOT_FOUND,
                AuthError::Token(TokenError::Signing(_))
                | AuthError::Repository(_)
                | AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
                AuthError::Token(_) => StatusCode::UNAUTHORIZED,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message shown to the client.
    ///
    /// Internal details never leave the server.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::MissingField(field) => format!("{field} is required"),
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::AccountAlreadyExists => "User already exists".to_string(),
                AuthError::AccountNotFound => "User not found".to_string(),
                AuthError::Token(TokenError::Signing(_))
                | AuthError::Repository(_)
                | AuthError::PasswordHash => "Internal server error".to_string(),
                AuthError::Token(_) => "Unauthorized".to_string(),
            },
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (
            status,
            Json(ErrorBody {
                message: self.message(),
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from an account ID.
///
/// Call this once a request is authenticated to associate errors with accounts.
pub fn set_sentry_user(account_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(account_id.to_string()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;
    use crate::db::RepositoryError;

    fn status_of(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_taxonomy_status_table() {
        assert_eq!(
            status_of(AuthError::AccountAlreadyExists),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AuthError::InvalidCredentials),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AuthError::MissingField("email")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AuthError::AccountNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(TokenError::Missing), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(TokenError::Malformed), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(TokenError::Invalid), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(TokenError::Expired), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AuthError::PasswordHash),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AuthError::Repository(RepositoryError::DataCorruption(
                "x".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::from(AuthError::Repository(RepositoryError::DataCorruption(
            "row 7 broken".to_string(),
        )));
        assert_eq!(err.message(), "Internal server error");
    }

    #[tokio::test]
    async fn test_body_is_json_message() {
        let response = AppError::from(AuthError::AccountAlreadyExists).into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body, serde_json::json!({ "message": "User already exists" }));
    }
}
