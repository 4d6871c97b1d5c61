//! Authentication extractors.
//!
//! Resolves an `Authorization: Bearer <token>` header to an account ID.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use cpath_core::AccountId;

use crate::error::{AppError, set_sentry_user};
use crate::services::auth::TokenError;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// Rejects with 401 if the header is missing, the scheme is wrong, or the
/// token is invalid or expired. Whether the account still exists is left
/// to the handler.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(account_id): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, account {account_id}!")
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAuth(pub AccountId);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(TokenError::Missing)?;
        let token = bearer_token(header.to_str().map_err(|_| TokenError::Malformed)?)?;

        let account_id = state.account_service().verify_token(token)?;
        set_sentry_user(&account_id);
        tracing::Span::current().record("account_id", tracing::field::display(account_id));

        Ok(Self(account_id))
    }
}

/// Split the token out of an `Authorization` header value.
///
/// The scheme is matched case-insensitively.
fn bearer_token(value: &str) -> Result<&str, TokenError> {
    let (scheme, token) = value.trim().split_once(' ').ok_or(TokenError::Malformed)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(TokenError::Malformed);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Malformed);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def").ok(), Some("abc.def"));
        assert_eq!(bearer_token("bearer abc").ok(), Some("abc"));
        assert_eq!(bearer_token("BEARER  abc ").ok(), Some("abc"));
    }

    #[test]
    fn test_bearer_token_rejects_other_shapes() {
        assert!(matches!(bearer_token("abc"), Err(TokenError::Malformed)));
        assert!(matches!(
            bearer_token("Basic dXNlcjpwdw=="),
            Err(TokenError::Malformed)
        ));
        assert!(matches!(bearer_token("Bearer "), Err(TokenError::Malformed)));
        assert!(matches!(bearer_token(""), Err(TokenError::Malformed)));
    }
}
