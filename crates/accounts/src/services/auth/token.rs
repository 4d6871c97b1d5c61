//! Bearer token issuing and verification (HS256 JWT).

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cpath_core::AccountId;

/// How long an issued token stays valid.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// Reasons a bearer token cannot be issued or accepted.
#[derive(Debug, Error)]
pub enum TokenError {
    /// No `Authorization` header was sent.
    #[error("missing bearer token")]
    Missing,

    /// The `Authorization` header is not `Bearer <token>`.
    #[error("malformed authorization header")]
    Malformed,

    /// Bad signature, bad structure or unknown subject.
    #[error("invalid token")]
    Invalid,

    /// The token is past its expiry.
    #[error("token expired")]
    Expired,

    /// The token could not be signed.
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Claims carried by an issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID.
    pub sub: String,
    /// Issued at (seconds since epoch).
    pub iat: i64,
    /// Expires at (seconds since epoch).
    pub exp: i64,
}

/// Signs and validates account tokens with a shared secret.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl TokenIssuer {
    /// Create an issuer from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let secret = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: TimeDelta::seconds(TOKEN_TTL_SECS),
        }
    }

    /// Issue a token for an account, valid for one hour from now.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, account_id: AccountId) -> Result<String, TokenError> {
        self.issue_at(account_id, Utc::now())
    }

    /// Issue a token as if it had been issued at `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue_at(
        &self,
        account_id: AccountId,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: account_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)
    }

    /// Validate a token and return the account it names.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` past expiry and `TokenError::Invalid` for
    /// anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<AccountId, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;

        data.claims
            .sub
            .parse::<AccountId>()
            .map_err(|_| TokenError::Invalid)
    }
}
