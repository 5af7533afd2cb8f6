//! Authentication evaluator: bearer header to [`AuthContext`].

use thiserror::Error;

use crate::{AuthContext, TokenError, token};

/// Why a request could not be authenticated.
///
/// Callers collapse every variant into a single "unauthenticated" outcome;
/// the distinction exists for logging and tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthnError {
    #[error("authorization credential is missing")]
    MissingCredential,

    #[error("invalid authorization header format")]
    InvalidScheme,

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Authenticate a request from its `Authorization` header value.
///
/// The recognized format is exactly `Bearer <token>`.
pub fn authenticate(header_value: &str, secret: &str) -> Result<AuthContext, AuthnError> {
    let value = header_value.trim();
    if value.is_empty() {
        return Err(AuthnError::MissingCredential);
    }

    let (scheme, token) = value.split_once(' ').ok_or(AuthnError::InvalidScheme)?;
    if scheme != "Bearer" {
        return Err(AuthnError::InvalidScheme);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthnError::MissingCredential);
    }

    let claims = token::verify(token, secret)?;
    Ok(AuthContext::from_claims(&claims))
}
