//! Account service error taxonomy.

use thiserror::Error;

use medirec_auth::{CodecError, TokenError};
use medirec_directory::{DirectoryError, UniqueField};

/// Failure of an account operation.
///
/// Messages are stable and non-enumerating: a credential failure never says
/// whether the identifier or the password was wrong.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// Login or re-proof failed. Covers unknown identifier, wrong password,
    /// and a soft-deleted account at the login path.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account is administratively suspended; login is refused before
    /// the password is even checked.
    #[error("account is inactive")]
    Inactive,

    /// Authenticated, but not permitted to perform the operation.
    #[error("access denied: insufficient permissions")]
    Forbidden,

    #[error("account not found")]
    NotFound,

    /// Uniqueness violation on username/email/phone. Never retried
    /// automatically; a conflict cannot resolve without caller input.
    #[error("{0} already exists")]
    Conflict(UniqueField),

    #[error("validation failed: {0}")]
    Validation(String),

    /// Hashing subsystem failure. Fatal for the request; never downgraded
    /// to a false verification.
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

impl AccountError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<DirectoryError> for AccountError {
    fn from(value: DirectoryError) -> Self {
        match value {
            DirectoryError::NotFound => AccountError::NotFound,
            DirectoryError::Conflict(field) => AccountError::Conflict(field),
            DirectoryError::Unavailable(msg) => AccountError::Unavailable(msg),
        }
    }
}
