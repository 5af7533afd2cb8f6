//! Session token issuer/verifier.
//!
//! Tokens are stateless HS256 JWTs: header, claims payload, signature over
//! both. Verification needs only the process-wide secret, so there is no
//! server-side session store and no revocation before natural expiry (a
//! rotation of the secret invalidates everything outstanding).

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use medirec_core::UserId;

use crate::Role;

/// Identity claims embedded in a token. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the account the token attests.
    pub sub: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expires-at, seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0).single().unwrap_or_default()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }
}

/// Token verification/issuance failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token could not be parsed or decoded.
    #[error("malformed token")]
    Malformed,

    /// The signature does not match the configured secret.
    #[error("invalid token signature")]
    BadSignature,

    /// Current time is at or past the embedded expiry.
    #[error("token has expired")]
    Expired,

    /// The signing step itself failed.
    #[error("token could not be signed")]
    Signing,
}

/// A freshly issued token plus its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issue a token for the given identity, valid for `ttl` from now.
pub fn issue(
    sub: UserId,
    username: &str,
    email: &str,
    role: Role,
    secret: &str,
    ttl: Duration,
) -> Result<IssuedToken, TokenError> {
    let now = Utc::now();
    let expires_at = now + ttl;

    let claims = Claims {
        sub,
        username: username.to_string(),
        email: email.to_string(),
        role,
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| TokenError::Signing)?;

    Ok(IssuedToken { token, expires_at })
}

/// Verify a token against the process-wide secret and return its claims.
///
/// A token is valid only if the signature verifies AND the current time is
/// strictly before the expiry timestamp. No leeway.
pub fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::BadSignature,
        _ => TokenError::Malformed,
    })?;

    // The library treats exp == now as still valid; the contract here is
    // "valid strictly before expiry".
    if Utc::now().timestamp() >= data.claims.exp {
        return Err(TokenError::Expired);
    }

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const SECRET: &str = "unit-test-secret";

    fn sample_identity() -> (UserId, &'static str, &'static str, Role) {
        (UserId::new(), "alice", "alice@example.com", Role::Doctor)
    }

    #[test]
    fn issue_then_verify_returns_claims() {
        let (sub, username, email, role) = sample_identity();
        let issued = issue(sub, username, email, role, SECRET, Duration::hours(1)).unwrap();

        let claims = verify(&issued.token, SECRET).unwrap();
        assert_eq!(claims.sub, sub);
        assert_eq!(claims.username, username);
        assert_eq!(claims.email, email);
        assert_eq!(claims.role, role);
        assert_eq!(claims.expires_at(), issued.expires_at.with_nanosecond(0).unwrap());
    }

    #[test]
    fn wrong_secret_is_bad_signature() {
        let (sub, username, email, role) = sample_identity();
        let issued = issue(sub, username, email, role, SECRET, Duration::hours(1)).unwrap();

        let err = verify(&issued.token, "a-different-secret").unwrap_err();
        assert_eq!(err, TokenError::BadSignature);
    }

    #[test]
    fn elapsed_ttl_is_expired() {
        let (sub, username, email, role) = sample_identity();
        let issued = issue(sub, username, email, role, SECRET, Duration::seconds(-5)).unwrap();

        let err = verify(&issued.token, SECRET).unwrap_err();
        assert_eq!(err, TokenError::Expired);
    }

    #[test]
    fn zero_ttl_is_already_expired() {
        // Valid strictly before expiry: exp == now must fail.
        let (sub, username, email, role) = sample_identity();
        let issued = issue(sub, username, email, role, SECRET, Duration::zero()).unwrap();

        let err = verify(&issued.token, SECRET).unwrap_err();
        assert_eq!(err, TokenError::Expired);
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(verify("", SECRET).unwrap_err(), TokenError::Malformed);
        assert_eq!(
            verify("not.a.jwt", SECRET).unwrap_err(),
            TokenError::Malformed
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 64,
                ..ProptestConfig::default()
            })]

            /// Property: verify(issue(c, s), s) = c before expiry.
            #[test]
            fn round_trip_preserves_claims(
                username in "[a-z0-9_]{3,30}",
                email in "[a-z0-9]{1,20}@[a-z]{1,10}\\.[a-z]{2,4}",
                secret in "[!-~]{8,64}",
                role_idx in 0usize..5
            ) {
                let sub = UserId::new();
                let role = Role::ALL[role_idx];
                let issued =
                    issue(sub, &username, &email, role, &secret, Duration::hours(1)).unwrap();

                let claims = verify(&issued.token, &secret).unwrap();
                prop_assert_eq!(claims.sub, sub);
                prop_assert_eq!(claims.username, username);
                prop_assert_eq!(claims.email, email);
                prop_assert_eq!(claims.role, role);
            }
        }
    }
}
