//! Credential codec: one-way, salted password hashing.
//!
//! Hashes are Argon2id PHC strings. Verification is fail-closed: a malformed
//! stored hash verifies as non-matching rather than surfacing an error to the
//! login path.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use thiserror::Error;

/// Hashing subsystem failure.
///
/// Never produced on a simple mismatch; callers treat this as fatal for the
/// request rather than downgrading it to a failed verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("random source unavailable: {0}")]
    RandomSource(String),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Hash a plaintext password with a fresh per-hash salt.
///
/// Two hashes of the same plaintext differ (random 16-byte salt).
pub fn hash(plaintext: &str) -> Result<String, CodecError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|e| CodecError::RandomSource(e.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| CodecError::Hash(e.to_string()))?;

    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| CodecError::Hash(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Verify a candidate against a stored hash.
///
/// Returns `false` for a mismatch and for malformed stored hashes.
pub fn verify(stored: &str, candidate: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
