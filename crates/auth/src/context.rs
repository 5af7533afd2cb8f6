//! Request-scoped authorization context.

use chrono::{DateTime, Utc};

use medirec_core::UserId;

use crate::{Claims, Role};

/// Authenticated identity for one request.
///
/// Constructed only from verified claims, read-only to downstream policy
/// evaluators and handlers, and threaded explicitly through call signatures,
/// never looked up by string key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    subject: UserId,
    username: String,
    email: String,
    role: Role,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl AuthContext {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            subject: claims.sub,
            username: claims.username.clone(),
            email: claims.email.clone(),
            role: claims.role,
            issued_at: claims.issued_at(),
            expires_at: claims.expires_at(),
        }
    }

    pub fn subject(&self) -> UserId {
        self.subject
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Admin or super-admin.
    pub fn is_privileged(&self) -> bool {
        self.role.is_privileged()
    }
}
