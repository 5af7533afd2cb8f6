//! Account record.

use chrono::{DateTime, Utc};

use medirec_auth::Role;
use medirec_core::UserId;

/// Derived lifecycle position of an account.
///
/// Purged accounts have no state: the record no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Active,
    Inactive,
    SoftDeleted,
}

impl core::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LifecycleState::Active => write!(f, "active"),
            LifecycleState::Inactive => write!(f, "inactive"),
            LifecycleState::SoftDeleted => write!(f, "soft_deleted"),
        }
    }
}

/// A user account as stored in the directory.
///
/// # Invariants
/// - `username`, `email` and `phone` are globally unique (case-sensitive),
///   enforced by the directory; on update the record's own id is excluded
///   from the collision check.
/// - `password_hash` is opaque; plaintext is never stored or re-derivable.
/// - `deleted_at: None` means live; `Some` means soft-deleted and excluded
///   from normal lookups while retained for restore.
/// - `active` is independent of soft-deletion: a live record can be
///   administratively suspended without being deleted.
///
/// Deliberately not `Serialize`: response shapes are built explicitly at the
/// API boundary so the credential hash cannot leak by accident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        if self.deleted_at.is_some() {
            LifecycleState::SoftDeleted
        } else if self.active {
            LifecycleState::Active
        } else {
            LifecycleState::Inactive
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        let now = Utc::now();
        Account {
            id: UserId::new(),
            username: "carol".to_string(),
            email: "carol@example.com".to_string(),
            phone: "0811223344".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: Role::Patient,
            active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn lifecycle_state_derivation() {
        let mut a = account();
        assert_eq!(a.lifecycle_state(), LifecycleState::Active);

        a.active = false;
        assert_eq!(a.lifecycle_state(), LifecycleState::Inactive);

        // Soft-deletion dominates the active flag.
        a.deleted_at = Some(Utc::now());
        assert_eq!(a.lifecycle_state(), LifecycleState::SoftDeleted);
        assert!(!a.is_live());
    }
}
