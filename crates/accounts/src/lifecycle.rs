//! Account lifecycle state machine: transitions and their guards.
//!
//! Destructive self-service transitions (deactivate, soft-delete) require the
//! caller to re-prove their password even though they already hold a valid
//! session; a hijacked token alone must not be enough to destroy an account.

use medirec_auth::{AuthContext, Role};
use medirec_core::UserId;

use crate::error::AccountError;

/// Requested lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleTransition {
    /// Inactive → Active. Admin/super-admin only.
    Activate,
    /// Active → Inactive. Self (with re-proof) or admin/super-admin.
    Deactivate,
    /// Live → soft-deleted. Self (with re-proof) or admin/super-admin.
    SoftDelete,
    /// Soft-deleted → live. Admin/super-admin only; the prior `active` flag
    /// is preserved, not reset.
    Restore,
    /// Any → purged. Super-admin only, irreversible.
    HardDelete,
}

impl LifecycleTransition {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleTransition::Activate => "activate",
            LifecycleTransition::Deactivate => "deactivate",
            LifecycleTransition::SoftDelete => "soft_delete",
            LifecycleTransition::Restore => "restore",
            LifecycleTransition::HardDelete => "hard_delete",
        }
    }
}

impl core::fmt::Display for LifecycleTransition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the role/ownership half of the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Clearance {
    /// The actor's role alone authorizes the transition.
    Granted,
    /// The actor is the target and must additionally re-prove their password.
    SelfWithProof,
}

/// Evaluate who may drive a transition, before any password re-proof.
///
/// Pure read over the actor context; performs no mutation.
pub(crate) fn clearance(
    actor: &AuthContext,
    target: UserId,
    transition: LifecycleTransition,
) -> Result<Clearance, AccountError> {
    match transition {
        LifecycleTransition::Activate | LifecycleTransition::Restore => {
            if actor.is_privileged() {
                Ok(Clearance::Granted)
            } else {
                Err(AccountError::Forbidden)
            }
        }
        LifecycleTransition::HardDelete => {
            if actor.role() == Role::SuperAdmin {
                Ok(Clearance::Granted)
            } else {
                Err(AccountError::Forbidden)
            }
        }
        LifecycleTransition::Deactivate | LifecycleTransition::SoftDelete => {
            if actor.is_privileged() {
                Ok(Clearance::Granted)
            } else if actor.subject() == target {
                Ok(Clearance::SelfWithProof)
            } else {
                Err(AccountError::Forbidden)
            }
        }
    }
}
