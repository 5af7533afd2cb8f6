//! Authorization policy evaluators.
//!
//! Each operation declares a policy; the evaluator is a pure function over
//! the request's [`AuthContext`] and parameters:
//!
//! - No IO
//! - No panics
//! - No business logic (pure policy check)
//!
//! The first failing evaluator in a route's sequence determines the outcome;
//! nothing here mutates state.

use core::str::FromStr;

use thiserror::Error;

use medirec_core::UserId;

use crate::{AuthContext, Role};

/// Per-operation authorization policy.
///
/// `resource` is the raw path-addressed identifier of the target account;
/// parsing it is part of the evaluation (an unparseable identifier is a
/// `BadRequest`, not a `Forbidden`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy<'a> {
    /// Caller's role must be a member of the set.
    RoleIn(&'a [Role]),
    /// Caller must own the addressed resource; admin/super-admin bypass.
    Owner { resource: &'a str },
    /// Role membership OR ownership, whichever holds.
    OwnerOrRoleIn {
        roles: &'a [Role],
        resource: &'a str,
    },
    /// Strict ownership with no role bypass.
    SelfOnly { resource: &'a str },
}

/// Terminal decision of a failed policy evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("access denied: insufficient permissions")]
    Forbidden,

    #[error("invalid resource identifier")]
    BadRequest,
}

/// Evaluate a policy for an authenticated caller.
pub fn authorize(ctx: &AuthContext, policy: &Policy<'_>) -> Result<(), AuthzError> {
    match policy {
        Policy::RoleIn(roles) => role_in(ctx, roles),
        Policy::Owner { resource } => {
            if ctx.is_privileged() {
                return Ok(());
            }
            owns(ctx, resource)
        }
        Policy::OwnerOrRoleIn { roles, resource } => {
            if roles.contains(&ctx.role()) {
                return Ok(());
            }
            owns(ctx, resource)
        }
        Policy::SelfOnly { resource } => owns(ctx, resource),
    }
}

fn role_in(ctx: &AuthContext, roles: &[Role]) -> Result<(), AuthzError> {
    if roles.contains(&ctx.role()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden)
    }
}

fn owns(ctx: &AuthContext, resource: &str) -> Result<(), AuthzError> {
    let target = UserId::from_str(resource).map_err(|_| AuthzError::BadRequest)?;
    if ctx.subject() == target {
        Ok(())
    } else {
        Err(AuthzError::Forbidden)
    }
}
