//! `medirec-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it hashes and
//! verifies credentials, issues and verifies bearer tokens, and evaluates
//! authorization policies over a request-scoped [`AuthContext`].

pub mod authn;
pub mod context;
pub mod password;
pub mod policy;
pub mod roles;
pub mod token;

pub use authn::{AuthnError, authenticate};
pub use context::AuthContext;
pub use password::CodecError;
pub use policy::{AuthzError, Policy, authorize};
pub use roles::{ADMIN_ROLES, Role, UnknownRole};
pub use token::{Claims, IssuedToken, TokenError};
