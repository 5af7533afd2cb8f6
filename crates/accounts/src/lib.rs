//! `medirec-accounts` — account service and lifecycle manager.
//!
//! Operations over the user directory: registration, login, profile and
//! credential changes, and the guarded lifecycle state machine
//! (activate / deactivate / soft-delete / restore / hard-delete).

pub mod error;
pub mod lifecycle;
pub mod service;

pub use error::AccountError;
pub use lifecycle::LifecycleTransition;
pub use service::{
    AccountPage, AccountService, AccountUpdate, ListQuery, LoginOutcome, NewAccount,
};
