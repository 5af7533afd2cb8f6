//! The User Directory Contract.
//!
//! Everything the credential/permission core needs from persistence, and
//! nothing more. Implementations are expected to serialize uniqueness checks
//! and lifecycle transitions for the same account (unique constraints,
//! row-level locking); the core never retries a conflict on its own.

use chrono::{DateTime, Utc};
use thiserror::Error;

use medirec_core::UserId;

use crate::account::Account;
use crate::filter::{ListFilter, PageRequest};

/// Which unique column a conflicting write collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
    Phone,
}

impl UniqueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
            UniqueField::Phone => "phone",
        }
    }
}

impl core::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directory failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The account does not exist, or is soft-deleted where a live-only
    /// lookup is required.
    #[error("account not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("{0} already exists")]
    Conflict(UniqueField),

    /// The store itself failed (connection, poisoned lock, ...).
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Abstract account store.
///
/// Lookups other than the explicitly deleted-scoped ones see **live records
/// only**: a soft-deleted account behaves as nonexistent. Calls are
/// synchronous from the core's perspective; implementations may delegate to a
/// worker pool without changing observable semantics.
pub trait UserDirectory: Send + Sync {
    /// Insert a new account. Uniqueness of username/email/phone is enforced
    /// here across live and soft-deleted records.
    fn create(&self, account: Account) -> Result<Account, DirectoryError>;

    fn find_by_id(&self, id: UserId) -> Result<Account, DirectoryError>;

    /// Login-path lookup: matches either username or email, exactly.
    fn find_by_username_or_email(&self, value: &str) -> Result<Account, DirectoryError>;

    /// Collision checks. `exclude` skips the record's own id on update.
    fn exists_by_username(
        &self,
        username: &str,
        exclude: Option<UserId>,
    ) -> Result<bool, DirectoryError>;
    fn exists_by_email(&self, email: &str, exclude: Option<UserId>)
    -> Result<bool, DirectoryError>;
    fn exists_by_phone(&self, phone: &str, exclude: Option<UserId>)
    -> Result<bool, DirectoryError>;

    /// Overwrite a live account by id, re-enforcing uniqueness.
    fn update(&self, account: &Account) -> Result<(), DirectoryError>;

    /// Mark a live account deleted at `at`.
    fn soft_delete(&self, id: UserId, at: DateTime<Utc>) -> Result<(), DirectoryError>;

    /// Purge the record entirely. Idempotent: a missing id is a success.
    fn hard_delete(&self, id: UserId) -> Result<(), DirectoryError>;

    /// Clear the deletion timestamp of a soft-deleted account. Does not touch
    /// the `active` flag.
    fn restore(&self, id: UserId) -> Result<(), DirectoryError>;

    /// Page over live accounts; returns the page plus the pre-page total.
    fn list(
        &self,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<(Vec<Account>, u64), DirectoryError>;

    /// Page over soft-deleted accounts only.
    fn list_deleted(
        &self,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<(Vec<Account>, u64), DirectoryError>;
}

impl<D: UserDirectory + ?Sized> UserDirectory for std::sync::Arc<D> {
    fn create(&self, account: Account) -> Result<Account, DirectoryError> {
        (**self).create(account)
    }

    fn find_by_id(&self, id: UserId) -> Result<Account, DirectoryError> {
        (**self).find_by_id(id)
    }

    fn find_by_username_or_email(&self, value: &str) -> Result<Account, DirectoryError> {
        (**self).find_by_username_or_email(value)
    }

    fn exists_by_username(
        &self,
        username: &str,
        exclude: Option<UserId>,
    ) -> Result<bool, DirectoryError> {
        (**self).exists_by_username(username, exclude)
    }

    fn exists_by_email(
        &self,
        email: &str,
        exclude: Option<UserId>,
    ) -> Result<bool, DirectoryError> {
        (**self).exists_by_email(email, exclude)
    }

    fn exists_by_phone(
        &self,
        phone: &str,
        exclude: Option<UserId>,
    ) -> Result<bool, DirectoryError> {
        (**self).exists_by_phone(phone, exclude)
    }

    fn update(&self, account: &Account) -> Result<(), DirectoryError> {
        (**self).update(account)
    }

    fn soft_delete(&self, id: UserId, at: DateTime<Utc>) -> Result<(), DirectoryError> {
        (**self).soft_delete(id, at)
    }

    fn hard_delete(&self, id: UserId) -> Result<(), DirectoryError> {
        (**self).hard_delete(id)
    }

    fn restore(&self, id: UserId) -> Result<(), DirectoryError> {
        (**self).restore(id)
    }

    fn list(
        &self,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<(Vec<Account>, u64), DirectoryError> {
        (**self).list(filter, page)
    }

    fn list_deleted(
        &self,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<(Vec<Account>, u64), DirectoryError> {
        (**self).list_deleted(filter, page)
    }
}
