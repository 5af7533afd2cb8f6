//! In-memory directory.
//!
//! Intended for tests/dev. Not optimized for performance.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use medirec_core::UserId;

use crate::account::Account;
use crate::contract::{DirectoryError, UniqueField, UserDirectory};
use crate::filter::{ListFilter, PageRequest, SortBy, SortDir};

/// In-memory [`UserDirectory`] backed by a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    accounts: RwLock<HashMap<UserId, Account>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<UserId, Account>>, DirectoryError>
    {
        self.accounts
            .read()
            .map_err(|_| DirectoryError::Unavailable("lock poisoned".to_string()))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<UserId, Account>>, DirectoryError> {
        self.accounts
            .write()
            .map_err(|_| DirectoryError::Unavailable("lock poisoned".to_string()))
    }

    /// Uniqueness spans live and soft-deleted records, so a restore can never
    /// resurrect a colliding identity.
    fn check_unique(
        accounts: &HashMap<UserId, Account>,
        candidate: &Account,
        exclude: Option<UserId>,
    ) -> Result<(), DirectoryError> {
        for existing in accounts.values() {
            if Some(existing.id) == exclude {
                continue;
            }
            if existing.username == candidate.username {
                return Err(DirectoryError::Conflict(UniqueField::Username));
            }
            if existing.email == candidate.email {
                return Err(DirectoryError::Conflict(UniqueField::Email));
            }
            if existing.phone == candidate.phone {
                return Err(DirectoryError::Conflict(UniqueField::Phone));
            }
        }
        Ok(())
    }

    fn matches(filter: &ListFilter, account: &Account) -> bool {
        if let Some(search) = &filter.search {
            let needle = search.to_lowercase();
            let hit = account.username.to_lowercase().contains(&needle)
                || account.email.to_lowercase().contains(&needle)
                || account.phone.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if let Some(role) = filter.role {
            if account.role != role {
                return false;
            }
        }
        if let Some(active) = filter.active {
            if account.active != active {
                return false;
            }
        }
        true
    }

    fn select(
        &self,
        deleted: bool,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<(Vec<Account>, u64), DirectoryError> {
        let accounts = self.read()?;

        let mut hits: Vec<Account> = accounts
            .values()
            .filter(|a| a.deleted_at.is_some() == deleted)
            .filter(|a| Self::matches(filter, a))
            .cloned()
            .collect();

        hits.sort_by(|a, b| {
            let ord = match page.sort_by {
                SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                SortBy::Username => a.username.cmp(&b.username),
                SortBy::Email => a.email.cmp(&b.email),
                SortBy::DeletedAt => a.deleted_at.cmp(&b.deleted_at),
            };
            match page.sort_dir {
                SortDir::Asc => ord,
                SortDir::Desc => ord.reverse(),
            }
        });

        let total = hits.len() as u64;
        let page_items: Vec<Account> = hits
            .into_iter()
            .skip(page.offset())
            .take(page.page_size as usize)
            .collect();

        Ok((page_items, total))
    }
}

impl UserDirectory for InMemoryDirectory {
    fn create(&self, account: Account) -> Result<Account, DirectoryError> {
        let mut accounts = self.write()?;
        Self::check_unique(&accounts, &account, None)?;
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    fn find_by_id(&self, id: UserId) -> Result<Account, DirectoryError> {
        let accounts = self.read()?;
        accounts
            .get(&id)
            .filter(|a| a.is_live())
            .cloned()
            .ok_or(DirectoryError::NotFound)
    }

    fn find_by_username_or_email(&self, value: &str) -> Result<Account, DirectoryError> {
        let accounts = self.read()?;
        accounts
            .values()
            .find(|a| a.is_live() && (a.username == value || a.email == value))
            .cloned()
            .ok_or(DirectoryError::NotFound)
    }

    fn exists_by_username(
        &self,
        username: &str,
        exclude: Option<UserId>,
    ) -> Result<bool, DirectoryError> {
        let accounts = self.read()?;
        Ok(accounts
            .values()
            .any(|a| Some(a.id) != exclude && a.username == username))
    }

    fn exists_by_email(
        &self,
        email: &str,
        exclude: Option<UserId>,
    ) -> Result<bool, DirectoryError> {
        let accounts = self.read()?;
        Ok(accounts
            .values()
            .any(|a| Some(a.id) != exclude && a.email == email))
    }

    fn exists_by_phone(
        &self,
        phone: &str,
        exclude: Option<UserId>,
    ) -> Result<bool, DirectoryError> {
        let accounts = self.read()?;
        Ok(accounts
            .values()
            .any(|a| Some(a.id) != exclude && a.phone == phone))
    }

    fn update(&self, account: &Account) -> Result<(), DirectoryError> {
        let mut accounts = self.write()?;

        if !accounts.get(&account.id).is_some_and(|a| a.is_live()) {
            return Err(DirectoryError::NotFound);
        }

        Self::check_unique(&accounts, account, Some(account.id))?;
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    fn soft_delete(&self, id: UserId, at: DateTime<Utc>) -> Result<(), DirectoryError> {
        let mut accounts = self.write()?;
        match accounts.get_mut(&id) {
            Some(account) if account.is_live() => {
                account.deleted_at = Some(at);
                Ok(())
            }
            _ => Err(DirectoryError::NotFound),
        }
    }

    fn hard_delete(&self, id: UserId) -> Result<(), DirectoryError> {
        let mut accounts = self.write()?;
        accounts.remove(&id);
        Ok(())
    }

    fn restore(&self, id: UserId) -> Result<(), DirectoryError> {
        let mut accounts = self.write()?;
        match accounts.get_mut(&id) {
            Some(account) if account.deleted_at.is_some() => {
                account.deleted_at = None;
                Ok(())
            }
            _ => Err(DirectoryError::NotFound),
        }
    }

    fn list(
        &self,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<(Vec<Account>, u64), DirectoryError> {
        self.select(false, filter, page)
    }

    fn list_deleted(
        &self,
        filter: &ListFilter,
        page: &PageRequest,
    ) -> Result<(Vec<Account>, u64), DirectoryError> {
        self.select(true, filter, page)
    }
}
