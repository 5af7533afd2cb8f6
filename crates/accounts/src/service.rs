//! Account service.
//!
//! All operations run against the abstract [`UserDirectory`]; the service
//! owns validation, credential hashing/verification, token issuance and the
//! lifecycle guard. It holds no mutable state of its own; the config it
//! carries is immutable after construction.

use chrono::{DateTime, Utc};

use medirec_auth::{AuthContext, Role, password, token};
use medirec_core::{AppConfig, UserId};
use medirec_directory::{
    Account, DirectoryError, ListFilter, PageMeta, PageRequest, SortBy, SortDir, UserDirectory,
};

use crate::error::AccountError;
use crate::lifecycle::{Clearance, LifecycleTransition, clearance};

/// Input for registration and admin-initiated creation.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// Defaults to [`Role::Patient`].
    pub role: Option<Role>,
    /// Honored only on the admin creation path; registration is always active.
    pub active: Option<bool>,
}

/// Partial profile update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

/// Raw, not-yet-normalized listing query.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
    pub sort_by: Option<SortBy>,
    pub sort_dir: Option<SortDir>,
}

/// One page of accounts plus pagination metadata.
#[derive(Debug, Clone)]
pub struct AccountPage {
    pub items: Vec<Account>,
    pub meta: PageMeta,
}

/// Successful login: a bearer token and the authenticated profile.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub account: Account,
}

/// Account operations over a [`UserDirectory`].
#[derive(Debug)]
pub struct AccountService<D> {
    directory: D,
    config: AppConfig,
}

impl<D: UserDirectory> AccountService<D> {
    pub fn new(directory: D, config: AppConfig) -> Self {
        Self { directory, config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────
    // Registration / creation
    // ─────────────────────────────────────────────────────────────────────

    /// Self-registration. The account starts active; role defaults to patient.
    pub fn register(&self, new: NewAccount) -> Result<Account, AccountError> {
        self.admit(new, true)
    }

    /// Admin-initiated creation; may start the account inactive.
    pub fn create(&self, new: NewAccount) -> Result<Account, AccountError> {
        let active = new.active.unwrap_or(true);
        self.admit(new, active)
    }

    fn admit(&self, new: NewAccount, active: bool) -> Result<Account, AccountError> {
        validate_username(&new.username)?;
        validate_email(&new.email)?;
        validate_phone(&new.phone)?;
        validate_password(&new.password)?;

        self.ensure_unique(&new.username, &new.email, &new.phone, None)?;

        let password_hash = password::hash(&new.password)?;
        let now = Utc::now();

        let account = Account {
            id: UserId::new(),
            username: new.username,
            email: new.email,
            phone: new.phone,
            password_hash,
            role: new.role.unwrap_or_default(),
            active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let account = self.directory.create(account)?;
        tracing::info!(account = %account.id, role = %account.role, "account created");
        Ok(account)
    }

    fn ensure_unique(
        &self,
        username: &str,
        email: &str,
        phone: &str,
        exclude: Option<UserId>,
    ) -> Result<(), AccountError> {
        use medirec_directory::UniqueField;

        if self.directory.exists_by_username(username, exclude)? {
            return Err(AccountError::Conflict(UniqueField::Username));
        }
        if self.directory.exists_by_email(email, exclude)? {
            return Err(AccountError::Conflict(UniqueField::Email));
        }
        if self.directory.exists_by_phone(phone, exclude)? {
            return Err(AccountError::Conflict(UniqueField::Phone));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Authentication
    // ─────────────────────────────────────────────────────────────────────

    /// Authenticate by username-or-email and password, and issue a token.
    ///
    /// A soft-deleted account is indistinguishable from a nonexistent one
    /// here. An inactive account is refused before the password is checked.
    pub fn login(&self, identifier: &str, pass: &str) -> Result<LoginOutcome, AccountError> {
        let account = self
            .directory
            .find_by_username_or_email(identifier)
            .map_err(|e| match e {
                DirectoryError::NotFound => AccountError::InvalidCredentials,
                other => other.into(),
            })?;

        if !account.active {
            tracing::info!(account = %account.id, "login refused: inactive");
            return Err(AccountError::Inactive);
        }

        if !password::verify(&account.password_hash, pass) {
            tracing::info!(account = %account.id, "login refused: bad credential");
            return Err(AccountError::InvalidCredentials);
        }

        let issued = token::issue(
            account.id,
            &account.username,
            &account.email,
            account.role,
            &self.config.jwt.secret,
            self.config.jwt.ttl,
        )?;

        tracing::info!(account = %account.id, role = %account.role, "login succeeded");
        Ok(LoginOutcome {
            token: issued.token,
            expires_at: issued.expires_at,
            account,
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────

    pub fn get(&self, id: UserId) -> Result<Account, AccountError> {
        Ok(self.directory.find_by_id(id)?)
    }

    pub fn list(&self, query: ListQuery) -> Result<AccountPage, AccountError> {
        let (filter, page) = self.normalize(query, SortBy::CreatedAt);
        let (items, total) = self.directory.list(&filter, &page)?;
        Ok(AccountPage {
            items,
            meta: PageMeta::compute(&page, total),
        })
    }

    pub fn list_deleted(&self, query: ListQuery) -> Result<AccountPage, AccountError> {
        let (filter, page) = self.normalize(query, SortBy::DeletedAt);
        let (items, total) = self.directory.list_deleted(&filter, &page)?;
        Ok(AccountPage {
            items,
            meta: PageMeta::compute(&page, total),
        })
    }

    fn normalize(&self, query: ListQuery, default_sort: SortBy) -> (ListFilter, PageRequest) {
        let bounds = self.config.pagination;

        let page = query.page.unwrap_or(1).max(1);
        let mut page_size = query.page_size.unwrap_or(bounds.default_page_size);
        if page_size < 1 {
            page_size = bounds.default_page_size;
        }
        page_size = page_size.min(bounds.max_page_size);

        let filter = ListFilter {
            search: query.search.filter(|s| !s.is_empty()),
            role: query.role,
            active: query.active,
        };
        let page = PageRequest {
            page,
            page_size,
            sort_by: query.sort_by.unwrap_or(default_sort),
            sort_dir: query.sort_dir.unwrap_or_default(),
        };
        (filter, page)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────

    /// Apply a partial update, re-checking uniqueness for each changed
    /// identity field (excluding the record's own id).
    pub fn update(&self, id: UserId, update: AccountUpdate) -> Result<Account, AccountError> {
        use medirec_directory::UniqueField;

        let mut account = self.directory.find_by_id(id)?;

        if let Some(username) = update.username {
            if username != account.username {
                validate_username(&username)?;
                if self.directory.exists_by_username(&username, Some(id))? {
                    return Err(AccountError::Conflict(UniqueField::Username));
                }
                account.username = username;
            }
        }

        if let Some(email) = update.email {
            if email != account.email {
                validate_email(&email)?;
                if self.directory.exists_by_email(&email, Some(id))? {
                    return Err(AccountError::Conflict(UniqueField::Email));
                }
                account.email = email;
            }
        }

        if let Some(phone) = update.phone {
            if phone != account.phone {
                validate_phone(&phone)?;
                if self.directory.exists_by_phone(&phone, Some(id))? {
                    return Err(AccountError::Conflict(UniqueField::Phone));
                }
                account.phone = phone;
            }
        }

        if let Some(pass) = update.password {
            validate_password(&pass)?;
            account.password_hash = password::hash(&pass)?;
        }

        if let Some(role) = update.role {
            account.role = role;
        }

        if let Some(active) = update.active {
            account.active = active;
        }

        account.updated_at = Utc::now();
        self.directory.update(&account)?;
        Ok(account)
    }

    /// Change the password after re-proving the current one. A failed
    /// re-proof mutates nothing.
    pub fn change_password(
        &self,
        id: UserId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AccountError> {
        let mut account = self.directory.find_by_id(id)?;

        if !password::verify(&account.password_hash, old_password) {
            return Err(AccountError::InvalidCredentials);
        }

        validate_password(new_password)?;
        account.password_hash = password::hash(new_password)?;
        account.updated_at = Utc::now();
        self.directory.update(&account)?;
        tracing::info!(account = %account.id, "password changed");
        Ok(())
    }

    /// Privileged password reset: no old-password check. Callers gate this
    /// behind an admin role policy.
    pub fn reset_password(&self, id: UserId, new_password: &str) -> Result<(), AccountError> {
        let mut account = self.directory.find_by_id(id)?;

        validate_password(new_password)?;
        account.password_hash = password::hash(new_password)?;
        account.updated_at = Utc::now();
        self.directory.update(&account)?;
        tracing::info!(account = %account.id, "password reset");
        Ok(())
    }

    /// Standalone re-proof primitive.
    pub fn verify_password(&self, id: UserId, pass: &str) -> Result<(), AccountError> {
        let account = self.directory.find_by_id(id)?;
        if password::verify(&account.password_hash, pass) {
            Ok(())
        } else {
            Err(AccountError::InvalidCredentials)
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Drive a lifecycle transition on behalf of `actor`.
    ///
    /// The guard is evaluated first (role/ownership, then password re-proof
    /// where required); a failed guard performs no mutation at all.
    pub fn set_lifecycle_state(
        &self,
        actor: &AuthContext,
        id: UserId,
        transition: LifecycleTransition,
        proof_password: Option<&str>,
    ) -> Result<(), AccountError> {
        if clearance(actor, id, transition)? == Clearance::SelfWithProof {
            let proof = proof_password.ok_or(AccountError::InvalidCredentials)?;
            self.verify_password(id, proof)?;
        }

        match transition {
            LifecycleTransition::Activate => {
                let mut account = self.directory.find_by_id(id)?;
                if account.active {
                    return Err(AccountError::validation("account is already active"));
                }
                account.active = true;
                account.updated_at = Utc::now();
                self.directory.update(&account)?;
            }
            LifecycleTransition::Deactivate => {
                let mut account = self.directory.find_by_id(id)?;
                if !account.active {
                    return Err(AccountError::validation("account is already inactive"));
                }
                account.active = false;
                account.updated_at = Utc::now();
                self.directory.update(&account)?;
            }
            LifecycleTransition::SoftDelete => {
                // Live-only lookup first: deleting a soft-deleted account is
                // NotFound, not a second delete.
                self.directory.find_by_id(id)?;
                self.directory.soft_delete(id, Utc::now())?;
            }
            LifecycleTransition::Restore => {
                self.directory.restore(id)?;
            }
            LifecycleTransition::HardDelete => {
                self.directory.hard_delete(id)?;
            }
        }

        tracing::info!(
            account = %id,
            actor = %actor.subject(),
            transition = %transition,
            "lifecycle transition applied"
        );
        Ok(())
    }
}

fn validate_username(username: &str) -> Result<(), AccountError> {
    let len = username.chars().count();
    if !(3..=50).contains(&len) {
        return Err(AccountError::validation(
            "username must be between 3 and 50 characters",
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AccountError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(AccountError::validation("invalid email format"));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), AccountError> {
    let len = phone.chars().count();
    if !(10..=15).contains(&len) {
        return Err(AccountError::validation(
            "phone must be between 10 and 15 characters",
        ));
    }
    Ok(())
}

fn validate_password(pass: &str) -> Result<(), AccountError> {
    if pass.chars().count() < 8 {
        return Err(AccountError::validation(
            "password must be at least 8 characters",
        ));
    }
    Ok(())
}
