//! `medirec-directory` — the user directory boundary.
//!
//! Defines the account record, the store contract the rest of the system
//! depends on, and an in-memory reference implementation for tests/dev.
//! Persistence engines live behind [`UserDirectory`]; nothing above this
//! crate constructs a query.

pub mod account;
pub mod contract;
pub mod filter;
pub mod memory;

pub use account::{Account, LifecycleState};
pub use contract::{DirectoryError, UniqueField, UserDirectory};
pub use filter::{ListFilter, PageMeta, PageRequest, SortBy, SortDir};
pub use memory::InMemoryDirectory;
