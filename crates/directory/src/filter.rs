//! Listing filters and pagination types.

use serde::{Deserialize, Serialize};

use medirec_auth::Role;

/// Sort key for account listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    CreatedAt,
    Username,
    Email,
    DeletedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

/// Filter over account listings. All fields are conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive substring match over username, email and phone.
    pub search: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

/// Normalized page request. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    pub sort_by: SortBy,
    pub sort_dir: SortDir,
}

impl PageRequest {
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.page_size as usize
    }
}

/// Pagination envelope metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PageMeta {
    pub fn compute(page: &PageRequest, total_items: u64) -> Self {
        let total_pages = if page.page_size == 0 {
            0
        } else {
            total_items.div_ceil(page.page_size as u64) as u32
        };
        Self {
            page: page.page,
            page_size: page.page_size,
            total_items,
            total_pages,
        }
    }
}
