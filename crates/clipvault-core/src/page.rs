//! Paginated results

use serde::{Deserialize, Serialize};

/// Page size used when a caller supplies none (or zero)
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Requested window into a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page size; zero means `DEFAULT_PAGE_SIZE`
    #[serde(default)]
    pub num_items: usize,

    /// Cursor returned by the previous page, absent for the first page
    #[serde(default)]
    pub cursor: Option<String>,
}

impl PageRequest {
    pub fn first(num_items: usize) -> Self {
        Self {
            num_items,
            cursor: None,
        }
    }

    pub fn after(num_items: usize, cursor: impl Into<String>) -> Self {
        Self {
            num_items,
            cursor: Some(cursor.into()),
        }
    }

    /// Page size with the default applied
    pub fn page_size(&self) -> usize {
        effective_page_size(Some(self.num_items))
    }
}

/// Resolve a requested page size, substituting the default for missing or zero
pub fn effective_page_size(requested: Option<usize>) -> usize {
    match requested {
        Some(n) if n > 0 => n,
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// One slice of an ordered result sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: Vec<T>,

    pub is_done: bool,

    /// Cursor for the next page; `None` once the sequence is exhausted
    pub continue_cursor: Option<String>,
}
