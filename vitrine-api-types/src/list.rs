//! Paged list response shape shared by every entity endpoint

use serde::{Deserialize, Serialize};

/// Pagination metadata echoed back with a page of rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMeta {
    pub page: u32,
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// One page of rows plus the total page count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub page_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ListMeta>,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, page_count: u32) -> Self {
        Self {
            items,
            page_count,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: ListMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// An empty page, used when a fetch fails and the caller clears the view
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page_count: 0,
            meta: None,
        }
    }
}
