//! Pagination types for list results.
//!
//! Lists in the back-office are offset-paginated: the caller asks for a window
//! (`count` items starting at `offset`) and receives the window together with
//! the total number of matches.

use serde::{Deserialize, Serialize};

/// Default number of items in a page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A requested window into a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of items to return.
    pub count: u32,
    /// Number of items to skip.
    pub offset: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            count: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl Pagination {
    /// Creates pagination with the given count and offset.
    pub fn new(count: u32, offset: u32) -> Self {
        Self { count, offset }
    }

    /// Creates pagination for the first `count` items.
    pub fn first(count: u32) -> Self {
        Self { count, offset: 0 }
    }

    /// Returns the SQL `LIMIT` value.
    pub fn limit(&self) -> i64 {
        i64::from(self.count)
    }

    /// Returns the SQL `OFFSET` value.
    pub fn sql_offset(&self) -> i64 {
        i64::from(self.offset)
    }
}

/// A window of list results.
///
/// Serializes as `{ "items": [...], "total": n, "count": c, "offset": o }`
/// where `count` is the number of items actually returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items in this window.
    pub items: Vec<T>,
    /// Total number of matching items across all windows.
    pub total: u64,
    /// Number of items in this window.
    pub count: usize,
    /// Offset of the first item in this window.
    pub offset: u32,
}

impl<T> Page<T> {
    /// Creates a page from the fetched items and the total match count.
    pub fn new(items: Vec<T>, total: u64, pagination: Pagination) -> Self {
        Self {
            count: items.len(),
            items,
            total,
            offset: pagination.offset,
        }
    }

    /// Creates an empty page.
    pub fn empty(pagination: Pagination) -> Self {
        Self::new(Vec::new(), 0, pagination)
    }

    /// Returns `true` if more items exist past this window.
    pub fn has_more(&self) -> bool {
        (u64::from(self.offset) + self.count as u64) < self.total
    }

    /// Maps the items of this page.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            count: self.count,
            offset: self.offset,
        }
    }
}
