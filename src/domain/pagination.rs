//! Page requests and paginated results

use serde::Serialize;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A normalized page request. Page numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Build from raw values. Missing, non-positive or out-of-range pages fall
    /// back to the defaults, and the size is capped at `MAX_PAGE_SIZE`.
    pub fn new(page: Option<i64>, size: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p > 0 => u32::try_from(p).unwrap_or(DEFAULT_PAGE),
            _ => DEFAULT_PAGE,
        };

        let size = match size {
            Some(s) if s > 0 => s.min(i64::from(MAX_PAGE_SIZE)) as u32,
            _ => DEFAULT_PAGE_SIZE,
        };

        Self { page, size }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.size as usize
    }

    pub fn limit(&self) -> usize {
        self.size as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the total number of stored items
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: usize) -> Self {
        Self {
            items,
            page: request.page(),
            size: request.size(),
            total,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total: self.total,
        }
    }
}
