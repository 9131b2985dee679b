//! Clamped pagination
//!
//! Page lookups never fail: a page parameter that does not parse as an
//! integer resolves to the first page, and a parsed value outside the
//! valid range resolves to the last page.

use serde::Serialize;

/// Resolved page request after clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Resolve a raw `page` query parameter against a known result count.
    pub fn clamped(raw: Option<&str>, total: i64, per_page: i64) -> Self {
        let num_pages = num_pages(total, per_page);
        let number = match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => 1,
            Some(s) => match s.parse::<i64>() {
                Err(_) => 1,
                Ok(n) if n < 1 || n > num_pages => num_pages,
                Ok(n) => n,
            },
        };
        Self { number, per_page }
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Number of pages for a result count; an empty result set still has one page.
pub fn num_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 {
        1
    } else {
        (total + per_page - 1) / per_page
    }
}

/// One page of results, ready for rendering
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub total: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        let num_pages = num_pages(total, request.per_page);
        Self {
            has_previous: request.number > 1,
            has_next: request.number < num_pages,
            number: request.number,
            num_pages,
            total,
            items,
        }
    }
}
