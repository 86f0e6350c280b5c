//! Page requests and paged result sets shared by every listing.
//!
//! Listings across the marketplace use one-based page numbers taken straight
//! from a query string. Anything that does not parse to a positive number is
//! treated as the first page.

use serde::{Deserialize, Serialize};

/// One-based page request with a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    number: u32,
    size: u32,
}

impl PageRequest {
    /// Creates a page request, clamping both values to at least one.
    #[must_use]
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    /// Returns the first page of the given size.
    #[must_use]
    pub fn first(size: u32) -> Self {
        Self::new(1, size)
    }

    /// Parses a raw `page` query value.
    ///
    /// Missing, non-numeric, negative and zero values all yield page one.
    #[must_use]
    pub fn from_query(raw: Option<&str>, size: u32) -> Self {
        let number = raw
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(1);
        Self::new(number, size)
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns the page size.
    #[must_use]
    pub const fn size(self) -> u32 {
        self.size
    }

    /// Returns the number of items preceding this page.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.number.saturating_sub(1)).saturating_mul(u64::from(self.size))
    }

    /// Returns the page slice of an already sorted collection.
    ///
    /// Used by the in-memory adapters, which sort before paging.
    #[must_use]
    pub fn slice<T>(self, sorted: Vec<T>) -> Page<T> {
        let total_items = u64::try_from(sorted.len()).unwrap_or(u64::MAX);
        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.size).unwrap_or(usize::MAX);
        let items = sorted.into_iter().skip(skip).take(take).collect();
        Page::new(items, self, total_items)
    }
}

/// A single page of results plus the totals needed to render a pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    items: Vec<T>,
    number: u32,
    size: u32,
    total_items: u64,
}

impl<T> Page<T> {
    /// Creates a page from its items and the overall item count.
    #[must_use]
    pub const fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            number: request.number,
            size: request.size,
            total_items,
        }
    }

    /// Returns the items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the one-based page number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Returns the total number of matching items across all pages.
    #[must_use]
    pub const fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Returns the number of pages, rounding up. Zero when nothing matched.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.size);
        let pages = self.total_items.div_ceil(size);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Returns `true` when a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages()
    }

    /// Returns `true` when an earlier page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.number > 1
    }

    /// Returns the page numbers to link to, optionally capped.
    #[must_use]
    pub fn page_numbers(&self, cap: Option<u32>) -> Vec<u32> {
        let last = cap.map_or(self.total_pages(), |limit| self.total_pages().min(limit));
        (1..=last).collect()
    }

    /// Maps the items while keeping the paging totals.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_items: self.total_items,
        }
    }
}
