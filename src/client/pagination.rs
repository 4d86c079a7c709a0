//! Pagination types for list requests
//!
//! Pages are 0-indexed. [`Page`] mirrors the page object the backend returns
//! for collection endpoints.

use serde::{Deserialize, Serialize};

/// Default page size for the book list
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size the CLI will request
pub const MAX_PAGE_SIZE: usize = 100;

/// Parameters of a single page request.
///
/// # Example
/// ```ignore
/// let request = PageRequest::new(2, 10).sort("title,asc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number (0-indexed)
    pub page: usize,
    /// Number of items per page
    pub size: usize,
    /// Sort expression in `field,direction` form
    pub sort: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

impl PageRequest {
    /// Create a request for `page` with `size` items (clamped to 1..=MAX_PAGE_SIZE).
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
            sort: None,
        }
    }

    /// Set a raw sort expression such as `title,asc`.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Convert to query string parameters (`page`, `size`, `sort`).
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ];

        if let Some(ref sort) = self.sort {
            params.push(("sort", sort.clone()));
        }

        params
    }
}

/// One page of a collection plus its position in the whole
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page
    pub content: Vec<T>,

    /// Page number (0-indexed)
    pub number: usize,

    /// Requested page size
    pub size: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Total number of items across all pages
    pub total_elements: u64,

    /// Whether this is the first page
    pub first: bool,

    /// Whether this is the last page
    pub last: bool,

    /// Number of items on this page
    #[serde(default)]
    pub number_of_elements: usize,

    /// Whether this page has no items
    #[serde(default)]
    pub empty: bool,
}

impl<T> Page<T> {
    /// Build a page from its content and position, deriving the flags.
    #[cfg(test)]
    pub fn new(content: Vec<T>, number: usize, size: usize, total_elements: u64) -> Self {
        let size = size.max(1);
        let total_pages = (total_elements as usize).div_ceil(size);
        let number_of_elements = content.len();

        Self {
            empty: content.is_empty(),
            content,
            number,
            size,
            total_pages,
            total_elements,
            first: number == 0,
            last: number + 1 >= total_pages,
            number_of_elements,
        }
    }

    /// Whether there is a following page
    pub fn has_next(&self) -> bool {
        !self.last
    }

    /// Whether there is a preceding page
    pub fn has_previous(&self) -> bool {
        !self.first
    }

    /// Human-facing position, e.g. `Page 2 of 5`
    pub fn position_label(&self) -> String {
        format!("Page {} of {}", self.number + 1, self.total_pages.max(1))
    }
}
