//! Common functionality for paging list endpoints.

use serde::Deserialize;

/// The page number to default to when not specified in a request.
const DEFAULT_PAGE: u64 = 1;
/// The number of rows per page when not specified in a request.
const DEFAULT_LIMIT: u64 = 10;
/// The maximum number of rows a client may request per page.
const MAX_LIMIT: u64 = 100;

/// Query parameters for paged list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    /// The 1-based page number to fetch.
    pub page: Option<u64>,
    /// The number of rows per page.
    pub limit: Option<u64>,
}

impl PaginationParams {
    /// The 1-based page number, defaulting to the first page.
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    /// The number of rows per page, clamped to a sane maximum.
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// The number of rows to skip for the requested page.
    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }
}

/// The number of pages needed to display `total_count` rows.
pub fn page_count(total_count: u64, limit: u64) -> u64 {
    total_count.div_ceil(limit)
}
