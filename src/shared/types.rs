use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Error body shared by every endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_limit")]
    #[param(minimum = 1, maximum = 100)]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationQuery {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// Page number, never below 1
    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    /// Calculate SQL OFFSET from page number, saturating for out-of-range pages
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Get clamped limit (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Pagination block returned next to list results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

impl PaginationMeta {
    pub fn new(query: &PaginationQuery, total: i64) -> Self {
        let limit = query.limit();
        let pages = (total as f64 / limit as f64).ceil() as i64;
        Self {
            total,
            page: query.page(),
            limit,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit_are_clamped() {
        let query = PaginationQuery::new(0, 500);
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), MAX_PAGE_SIZE);
        assert_eq!(query.offset(), 0);

        let query = PaginationQuery::new(3, 10);
        assert_eq!(query.offset(), 20);
    }

    #[test]
    fn test_huge_page_saturates_offset() {
        let query = PaginationQuery::new(i64::MAX, 100);
        assert_eq!(query.offset(), i64::MAX);
    }

    #[test]
    fn test_pagination_meta_rounds_pages_up() {
        let meta = PaginationMeta::new(&PaginationQuery::new(2, 10), 25);
        assert_eq!(
            meta,
            PaginationMeta {
                total: 25,
                page: 2,
                limit: 10,
                pages: 3
            }
        );

        assert_eq!(PaginationMeta::new(&PaginationQuery::default(), 0).pages, 0);
    }
}
