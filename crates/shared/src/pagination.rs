//! Offset pagination helpers.
//!
//! Listing endpoints use 1-based page numbers with a per-page limit and
//! return total counts so clients can render pagination controls.

use serde::{Deserialize, Serialize};

/// Default page size for listing endpoints.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Query parameters shared by paginated listing endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageQuery {
    /// Clamps the query to sane bounds: page >= 1, 1 <= limit <= max_limit.
    pub fn clamped(self, max_limit: i64) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, max_limit),
        }
    }

    /// Row offset for this page.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit
    }
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Number of rows in this page.
    pub count: usize,
    /// Total rows matching the filter.
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(count: usize, total: i64, query: &PageQuery) -> Self {
        Self {
            count,
            total,
            page: query.page,
            total_pages: total_pages(total, query.limit),
        }
    }
}

/// Number of pages needed for `total` rows at `limit` per page.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let query: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_page_query_offset() {
        let query = PageQuery { page: 3, limit: 20 };
        assert_eq!(query.offset(), 40);
    }

    #[test]
    fn test_page_query_offset_first_page() {
        let query = PageQuery { page: 1, limit: 50 };
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_page_query_clamped_zero_page() {
        let query = PageQuery { page: 0, limit: 10 }.clamped(100);
        assert_eq!(query.page, 1);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_page_query_clamped_limit_cap() {
        let query = PageQuery {
            page: 2,
            limit: 5000,
        }
        .clamped(100);
        assert_eq!(query.limit, 100);
    }

    #[test]
    fn test_page_query_clamped_limit_floor() {
        let query = PageQuery { page: 1, limit: 0 }.clamped(100);
        assert_eq!(query.limit, 1);
    }

    #[test]
    fn test_total_pages_exact() {
        assert_eq!(total_pages(100, 50), 2);
    }

    #[test]
    fn test_total_pages_remainder() {
        assert_eq!(total_pages(101, 50), 3);
    }

    #[test]
    fn test_total_pages_empty() {
        assert_eq!(total_pages(0, 50), 0);
    }

    #[test]
    fn test_page_meta() {
        let query = PageQuery { page: 2, limit: 10 };
        let meta = PageMeta::new(10, 35, &query);
        assert_eq!(meta.count, 10);
        assert_eq!(meta.total, 35);
        assert_eq!(meta.page, 2);
        assert_eq!(meta.total_pages, 4);
    }

    #[test]
    fn test_page_meta_serialization() {
        let query = PageQuery { page: 1, limit: 50 };
        let meta = PageMeta::new(3, 3, &query);
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"totalPages\":1"));
        assert!(json.contains("\"total\":3"));
    }
}
