//! Pagination helpers shared by list endpoints

use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;
const MAX_PAGE: i64 = i64::MAX / MAX_PER_PAGE;

/// Normalized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Missing or non-positive values fall back to page 1 and 10 items per page.
    /// `page` is capped so the row offset always fits in an `i64`.
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1).min(MAX_PAGE);
        let per_page = per_page
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_PER_PAGE)
            .min(MAX_PER_PAGE);
        Self { page, per_page }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Number of pages needed for `total` rows (at least 1)
    pub fn max_page(&self, total: i64) -> i64 {
        ((total + self.per_page - 1) / self.per_page).max(1)
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Page content
    pub items: Vec<T>,
    /// Total number of matching rows
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
    /// Last page number
    pub max_page: i64,
}

impl<T> PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
            max_page: request.max_page(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = PageRequest::new(None, None);
        assert_eq!(request, PageRequest { page: 1, per_page: 10 });
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let request = PageRequest::new(Some(0), Some(-5));
        assert_eq!(request, PageRequest { page: 1, per_page: 10 });
        assert_eq!(PageRequest::new(Some(2), Some(1000)).per_page, MAX_PER_PAGE);
    }

    #[test]
    fn test_huge_page_keeps_offset_positive() {
        let request = PageRequest::new(Some(i64::MAX), Some(100));
        assert_eq!(request.page, i64::MAX / MAX_PER_PAGE);
        assert!(request.offset() > 0);

        let request = PageRequest::new(Some(i64::MAX), Some(1));
        assert!(request.offset() > 0);

        // Built directly, bypassing the cap
        let raw = PageRequest { page: i64::MAX, per_page: MAX_PER_PAGE };
        assert_eq!(raw.offset(), i64::MAX);
    }

    #[test]
    fn test_max_page() {
        let request = PageRequest::new(Some(3), Some(10));
        assert_eq!(request.offset(), 20);
        assert_eq!(request.max_page(0), 1);
        assert_eq!(request.max_page(10), 1);
        assert_eq!(request.max_page(11), 2);
    }
}
