//! Page-number pagination.

use serde::Serialize;

/// Page size used when the client does not send one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Largest row offset the database driver binds (a signed 64-bit value).
const MAX_OFFSET: u64 = i64::MAX as u64;

/// A normalized page request. `page` starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
}

impl PageRequest {
    /// Normalize raw query values: missing or zero page is 1, missing or
    /// zero size is the default, and size is capped. Page is capped so the
    /// offset fits a signed 64-bit bind value.
    #[must_use]
    pub fn new(page: Option<u64>, size: Option<u64>) -> Self {
        let size = size
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        let page = page
            .filter(|p| *p > 0)
            .unwrap_or(1)
            .min(MAX_OFFSET / size + 1);
        Self { page, size }
    }

    /// Page number, starting at 1.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Items per page.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Row limit for the query.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.size
    }

    /// Row offset for the query.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results with the total across all pages.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Items across all pages.
    pub total: u64,
    /// Page number, starting at 1.
    pub page: u64,
    /// Requested page size.
    pub size: u64,
}

impl<T> Page<T> {
    /// Wrap `items` fetched for `request`.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            size: request.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::new(None, None);
        assert_eq!(req.page(), 1);
        assert_eq!(req.size(), DEFAULT_PAGE_SIZE);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_zero_values_fall_back() {
        let req = PageRequest::new(Some(0), Some(0));
        assert_eq!(req.page(), 1);
        assert_eq!(req.size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_size_is_capped() {
        let req = PageRequest::new(Some(3), Some(500));
        assert_eq!(req.size(), MAX_PAGE_SIZE);
        assert_eq!(req.offset(), 200);
    }

    #[test]
    fn test_huge_page_keeps_offset_bindable() {
        let req = PageRequest::new(Some(u64::MAX), Some(20));
        assert!(i64::try_from(req.offset()).is_ok());
        assert_eq!(req.page(), MAX_OFFSET / 20 + 1);

        let req = PageRequest::new(Some(u64::MAX), Some(1));
        assert_eq!(req.offset(), MAX_OFFSET);
    }

    #[test]
    fn test_page_new_copies_request() {
        let page = Page::new(vec![1, 2], 7, PageRequest::new(Some(2), Some(2)));
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.total, 7);
        assert_eq!(page.page, 2);
        assert_eq!(page.size, 2);
    }
}
