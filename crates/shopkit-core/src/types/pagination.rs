//! Page windows for list endpoints.

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

/// A 1-based page number and a page size.
///
/// Values straight from serde are not clamped; call [`Self::normalized`]
/// before handing one to a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Page 0 becomes 1, sizes land in `1..=100`.
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn normalized(self) -> Self {
        Self::new(self.page, self.per_page)
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }
}

/// One page of results plus the totals a client needs to page further.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    /// At least 1, even for an empty result.
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total_items,
            total_pages: total_items.div_ceil(request.per_page.max(1)).max(1),
        }
    }

    /// Convert the items, keeping the totals.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        let Self {
            items,
            page,
            per_page,
            total_items,
            total_pages,
        } = self;
        PageResponse {
            items: items.into_iter().map(f).collect(),
            page,
            per_page,
            total_items,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_clamping() {
        let page = PageRequest::new(0, 1000);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let page: PageRequest = serde_json::from_str(r#"{"page": 4}"#).unwrap();
        assert_eq!(page, PageRequest { page: 4, per_page: 20 });
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = PageRequest::new(1, 10);
        let response = PageResponse::new(vec![1, 2, 3], &page, 21);
        assert_eq!(response.total_pages, 3);
        assert!(response.has_next());

        let empty: PageResponse<u8> = PageResponse::new(Vec::new(), &page, 0);
        assert_eq!(empty.total_pages, 1);
        assert!(!empty.has_next());
    }
}
