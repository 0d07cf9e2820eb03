//! Paging and sorting query parameters.

use serde::{Deserialize, Serialize};

use shopkit_core::types::{PageRequest, QuerySpec, SortField};

/// Query parameters shared by list endpoints.
///
/// `sort` takes a field name, prefixed with `-` for descending order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParams {
    /// Page number (1-based, default: 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (default: 20, max: 100).
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub sort: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            sort: None,
        }
    }
}

impl ListParams {
    /// Builds a query with these paging and sort settings.
    pub fn into_spec<F>(self, filters: Vec<F>) -> QuerySpec<F> {
        let sort = self.sort.as_deref().and_then(SortField::parse);
        QuerySpec {
            filters,
            ..QuerySpec::new()
        }
        .sort_by(sort)
        .paginate(PageRequest::new(self.page, self.per_page))
    }
}
