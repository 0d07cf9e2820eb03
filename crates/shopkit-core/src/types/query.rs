//! Typed query specifications handed to the data-access traits.
//!
//! A [`QuerySpec`] carries the filters, ordering and page window of a
//! listing. The filter type is defined per entity, so each store decides
//! how a filter becomes a SQL predicate or an in-memory test.

use serde::{Deserialize, Serialize};

use super::pagination::PageRequest;
use super::sorting::SortField;

/// Filters, sort and page window for a listing query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec<F> {
    /// All filters must match (logical AND).
    pub filters: Vec<F>,
    /// Optional ordering. Stores fall back to their default order when absent.
    pub sort: Option<SortField>,
    /// Page window.
    pub page: PageRequest,
}

impl<F> QuerySpec<F> {
    /// An unfiltered first page.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            sort: None,
            page: PageRequest::default(),
        }
    }

    /// Add a filter.
    pub fn filter(mut self, filter: F) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a filter when present.
    pub fn filter_opt(mut self, filter: Option<F>) -> Self {
        if let Some(filter) = filter {
            self.filters.push(filter);
        }
        self
    }

    /// Set the ordering.
    pub fn sort_by(mut self, sort: Option<SortField>) -> Self {
        self.sort = sort;
        self
    }

    /// Set the page window.
    pub fn paginate(mut self, page: PageRequest) -> Self {
        self.page = page.normalized();
        self
    }
}

impl<F> Default for QuerySpec<F> {
    fn default() -> Self {
        Self::new()
    }
}
