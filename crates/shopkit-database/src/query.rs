//! Helpers shared by the store implementations for evaluating a
//! [`QuerySpec`](shopkit_core::types::QuerySpec).

use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;
use shopkit_core::types::{SortDirection, SortField};

/// Check the requested ordering against a whitelist of sortable columns.
pub fn checked_sort<'a>(
    sort: Option<&'a SortField>,
    allowed: &[&str],
) -> AppResult<Option<&'a SortField>> {
    match sort {
        Some(sort) if !allowed.contains(&sort.field.as_str()) => Err(AppError::validation(
            format!(
                "Cannot sort by '{}'. Expected one of: {}",
                sort.field,
                allowed.join(", ")
            ),
        )),
        other => Ok(other),
    }
}

/// Render an `ORDER BY` clause. The field must already be whitelisted.
pub fn order_by_clause(sort: Option<&SortField>, default: &str) -> String {
    match sort {
        // `id` breaks ties so pages are stable.
        Some(sort) => format!(" ORDER BY {} {}, id ASC", sort.field, sort.direction.as_sql()),
        None => format!(" ORDER BY {default}"),
    }
}

/// Apply a direction to an ascending comparison.
pub fn directed(ordering: std::cmp::Ordering, direction: SortDirection) -> std::cmp::Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Build an `ILIKE` pattern matching `term` anywhere, escaping wildcards.
pub fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Keep one page of an already filtered and ordered list.
pub fn page_slice<T>(items: Vec<T>, page: &shopkit_core::types::PageRequest) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect()
}
