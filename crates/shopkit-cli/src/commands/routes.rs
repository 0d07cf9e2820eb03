//! Print the route table.

use serde::Serialize;
use tabled::Tabled;

use shopkit_api::routes::ROUTE_TABLE;
use shopkit_core::result::AppResult;

use crate::output::{self, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
struct RouteRow {
    method: &'static str,
    path: &'static str,
    guard: &'static str,
}

/// Execute the routes command
pub fn execute(format: OutputFormat) -> AppResult<()> {
    let rows: Vec<RouteRow> = ROUTE_TABLE
        .iter()
        .map(|r| RouteRow {
            method: r.method,
            path: r.path,
            guard: r.guard,
        })
        .collect();
    output::print_list(&rows, format);
    Ok(())
}
