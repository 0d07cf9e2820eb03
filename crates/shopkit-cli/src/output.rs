//! Rendering of command results as tables or JSON.

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use shopkit_core::types::PageResponse;

/// Selected with the global `--format` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn render_table<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(rows).with(Style::psql()).to_string()
}

fn render_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

/// Print rows as a table, or as a JSON array.
pub fn print_list<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", render_table(rows)),
        OutputFormat::Json => println!("{}", render_json(rows)),
    }
}

/// Print one page of a listing, mapping each item to its display row.
///
/// JSON output keeps the paging fields next to the rows.
pub fn print_page<T, R, F>(page: PageResponse<T>, format: OutputFormat, to_row: F)
where
    R: Serialize + Tabled,
    F: FnMut(T) -> R,
{
    let page = page.map(to_row);

    match format {
        OutputFormat::Table => {
            println!("{}", render_table(&page.items));
            println!(
                "page {}/{}, {} total",
                page.page, page.total_pages, page.total_items
            );
            if page.has_next() {
                println!("(more with --page {})", page.page + 1);
            }
        }
        OutputFormat::Json => println!("{}", render_json(&page)),
    }
}

pub fn print_success(msg: &str) {
    println!("ok: {msg}");
}

pub fn print_warning(msg: &str) {
    println!("warning: {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("error: {msg}");
}

/// Print an aligned `key: value` line.
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<16} {value}", format!("{key}:"));
}
