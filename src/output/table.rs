//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

const NO_RESULTS: &str = "No results found.";

/// Format data as a rounded table with centred headers
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

/// Human-oriented table: modern borders and a row count footer
pub fn format_pretty<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    let noun = if data.len() == 1 { "row" } else { "rows" };
    format!("{}\n{} {}", table, data.len(), noun)
}
