//! CSV export of table rows

use super::column::ColumnDef;
use crate::types::MarketRecord;

/// Which rows an export covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportScope {
    /// Every row that passes the filter, in sorted order
    #[default]
    Filtered,
    /// Only the rows on the current page
    CurrentPage,
}

/// Quotes a field, doubling embedded quotes
pub fn escape_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Renders `rows` as CSV: a header of column labels, one line per record
///
/// Every field is quoted; lines are joined with `\n` and there is no
/// trailing newline.
pub fn to_csv(columns: &[&ColumnDef], rows: &[&MarketRecord]) -> String {
    let header = columns
        .iter()
        .map(|column| escape_field(column.label))
        .collect::<Vec<_>>()
        .join(",");

    let lines = rows.iter().map(|record| {
        columns
            .iter()
            .map(|column| escape_field(&column.value(record).to_export_string()))
            .collect::<Vec<_>>()
            .join(",")
    });

    std::iter::once(header)
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}
