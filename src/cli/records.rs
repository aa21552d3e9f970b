//! Renders lists of JSON records as tables with a fixed column layout.

use super::ui;
use comfy_table::{Cell, CellAlignment, Table};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueFormat {
    Text,
    /// `12.34`
    Decimal(usize),
    /// `$12.34`
    Dollars(usize),
    /// `$1,234`
    DollarsGrouped,
    /// `1,234`
    Grouped,
    /// `12.34%`
    Percent(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column<'a> {
    pub key: &'a str,
    pub format: ValueFormat,
}

pub const fn column(key: &str, format: ValueFormat) -> Column<'_> {
    Column { key, format }
}

/// Keeps the columns present in at least one record, in the given order.
pub fn available_columns<'a>(records: &[Value], columns: &[Column<'a>]) -> Vec<Column<'a>> {
    columns
        .iter()
        .filter(|c| records.iter().any(|r| r.get(c.key).is_some()))
        .copied()
        .collect()
}

/// Every field of the records as a text column, in order of first appearance.
pub fn all_columns(records: &[Value]) -> Vec<Column<'_>> {
    let mut columns: Vec<Column<'_>> = Vec::new();
    for record in records {
        let Some(fields) = record.as_object() else {
            continue;
        };
        for key in fields.keys() {
            if !columns.iter().any(|c| c.key == key.as_str()) {
                columns.push(column(key, ValueFormat::Text));
            }
        }
    }
    columns
}

/// Formats a field; `None` for null.
pub fn format_value(value: &Value, format: ValueFormat) -> Option<String> {
    let number = match value {
        Value::Null => return None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => return Some(s.clone()),
        other => return Some(other.to_string()),
    };
    let Some(n) = number else {
        return Some(value.to_string());
    };

    let text = match format {
        ValueFormat::Text => value.to_string(),
        ValueFormat::Decimal(precision) => format!("{n:.precision$}"),
        ValueFormat::Dollars(precision) => format!("${n:.precision$}"),
        ValueFormat::DollarsGrouped => format!("${}", ui::format_thousands(n)),
        ValueFormat::Grouped => ui::format_thousands(n),
        ValueFormat::Percent(precision) => format!("{n:.precision$}%"),
    };
    Some(text)
}

fn value_cell(value: Option<&Value>, format: ValueFormat) -> Cell {
    match value.and_then(|v| format_value(v, format)) {
        Some(text) if format == ValueFormat::Text => Cell::new(text),
        Some(text) => Cell::new(text).set_alignment(CellAlignment::Right),
        None => ui::na_cell(),
    }
}

pub fn records_table(records: &[Value], columns: &[Column<'_>]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(columns.iter().map(|c| ui::header_cell(c.key)));

    for record in records {
        table.add_row(
            columns
                .iter()
                .map(|c| value_cell(record.get(c.key), c.format)),
        );
    }
    table
}
