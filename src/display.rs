use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;
use serde_json::Value;

use crate::config::config::DisplayConfig;

/// Column names for a JSON array of objects, taken from the first object.
/// The backend's response shape is not specified, so the first record wins.
pub fn header_names(rows: &[Value]) -> Vec<String> {
    rows.first()
        .and_then(|v| v.as_object())
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default()
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null) => "NULL".to_string(),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

/// Build a table for an array of JSON objects. Returns None when the rows
/// are empty or not objects, in which case the caller falls back to plain
/// JSON printing.
pub fn build_table(rows: &[Value], max_rows: usize) -> Option<Table> {
    let field_names = header_names(rows);
    if field_names.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let headers: Vec<Cell> = field_names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect();
    table.set_header(headers);

    for record in rows.iter().take(max_rows) {
        if let Some(obj) = record.as_object() {
            let row: Vec<String> = field_names
                .iter()
                .map(|field| cell_text(obj.get(field)))
                .collect();
            table.add_row(row);
        }
    }

    Some(table)
}

pub fn format_json(value: &Value, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    } else {
        value.to_string()
    }
}

fn status_line(text: String, color: bool, error: bool) -> String {
    if !color {
        return text;
    }
    if error {
        format!("{}", text.red())
    } else {
        format!("{}", text.green())
    }
}

/// Render a JSON response body according to the display settings.
pub fn display_response(value: &Value, display: &DisplayConfig) {
    if let Some(rows) = value.as_array() {
        if rows.is_empty() {
            let notice = if display.color {
                format!("{}", "No results found.".yellow())
            } else {
                "No results found.".to_string()
            };
            println!("{}", notice);
            return;
        }

        if display.table {
            if let Some(table) = build_table(rows, display.max_table_rows) {
                println!("{table}");
                let footer = if rows.len() > display.max_table_rows {
                    format!("showing {} of {} rows", display.max_table_rows, rows.len())
                } else {
                    format!("{} rows returned", rows.len())
                };
                println!("\n{}", status_line(footer, display.color, false));
                return;
            }
        }
    }

    println!("{}", format_json(value, display.pretty));
}

/// Print an error the way the original harness did: the whole body text,
/// so backend error messages stay inspectable.
pub fn display_error(message: &str, color: bool) {
    eprintln!("{}", status_line(format!("Error: {}", message), color, true));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn headers_come_from_first_object() {
        let rows = vec![
            json!({"titel": "Motion 1", "parti": "s"}),
            json!({"titel": "Motion 2", "parti": "m", "extra": 1}),
        ];
        assert_eq!(header_names(&rows), vec!["parti", "titel"]);
    }

    #[test]
    fn scalar_rows_produce_no_table() {
        let rows = vec![json!(1), json!(2)];
        assert!(build_table(&rows, 100).is_none());
        assert!(build_table(&[], 100).is_none());
    }

    #[test]
    fn compact_json_is_single_line() {
        let value = json!({"hits": [1, 2, 3]});
        assert!(!format_json(&value, false).contains('\n'));
        assert!(format_json(&value, true).contains('\n'));
    }
}
