//! CSV output formatting for MCP tools.
//!
//! Tool responses are plain text, so tabular results are rendered as CSV
//! with a header line. Every field is quoted, embedded quotes are doubled.

use crate::connectors::Row;

/// Convert rows to a CSV string with a header line.
///
/// With `columns` given, fields are emitted in that order; columns missing
/// from a row yield an empty field and row keys outside the list are
/// dropped. Without `columns`, the first row's key order is used. Empty
/// input yields an empty string with no header.
pub fn to_csv(rows: &[Row], columns: Option<&[String]>) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let inferred: Vec<String>;
    let columns: &[String] = match columns {
        Some(columns) => columns,
        None => {
            inferred = rows[0].keys().cloned().collect();
            &inferred
        }
    };

    let mut output = String::new();
    push_record(&mut output, columns.iter().map(String::as_str));

    for row in rows {
        push_record(
            &mut output,
            columns
                .iter()
                .map(|column| row.get(column).map(String::as_str).unwrap_or("")),
        );
    }

    output
}

fn push_record<'a>(output: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            output.push(',');
        }
        first = false;
        output.push('"');
        output.push_str(&field.replace('"', "\"\""));
        output.push('"');
    }
    output.push('\n');
}
