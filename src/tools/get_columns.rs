//! Column listing tool.
//!
//! Retrieves a list of fields, dimensions, or measures (as columns) for an
//! object, entity or collection (table). Use the get_tables tool to get a
//! list of available tables. The output of the tool will be returned in CSV
//! format, with the first line containing column headers.

use crate::connectors::{ColumnInfo, Connector, Row};
use crate::tools::csv::to_csv;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

/// Agent-facing tool description.
pub const DESCRIPTION: &str = "Retrieves a list of fields, dimensions, or measures (as columns) for an object, entity or collection (table).\n\
    \n\
    Use the get_tables tool to get a list of available tables.\n\
    The output of the tool will be returned in CSV format, with the first line containing column headers.";

/// Input for the get_columns tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetColumnsInput {
    /// The table name (required)
    #[serde(default)]
    pub table: String,
    /// Optional catalog name
    #[serde(default)]
    pub catalog: Option<String>,
    /// Optional schema name
    #[serde(default)]
    pub schema: Option<String>,
}

/// Handle the get_columns tool call. Always returns a single text blob.
pub fn get_columns(connector: &mut dyn Connector, input: GetColumnsInput) -> String {
    if input.table.is_empty() {
        return "ERROR: table parameter is required".to_string();
    }

    let result = connector.get_columns(
        &input.table,
        input.catalog.as_deref(),
        input.schema.as_deref(),
    );

    match result {
        Ok(columns) => {
            debug!(table = %input.table, count = columns.len(), "Columns listed");
            if columns.is_empty() {
                return format!("No columns found for table: {}", input.table);
            }

            let output_columns = output_columns(&columns);
            let rows: Vec<Row> = columns.iter().map(column_row).collect();
            to_csv(&rows, Some(&output_columns))
        }
        Err(e) => format!("ERROR: {}", e),
    }
}

/// Catalog and Schema appear in the output only when some backend row
/// actually reported a value for them.
fn output_columns(columns: &[ColumnInfo]) -> Vec<String> {
    let mut output = Vec::new();
    if columns.iter().any(|c| !c.catalog.is_empty()) {
        output.push("Catalog".to_string());
    }
    if columns.iter().any(|c| !c.schema.is_empty()) {
        output.push("Schema".to_string());
    }
    output.push("Table".to_string());
    output.push("Column".to_string());
    output.push("DataType".to_string());
    output.push("Description".to_string());
    output
}

fn column_row(column: &ColumnInfo) -> Row {
    let mut row = Row::new();
    row.insert("Catalog".to_string(), column.catalog.clone());
    row.insert("Schema".to_string(), column.schema.clone());
    row.insert("Table".to_string(), column.table.clone());
    row.insert("Column".to_string(), column.name.clone());
    row.insert("DataType".to_string(), column.data_type.clone());
    row.insert("Description".to_string(), column.description.clone());
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(schema: &str, name: &str) -> ColumnInfo {
        ColumnInfo {
            catalog: String::new(),
            schema: schema.to_string(),
            table: "MARA".to_string(),
            name: name.to_string(),
            data_type: "NVARCHAR".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_output_columns_without_identifiers() {
        let columns = vec![column("", "MATNR")];
        assert_eq!(
            output_columns(&columns),
            vec!["Table", "Column", "DataType", "Description"]
        );
    }

    #[test]
    fn test_output_columns_with_schema() {
        let columns = vec![column("SAPABAP1", "MATNR")];
        assert_eq!(
            output_columns(&columns),
            vec!["Schema", "Table", "Column", "DataType", "Description"]
        );
    }
}
