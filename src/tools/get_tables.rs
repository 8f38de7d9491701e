//! Table listing tool.
//!
//! Retrieves a list of objects, entities, collections, etc. (as tables)
//! available in the data source. Use the get_columns tool to list available
//! columns on a table. Both catalog and schema are optional parameters.
//! The output of the tool will be returned in CSV format, with the first
//! line containing column headers.

use crate::connectors::{Connector, Row, TableInfo};
use crate::tools::csv::to_csv;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

/// Agent-facing tool description.
pub const DESCRIPTION: &str = "Retrieves a list of objects, entities, collections, etc. (as tables) available in the data source.\n\
    \n\
    Use the get_columns tool to list available columns on a table.\n\
    Both catalog and schema are optional parameters.\n\
    The output of the tool will be returned in CSV format, with the first line containing column headers.";

/// Tables returned when the caller does not bound the result.
pub const DEFAULT_TABLE_LIMIT: u32 = 50;

/// Input for the get_tables tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetTablesInput {
    /// Optional catalog name to filter tables
    #[serde(default)]
    pub catalog: Option<String>,
    /// Optional schema name to filter tables
    #[serde(default)]
    pub schema: Option<String>,
    /// Optional search term to filter table names (e.g. 'ITM', 'ORD')
    #[serde(default)]
    pub search: Option<String>,
    /// Maximum number of tables to return (default: 50)
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Handle the get_tables tool call. Always returns a single text blob.
pub fn get_tables(connector: &mut dyn Connector, input: GetTablesInput) -> String {
    let limit = input.limit.unwrap_or(DEFAULT_TABLE_LIMIT);

    let result = connector.get_tables(
        input.catalog.as_deref(),
        input.schema.as_deref(),
        input.search.as_deref(),
        limit,
    );

    match result {
        Ok(tables) => {
            debug!(count = tables.len(), "Tables listed");
            if tables.is_empty() {
                return "No tables found.".to_string();
            }

            let columns = output_columns(&tables);
            let rows: Vec<Row> = tables.iter().map(table_row).collect();
            to_csv(&rows, Some(&columns))
        }
        Err(e) => format!("ERROR: {}", e),
    }
}

/// Catalog and Schema appear in the output only when some backend row
/// actually reported a value for them.
fn output_columns(tables: &[TableInfo]) -> Vec<String> {
    let mut columns = Vec::new();
    if tables.iter().any(|t| !t.catalog.is_empty()) {
        columns.push("Catalog".to_string());
    }
    if tables.iter().any(|t| !t.schema.is_empty()) {
        columns.push("Schema".to_string());
    }
    columns.push("Table".to_string());
    columns.push("Description".to_string());
    columns
}

fn table_row(table: &TableInfo) -> Row {
    let mut row = Row::new();
    row.insert("Catalog".to_string(), table.catalog.clone());
    row.insert("Schema".to_string(), table.schema.clone());
    row.insert("Table".to_string(), table.name.clone());
    row.insert("Description".to_string(), table.description.clone());
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(catalog: &str, schema: &str, name: &str) -> TableInfo {
        TableInfo {
            catalog: catalog.to_string(),
            schema: schema.to_string(),
            name: name.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_output_columns_without_catalog_or_schema() {
        let tables = vec![table("", "", "MARA")];
        assert_eq!(output_columns(&tables), vec!["Table", "Description"]);
    }

    #[test]
    fn test_output_columns_with_schema_only() {
        let tables = vec![table("", "SAPABAP1", "MARA")];
        assert_eq!(
            output_columns(&tables),
            vec!["Schema", "Table", "Description"]
        );
    }

    #[test]
    fn test_output_columns_with_catalog_and_schema() {
        let tables = vec![table("", "", "A"), table("PROD", "dbo", "B")];
        assert_eq!(
            output_columns(&tables),
            vec!["Catalog", "Schema", "Table", "Description"]
        );
    }
}
