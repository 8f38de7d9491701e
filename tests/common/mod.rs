//! Shared test support: a scripted connector implementation.

#![allow(dead_code)]

use sap_mcp_server::connectors::{ColumnInfo, Connector, Row, TableInfo};
use sap_mcp_server::error::{ConnectorError, ConnectorResult};

/// Scripted connector for handler tests.
///
/// Honors the contract the tool layer relies on: schema is an exact-match
/// filter, search is a case-insensitive substring filter on the table name,
/// limit bounds the result. Records received SQL and call counts.
#[derive(Default)]
pub struct MockConnector {
    pub tables: Vec<TableInfo>,
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<Row>,
    /// When set, every data operation fails with this backend message.
    pub fail_with: Option<String>,
    /// When true, test_connection reports an unreachable backend.
    pub unreachable: bool,
    pub received_sql: Vec<String>,
    pub get_columns_calls: usize,
    pub last_error: Option<String>,
}

impl MockConnector {
    pub fn with_tables(tables: Vec<TableInfo>) -> Self {
        Self {
            tables,
            ..Self::default()
        }
    }

    pub fn with_columns(columns: Vec<ColumnInfo>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn check_failure(&self) -> ConnectorResult<()> {
        match &self.fail_with {
            Some(message) => Err(ConnectorError::backend(message.clone())),
            None => Ok(()),
        }
    }
}

impl Connector for MockConnector {
    fn connect(&mut self) -> ConnectorResult<()> {
        self.check_failure()
    }

    fn get_tables(
        &mut self,
        _catalog: Option<&str>,
        schema: Option<&str>,
        search: Option<&str>,
        limit: u32,
    ) -> ConnectorResult<Vec<TableInfo>> {
        self.check_failure()?;

        let search_upper = search.map(str::to_uppercase);
        let tables = self
            .tables
            .iter()
            .filter(|t| schema.is_none_or(|s| t.schema == s))
            .filter(|t| {
                search_upper
                    .as_deref()
                    .is_none_or(|s| t.name.to_uppercase().contains(s))
            })
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(tables)
    }

    fn get_columns(
        &mut self,
        table: &str,
        _catalog: Option<&str>,
        _schema: Option<&str>,
    ) -> ConnectorResult<Vec<ColumnInfo>> {
        self.get_columns_calls += 1;
        self.check_failure()?;

        if table.is_empty() {
            return Err(ConnectorError::invalid_argument("table name is required"));
        }
        Ok(self.columns.clone())
    }

    fn execute_query(&mut self, sql: &str) -> ConnectorResult<Vec<Row>> {
        self.received_sql.push(sql.to_string());
        self.check_failure()?;
        Ok(self.rows.clone())
    }

    fn test_connection(&mut self) -> bool {
        if self.unreachable {
            self.last_error = Some("connection refused: backend offline".to_string());
            return false;
        }
        true
    }

    fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn close(&mut self) {}
}

pub fn table(catalog: &str, schema: &str, name: &str, description: &str) -> TableInfo {
    TableInfo {
        catalog: catalog.to_string(),
        schema: schema.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    }
}

pub fn column(schema: &str, table: &str, name: &str, data_type: &str) -> ColumnInfo {
    ColumnInfo {
        catalog: String::new(),
        schema: schema.to_string(),
        table: table.to_string(),
        name: name.to_string(),
        data_type: data_type.to_string(),
        description: String::new(),
    }
}

pub fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
