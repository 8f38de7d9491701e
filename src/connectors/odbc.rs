//! Generic ODBC connector using odbc-api.
//!
//! Metadata comes from the driver's own catalog functions (SQLTables /
//! SQLColumns), so this variant's filtering is a strict subset of the HANA
//! variant's: catalog and schema pass through, but there is no native
//! substring search or row-limit pushdown. Unsupported filters degrade to
//! the unfiltered set.

use crate::connectors::{ColumnInfo, Connector, Row, TableInfo};
use crate::error::{ConnectorError, ConnectorResult};
use odbc_api::buffers::TextRowSet;
use odbc_api::{Connection, ConnectionOptions, Cursor, ResultSetMetadata};
use tracing::debug;

/// Rows fetched per driver round-trip.
const BATCH_SIZE: usize = 256;
/// Upper bound for a single text field, in bytes.
const MAX_FIELD_BYTES: usize = 4096;

// ODBC catalog result-set positions (SQLTables / SQLColumns).
const TABLES_CATALOG: usize = 0;
const TABLES_SCHEMA: usize = 1;
const TABLES_NAME: usize = 2;
const TABLES_REMARKS: usize = 4;
const COLUMNS_CATALOG: usize = 0;
const COLUMNS_SCHEMA: usize = 1;
const COLUMNS_TABLE: usize = 2;
const COLUMNS_NAME: usize = 3;
const COLUMNS_TYPE_NAME: usize = 5;
const COLUMNS_REMARKS: usize = 11;

pub struct OdbcConnector {
    connection_string: String,
    connection: Option<Connection<'static>>,
    last_error: Option<String>,
}

impl OdbcConnector {
    pub fn new(connection_string: String) -> Self {
        Self {
            connection_string,
            connection: None,
            last_error: None,
        }
    }

    /// Get the existing connection or establish a new one.
    fn live_connection(&mut self) -> ConnectorResult<&Connection<'static>> {
        if self.connection.is_none() {
            self.connect()?;
        }
        match self.connection.as_ref() {
            Some(conn) => Ok(conn),
            None => Err(ConnectorError::connection(
                "connection slot empty after connect",
            )),
        }
    }
}

/// Materialize every row of a cursor as text fields.
fn fetch_all_text(mut cursor: impl Cursor, column_count: usize) -> ConnectorResult<Vec<Vec<String>>> {
    let mut buffers = TextRowSet::for_cursor(BATCH_SIZE, &mut cursor, Some(MAX_FIELD_BYTES))?;
    let mut row_set_cursor = cursor.bind_buffer(&mut buffers)?;

    let mut rows = Vec::new();
    while let Some(batch) = row_set_cursor.fetch()? {
        for row_index in 0..batch.num_rows() {
            let row = (0..column_count)
                .map(|col_index| decode_field(batch.at(col_index, row_index)))
                .collect();
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Render an ODBC text field. NULL becomes an empty field.
fn decode_field(bytes: Option<&[u8]>) -> String {
    bytes
        .map(|b| String::from_utf8_lossy(b).into_owned())
        .unwrap_or_default()
}

fn field(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}

impl Connector for OdbcConnector {
    fn connect(&mut self) -> ConnectorResult<()> {
        let environment =
            odbc_api::environment().map_err(|e| ConnectorError::driver_missing(e.to_string()))?;

        debug!("Connecting via ODBC connection string");
        let connection = environment
            .connect_with_connection_string(&self.connection_string, ConnectionOptions::default())
            .map_err(|e| ConnectorError::connection(e.to_string()))?;

        // Replace any previous handle; the old connection drops here.
        self.connection = Some(connection);
        Ok(())
    }

    fn get_tables(
        &mut self,
        catalog: Option<&str>,
        schema: Option<&str>,
        search: Option<&str>,
        _limit: u32,
    ) -> ConnectorResult<Vec<TableInfo>> {
        if search.is_some() {
            // SQLTables has no substring search; fall back to the full set.
            debug!("ODBC backend ignores the search filter");
        }

        let conn = self.live_connection()?;
        let mut cursor = conn.tables(catalog.unwrap_or(""), schema.unwrap_or(""), "", "")?;
        let column_count = cursor.num_result_cols()? as usize;

        let tables = fetch_all_text(cursor, column_count)?
            .into_iter()
            .map(|row| TableInfo {
                catalog: field(&row, TABLES_CATALOG),
                schema: field(&row, TABLES_SCHEMA),
                name: field(&row, TABLES_NAME),
                description: field(&row, TABLES_REMARKS),
            })
            .collect();
        Ok(tables)
    }

    fn get_columns(
        &mut self,
        table: &str,
        catalog: Option<&str>,
        schema: Option<&str>,
    ) -> ConnectorResult<Vec<ColumnInfo>> {
        if table.is_empty() {
            return Err(ConnectorError::invalid_argument("table name is required"));
        }

        let conn = self.live_connection()?;
        let mut cursor = conn.columns(catalog.unwrap_or(""), schema.unwrap_or(""), table, "")?;
        let column_count = cursor.num_result_cols()? as usize;

        let columns = fetch_all_text(cursor, column_count)?
            .into_iter()
            .map(|row| ColumnInfo {
                catalog: field(&row, COLUMNS_CATALOG),
                schema: field(&row, COLUMNS_SCHEMA),
                table: field(&row, COLUMNS_TABLE),
                name: field(&row, COLUMNS_NAME),
                data_type: field(&row, COLUMNS_TYPE_NAME),
                description: field(&row, COLUMNS_REMARKS),
            })
            .collect();
        Ok(columns)
    }

    fn execute_query(&mut self, sql: &str) -> ConnectorResult<Vec<Row>> {
        let conn = self.live_connection()?;

        let Some(mut cursor) = conn.execute(sql, ())? else {
            // Statement produced no result set.
            return Ok(Vec::new());
        };

        // Column names come from the result-set metadata, case as reported.
        let field_names: Vec<String> = cursor
            .column_names()?
            .collect::<Result<Vec<String>, _>>()
            .map_err(|e| ConnectorError::backend(e.to_string()))?;

        let rows = fetch_all_text(cursor, field_names.len())?
            .into_iter()
            .map(|values| {
                let mut out = Row::new();
                for (name, value) in field_names.iter().zip(values) {
                    out.insert(name.clone(), value);
                }
                out
            })
            .collect();
        Ok(rows)
    }

    fn test_connection(&mut self) -> bool {
        let probe = self
            .live_connection()
            .and_then(|conn| conn.execute("SELECT 1", ()).map_err(Into::into))
            .map(drop);
        match probe {
            Ok(_) => true,
            Err(e) => {
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn close(&mut self) {
        if self.connection.take().is_some() {
            debug!("ODBC connection closed");
        }
    }
}
