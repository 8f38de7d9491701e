//! Database connectors.
//!
//! This module defines the uniform access contract implemented per backend:
//! - `hana`: SAP HANA through the native hdbconnect driver
//! - `odbc`: any ODBC data source through the driver's catalog functions

pub mod hana;
pub mod odbc;

pub use hana::HanaConnector;
pub use odbc::OdbcConnector;

use crate::config::ConnectorConfig;
use crate::error::ConnectorResult;
use indexmap::IndexMap;

/// A single result row: backend-reported column name to value rendered as
/// text. Key order is the result set's column order; duplicate column names
/// collapse last-wins.
pub type Row = IndexMap<String, String>;

/// Table metadata as reported by the backend catalog.
/// Empty strings mean the backend did not report that part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub catalog: String,
    pub schema: String,
    pub name: String,
    pub description: String,
}

/// Column metadata, ordered by the backend's physical column position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub catalog: String,
    pub schema: String,
    pub table: String,
    pub name: String,
    pub data_type: String,
    pub description: String,
}

/// Uniform database access contract implemented per backend.
///
/// A connector owns at most one live connection, created lazily on first
/// use and replaced (never leaked) on reconnect. Connectors are not safe
/// for concurrent use; callers serialize access to an instance.
pub trait Connector: Send {
    /// Establish the live connection, replacing any existing handle.
    fn connect(&mut self) -> ConnectorResult<()>;

    /// List tables visible in the data source.
    ///
    /// `schema` is an exact-match filter; `search` matches table names as a
    /// case-insensitive substring; `limit` bounds the rows fetched from the
    /// catalog. Backends without native support for a filter return the
    /// unfiltered set instead of failing.
    fn get_tables(
        &mut self,
        catalog: Option<&str>,
        schema: Option<&str>,
        search: Option<&str>,
        limit: u32,
    ) -> ConnectorResult<Vec<TableInfo>>;

    /// List the columns of `table`, ordered by column position.
    fn get_columns(
        &mut self,
        table: &str,
        catalog: Option<&str>,
        schema: Option<&str>,
    ) -> ConnectorResult<Vec<ColumnInfo>>;

    /// Execute a SQL statement verbatim and materialize all result rows.
    fn execute_query(&mut self, sql: &str) -> ConnectorResult<Vec<Row>>;

    /// Probe the connection. Never fails; a failure is reported as `false`
    /// with the error text retained for [`Connector::last_error`].
    fn test_connection(&mut self) -> bool;

    /// Error text from the most recent failed `test_connection`, if any.
    fn last_error(&self) -> Option<&str>;

    /// Release the live connection. No-op when not connected.
    fn close(&mut self);

    /// Quote an identifier for use in SQL text. The default follows the
    /// SQL standard: double quotes, embedded quotes doubled.
    fn quote_identifier(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }
}

/// Create a connector from the resolved configuration.
pub fn create_connector(config: &ConnectorConfig) -> Box<dyn Connector> {
    match config {
        ConnectorConfig::Hana(hana) => Box::new(HanaConnector::new(hana.clone())),
        ConnectorConfig::Odbc(odbc) => Box::new(OdbcConnector::new(odbc.connection_string.clone())),
    }
}
