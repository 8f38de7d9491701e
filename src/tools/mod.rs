//! MCP tool implementations.
//!
//! This module contains the three database tool handlers and their shared
//! CSV output formatting:
//! - `get_tables`: list tables in the data source
//! - `get_columns`: list the columns of a table
//! - `run_query`: execute a SELECT statement
//!
//! Handlers are plain request/response functions over a connector. They
//! return a single text blob in every case; connector failures are caught
//! here and rendered as `ERROR: ...` strings, never raised further.

pub mod csv;
pub mod get_columns;
pub mod get_tables;
pub mod run_query;

pub use csv::to_csv;
pub use get_columns::{GetColumnsInput, get_columns};
pub use get_tables::{DEFAULT_TABLE_LIMIT, GetTablesInput, get_tables};
pub use run_query::{RunQueryInput, run_query};
