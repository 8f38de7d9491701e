//! Integration tests for the metadata tool handlers.
//!
//! These tests verify argument validation, sentinel messages, conditional
//! output columns, and the text-only error channel using a scripted
//! connector.

mod common;

use common::{MockConnector, column, row, table};
use sap_mcp_server::connectors::Connector;
use sap_mcp_server::tools::{
    GetColumnsInput, GetTablesInput, RunQueryInput, get_columns, get_tables, run_query,
};

// =========================================================================
// get_tables
// =========================================================================

/// get_tables has no required arguments; all filters unset must succeed.
#[test]
fn test_get_tables_without_arguments() {
    let mut connector = MockConnector::with_tables(vec![
        table("", "SAPABAP1", "MARA", "Materials"),
        table("", "SAPABAP1", "VBAK", "Sales orders"),
    ]);

    let output = get_tables(&mut connector, GetTablesInput::default());

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "\"Schema\",\"Table\",\"Description\"");
    assert_eq!(lines[1], "\"SAPABAP1\",\"MARA\",\"Materials\"");
    assert_eq!(lines.len(), 3);
}

/// Schema and Catalog columns only appear when some row reports them.
#[test]
fn test_get_tables_hides_empty_identifier_columns() {
    let mut connector = MockConnector::with_tables(vec![table("", "", "MARA", "")]);

    let output = get_tables(&mut connector, GetTablesInput::default());

    assert_eq!(output.lines().next(), Some("\"Table\",\"Description\""));
}

/// A single non-empty catalog anywhere in the batch turns the column on.
#[test]
fn test_get_tables_shows_catalog_when_reported() {
    let mut connector = MockConnector::with_tables(vec![
        table("", "dbo", "A", ""),
        table("PROD", "dbo", "B", ""),
    ]);

    let output = get_tables(&mut connector, GetTablesInput::default());

    assert_eq!(
        output.lines().next(),
        Some("\"Catalog\",\"Schema\",\"Table\",\"Description\"")
    );
}

/// The search filter matches table names case-insensitively.
#[test]
fn test_get_tables_search_is_case_insensitive() {
    let mut connector = MockConnector::with_tables(vec![
        table("", "S", "OITM", ""),
        table("", "S", "ordr", ""),
        table("", "S", "itm_hist", ""),
    ]);

    let input = GetTablesInput {
        search: Some("ITM".to_string()),
        ..GetTablesInput::default()
    };
    let output = get_tables(&mut connector, input);

    assert!(output.contains("\"OITM\""));
    assert!(output.contains("\"itm_hist\""));
    assert!(!output.contains("ordr"));
}

/// The limit bounds the returned rows.
#[test]
fn test_get_tables_limit() {
    let tables = (0..10)
        .map(|i| table("", "S", &format!("T{}", i), ""))
        .collect();
    let mut connector = MockConnector::with_tables(tables);

    let input = GetTablesInput {
        limit: Some(3),
        ..GetTablesInput::default()
    };
    let output = get_tables(&mut connector, input);

    // header + 3 rows
    assert_eq!(output.lines().count(), 4);
}

/// Empty result yields the sentinel, not an error and not an empty string.
#[test]
fn test_get_tables_empty_sentinel() {
    let mut connector = MockConnector::default();

    let output = get_tables(&mut connector, GetTablesInput::default());

    assert_eq!(output, "No tables found.");
}

/// Connector failures render as ERROR text, never as a protocol fault.
#[test]
fn test_get_tables_error_rendered_as_text() {
    let mut connector = MockConnector::failing("catalog view unavailable");

    let output = get_tables(&mut connector, GetTablesInput::default());

    assert!(output.starts_with("ERROR: "));
    assert!(output.contains("catalog view unavailable"));
}

// =========================================================================
// get_columns
// =========================================================================

/// A missing table parameter short-circuits before the connector is called.
#[test]
fn test_get_columns_requires_table() {
    let mut connector = MockConnector::default();

    let output = get_columns(&mut connector, GetColumnsInput::default());

    assert_eq!(output, "ERROR: table parameter is required");
    assert_eq!(connector.get_columns_calls, 0);
}

/// Columns render in backend order with the fixed trailing column set.
#[test]
fn test_get_columns_output_shape() {
    let mut connector = MockConnector::with_columns(vec![
        column("SAPABAP1", "MARA", "MATNR", "NVARCHAR"),
        column("SAPABAP1", "MARA", "MTART", "NVARCHAR"),
    ]);

    let input = GetColumnsInput {
        table: "MARA".to_string(),
        ..GetColumnsInput::default()
    };
    let output = get_columns(&mut connector, input);

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines[0],
        "\"Schema\",\"Table\",\"Column\",\"DataType\",\"Description\""
    );
    assert_eq!(
        lines[1],
        "\"SAPABAP1\",\"MARA\",\"MATNR\",\"NVARCHAR\",\"\""
    );
    assert_eq!(lines.len(), 3);
}

/// Schema column disappears when no backend row reports a schema.
#[test]
fn test_get_columns_without_schema() {
    let mut connector =
        MockConnector::with_columns(vec![column("", "MARA", "MATNR", "NVARCHAR")]);

    let input = GetColumnsInput {
        table: "MARA".to_string(),
        ..GetColumnsInput::default()
    };
    let output = get_columns(&mut connector, input);

    assert_eq!(
        output.lines().next(),
        Some("\"Table\",\"Column\",\"DataType\",\"Description\"")
    );
}

/// Empty result names the table in the sentinel.
#[test]
fn test_get_columns_empty_sentinel() {
    let mut connector = MockConnector::default();

    let input = GetColumnsInput {
        table: "UNKNOWN".to_string(),
        ..GetColumnsInput::default()
    };
    let output = get_columns(&mut connector, input);

    assert_eq!(output, "No columns found for table: UNKNOWN");
}

/// Connector failures render as ERROR text.
#[test]
fn test_get_columns_error_rendered_as_text() {
    let mut connector = MockConnector::failing("permission denied");

    let input = GetColumnsInput {
        table: "MARA".to_string(),
        ..GetColumnsInput::default()
    };
    let output = get_columns(&mut connector, input);

    assert!(output.starts_with("ERROR: "));
    assert!(output.contains("permission denied"));
}

// =========================================================================
// run_query error channel
// =========================================================================

/// Backend failures during execution render as ERROR text.
#[test]
fn test_run_query_error_rendered_as_text() {
    let mut connector = MockConnector::failing("sql syntax error");

    let input = RunQueryInput {
        sql: "SELECT * FROM T LIMIT 1".to_string(),
    };
    let output = run_query(&mut connector, input);

    assert!(output.starts_with("ERROR: "));
    assert!(output.contains("sql syntax error"));
}

/// Duplicate-free happy path: rows render with first-row key order.
#[test]
fn test_run_query_renders_rows() {
    let mut connector = MockConnector::with_rows(vec![
        row(&[("MATNR", "1000"), ("MTART", "FERT")]),
        row(&[("MATNR", "1001"), ("MTART", "HALB")]),
    ]);

    let input = RunQueryInput {
        sql: "SELECT MATNR, MTART FROM MARA LIMIT 2".to_string(),
    };
    let output = run_query(&mut connector, input);

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "\"MATNR\",\"MTART\"");
    assert_eq!(lines[1], "\"1000\",\"FERT\"");
    assert_eq!(lines[2], "\"1001\",\"HALB\"");
}

// =========================================================================
// Connection probing
// =========================================================================

/// test_connection never raises; the failure detail is retrievable.
#[test]
fn test_unreachable_backend_reports_false_with_detail() {
    let mut connector = MockConnector {
        unreachable: true,
        ..MockConnector::default()
    };

    assert!(!connector.test_connection());
    let detail = connector.last_error().expect("detail should be retained");
    assert!(!detail.is_empty());
}
