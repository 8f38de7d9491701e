//! Query execution tool.
//!
//! Execute a SQL SELECT statement. Use the get_tables tool to get a list of
//! available tables, and the get_columns tool to list table columns. The SQL
//! dialect is based on SQL-92. The output of the tool will be returned in
//! CSV format, with the first line containing column headers.
//!
//! The safety guard is a textual heuristic, not a parser: the statement must
//! begin with SELECT, and a fixed keyword denylist is matched as substrings
//! of the upper-cased text. Keywords inside string literals false-positive;
//! vendor-specific mutating constructs wrapped in a SELECT pass through.

use crate::connectors::Connector;
use crate::tools::csv::to_csv;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

/// Agent-facing tool description.
pub const DESCRIPTION: &str = "Execute a SQL SELECT statement.\n\
    \n\
    Use the get_tables tool to get a list of available tables, and the get_columns tool to list table columns.\n\
    \n\
    The SQL dialect is based on SQL-92.\n\
    Identifiers should be quoted using double quotes (\"\").\n\
    Valid clauses: SELECT, FROM, WHERE, INNER JOIN, LEFT JOIN, GROUP BY, ORDER BY, LIMIT/OFFSET.\n\
    \n\
    The output of the tool will be returned in CSV format, with the first line containing column headers.";

/// Denylisted keywords, in scan order. First match wins the error message.
const BLOCKED_KEYWORDS: [&str; 7] = [
    "INSERT", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "TRUNCATE",
];

/// Clause appended to unbounded statements.
const ROW_CAP_CLAUSE: &str = " LIMIT 50";

/// Notice prefixed to results when the row cap was applied.
const ROW_CAP_NOTE: &str =
    "Note: Query result limited to 50 rows for performance. Use explicit LIMIT to change this.";

/// Input for the run_query tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct RunQueryInput {
    /// The SELECT statement to execute
    #[serde(default)]
    pub sql: String,
}

/// Handle the run_query tool call. Always returns a single text blob.
pub fn run_query(connector: &mut dyn Connector, input: RunQueryInput) -> String {
    if input.sql.is_empty() {
        return "ERROR: sql parameter is required".to_string();
    }

    let sql_upper = input.sql.trim().to_uppercase();
    if !sql_upper.starts_with("SELECT") {
        return "ERROR: Only SELECT statements are allowed".to_string();
    }

    for keyword in BLOCKED_KEYWORDS {
        if sql_upper.contains(keyword) {
            return format!("ERROR: {} statements are not allowed", keyword);
        }
    }

    // Cap unbounded statements by plain text appending. A trailing semicolon
    // or comment defeats this; accepted limitation of the text-only guard.
    let mut sql = input.sql;
    let mut cap_applied = false;
    if !sql_upper.contains("LIMIT") && !sql_upper.contains("TOP") {
        sql.push_str(ROW_CAP_CLAUSE);
        cap_applied = true;
    }

    match connector.execute_query(&sql) {
        Ok(rows) => {
            debug!(row_count = rows.len(), cap_applied, "Query executed");
            if rows.is_empty() {
                return "Query returned no results.".to_string();
            }

            let csv = to_csv(&rows, None);
            if cap_applied {
                format!("{}\n\n{}", ROW_CAP_NOTE, csv)
            } else {
                csv
            }
        }
        Err(e) => format!("ERROR: {}", e),
    }
}
