//! SAP HANA connector using the native hdbconnect driver.
//!
//! Table and column metadata come from HANA's `SYS.TABLES` and
//! `SYS.TABLE_COLUMNS` system views, so schema/search filters and the row
//! limit are pushed down to the server.

use crate::config::HanaConfig;
use crate::connectors::{ColumnInfo, Connector, Row, TableInfo};
use crate::error::{ConnectorError, ConnectorResult};
use hdbconnect::{ConnectParams, Connection, HdbValue, ServerCerts};
use tracing::debug;

pub struct HanaConnector {
    config: HanaConfig,
    connection: Option<Connection>,
    last_error: Option<String>,
}

impl HanaConnector {
    pub fn new(config: HanaConfig) -> Self {
        Self {
            config,
            connection: None,
            last_error: None,
        }
    }

    fn build_params(&self) -> ConnectorResult<ConnectParams> {
        let mut builder = ConnectParams::builder();
        builder
            .hostname(&self.config.host)
            .port(self.config.port)
            .dbuser(&self.config.user)
            .password(&self.config.password);

        // Tenant database for multi-tenant installations
        if !self.config.database_name.is_empty() {
            builder.dbname(&self.config.database_name);
        }

        if self.config.encrypt {
            if self.config.ssl_validate_certificate {
                builder.tls_with(ServerCerts::RootCertificates);
            } else {
                builder.tls_without_server_verification();
            }
        }

        builder
            .build()
            .map_err(|e| ConnectorError::connection(e.to_string()))
    }

    /// Get the existing connection or establish a new one.
    fn live_connection(&mut self) -> ConnectorResult<&mut Connection> {
        if self.connection.is_none() {
            self.connect()?;
        }
        match self.connection.as_mut() {
            Some(conn) => Ok(conn),
            None => Err(ConnectorError::connection(
                "connection slot empty after connect",
            )),
        }
    }

    /// Build the SYS.TABLES query for the given filters.
    fn tables_query(schema: Option<&str>, search: Option<&str>, limit: u32) -> (String, Vec<String>) {
        let mut sql = String::from(
            "SELECT SCHEMA_NAME, TABLE_NAME, COMMENTS FROM SYS.TABLES WHERE 1 = 1",
        );
        let mut params = Vec::new();

        if let Some(schema) = schema {
            sql.push_str(" AND SCHEMA_NAME = ?");
            params.push(schema.to_string());
        }
        if let Some(search) = search {
            // Case-insensitive substring match on the table name
            sql.push_str(" AND UPPER(TABLE_NAME) LIKE ?");
            params.push(format!("%{}%", search.to_uppercase()));
        }

        sql.push_str(" ORDER BY SCHEMA_NAME, TABLE_NAME");
        sql.push_str(&format!(" LIMIT {}", limit));

        (sql, params)
    }

    /// Build the SYS.TABLE_COLUMNS query for the given table.
    fn columns_query(table: &str, schema: Option<&str>) -> (String, Vec<String>) {
        let mut sql = String::from(
            "SELECT SCHEMA_NAME, TABLE_NAME, COLUMN_NAME, DATA_TYPE_NAME, COMMENTS \
             FROM SYS.TABLE_COLUMNS WHERE TABLE_NAME = ?",
        );
        let mut params = vec![table.to_string()];

        if let Some(schema) = schema {
            sql.push_str(" AND SCHEMA_NAME = ?");
            params.push(schema.to_string());
        }

        sql.push_str(" ORDER BY POSITION");

        (sql, params)
    }
}

/// Render a HANA value as text. NULL becomes an empty field.
fn render_value(value: HdbValue) -> String {
    match value {
        HdbValue::NULL => String::new(),
        other => other.to_string(),
    }
}

impl Connector for HanaConnector {
    fn connect(&mut self) -> ConnectorResult<()> {
        let params = self.build_params()?;
        debug!(host = %self.config.host, port = self.config.port, "Connecting to HANA");

        let connection =
            Connection::new(params).map_err(|e| ConnectorError::connection(e.to_string()))?;

        // Replace any previous handle; the old connection drops here.
        self.connection = Some(connection);
        Ok(())
    }

    fn get_tables(
        &mut self,
        _catalog: Option<&str>,
        schema: Option<&str>,
        search: Option<&str>,
        limit: u32,
    ) -> ConnectorResult<Vec<TableInfo>> {
        let (sql, params) = Self::tables_query(schema, search, limit);
        let conn = self.live_connection()?;

        let mut stmt = conn.prepare(&sql)?;
        let resultset = stmt.execute(&params)?.into_result_set()?;

        let mut tables = Vec::new();
        for row in resultset {
            let row = row?;
            let (schema, name, description): (String, String, Option<String>) = row.try_into()?;
            tables.push(TableInfo {
                catalog: String::new(),
                schema,
                name,
                description: description.unwrap_or_default(),
            });
        }
        Ok(tables)
    }

    fn get_columns(
        &mut self,
        table: &str,
        _catalog: Option<&str>,
        schema: Option<&str>,
    ) -> ConnectorResult<Vec<ColumnInfo>> {
        if table.is_empty() {
            return Err(ConnectorError::invalid_argument("table name is required"));
        }

        let (sql, params) = Self::columns_query(table, schema);
        let conn = self.live_connection()?;

        let mut stmt = conn.prepare(&sql)?;
        let resultset = stmt.execute(&params)?.into_result_set()?;

        let mut columns = Vec::new();
        for row in resultset {
            let row = row?;
            let (schema, table, name, data_type, description): (
                String,
                String,
                String,
                String,
                Option<String>,
            ) = row.try_into()?;
            columns.push(ColumnInfo {
                catalog: String::new(),
                schema,
                table,
                name,
                data_type,
                description: description.unwrap_or_default(),
            });
        }
        Ok(columns)
    }

    fn execute_query(&mut self, sql: &str) -> ConnectorResult<Vec<Row>> {
        let conn = self.live_connection()?;
        let resultset = conn.query(sql)?;

        // Column names come from the result-set metadata, case as reported.
        let field_names: Vec<String> = resultset
            .metadata()
            .iter()
            .map(|field| field.displayname().to_string())
            .collect();

        let mut rows = Vec::new();
        for row in resultset {
            let mut row = row?;
            let mut out = Row::new();
            for name in &field_names {
                let value = match row.next_value() {
                    Some(value) => render_value(value),
                    None => String::new(),
                };
                out.insert(name.clone(), value);
            }
            rows.push(out);
        }
        Ok(rows)
    }

    fn test_connection(&mut self) -> bool {
        let probe = self
            .live_connection()
            .and_then(|conn| conn.query("SELECT 1 FROM DUMMY").map_err(Into::into))
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
            debug!("HANA connection closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_query_unfiltered() {
        let (sql, params) = HanaConnector::tables_query(None, None, 50);
        assert_eq!(
            sql,
            "SELECT SCHEMA_NAME, TABLE_NAME, COMMENTS FROM SYS.TABLES WHERE 1 = 1 \
             ORDER BY SCHEMA_NAME, TABLE_NAME LIMIT 50"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_tables_query_schema_filter_is_exact() {
        let (sql, params) = HanaConnector::tables_query(Some("SAPABAP1"), None, 50);
        assert!(sql.contains("SCHEMA_NAME = ?"));
        assert_eq!(params, vec!["SAPABAP1".to_string()]);
    }

    #[test]
    fn test_tables_query_search_is_uppercased_substring() {
        let (sql, params) = HanaConnector::tables_query(None, Some("itm"), 50);
        assert!(sql.contains("UPPER(TABLE_NAME) LIKE ?"));
        assert_eq!(params, vec!["%ITM%".to_string()]);
    }

    #[test]
    fn test_tables_query_limit_pushdown() {
        let (sql, _) = HanaConnector::tables_query(None, None, 7);
        assert!(sql.ends_with(" LIMIT 7"));
    }

    #[test]
    fn test_columns_query_orders_by_position() {
        let (sql, params) = HanaConnector::columns_query("MARA", Some("SAPABAP1"));
        assert!(sql.starts_with("SELECT SCHEMA_NAME, TABLE_NAME, COLUMN_NAME"));
        assert!(sql.contains("TABLE_NAME = ?"));
        assert!(sql.contains("SCHEMA_NAME = ?"));
        assert!(sql.ends_with(" ORDER BY POSITION"));
        assert_eq!(params, vec!["MARA".to_string(), "SAPABAP1".to_string()]);
    }

    #[test]
    fn test_get_columns_requires_table() {
        let mut connector = HanaConnector::new(HanaConfig {
            host: "localhost".into(),
            port: 30015,
            user: "u".into(),
            password: "p".into(),
            database_name: String::new(),
            encrypt: false,
            ssl_validate_certificate: true,
        });
        let err = connector.get_columns("", None, None).unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidArgument { .. }));
    }
}
