//! MCP service implementation using rmcp.
//!
//! Tool names carry a runtime prefix from the configuration
//! (`<prefix>_get_tables`, `<prefix>_get_columns`, `<prefix>_run_query`),
//! so tools are advertised and dispatched by hand through `list_tools` /
//! `call_tool` instead of the compile-time tool router macros.

use crate::connectors::Connector;
use crate::tools::{self, GetColumnsInput, GetTablesInput, RunQueryInput};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject,
        ListToolsResult, PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
        Tool,
    },
    service::RequestContext,
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex};

/// Shared handle to the single connector instance.
///
/// Concurrent tool calls serialize on this mutex; the connector itself is
/// not safe for concurrent use.
pub type SharedConnector = Arc<Mutex<Box<dyn Connector>>>;

#[derive(Clone)]
pub struct SapService {
    connector: SharedConnector,
    prefix: String,
    name: String,
    version: String,
}

impl SapService {
    pub fn new(
        connector: SharedConnector,
        name: impl Into<String>,
        prefix: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            connector,
            prefix: prefix.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Fully qualified tool name for the configured prefix.
    fn tool_name(&self, suffix: &str) -> String {
        format!("{}_{}", self.prefix, suffix)
    }

    /// Run a blocking tool handler against the shared connector.
    async fn dispatch<F>(&self, run: F) -> Result<String, McpError>
    where
        F: FnOnce(&mut dyn Connector) -> String + Send + 'static,
    {
        let connector = self.connector.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = connector
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            run(guard.as_mut())
        })
        .await
        .map_err(|e| McpError::internal_error(format!("Tool execution task failed: {}", e), None))
    }
}

/// JSON schema for a tool input type.
fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(serde_json::Value::Object(schema)) => Arc::new(schema),
        _ => Arc::new(JsonObject::new()),
    }
}

/// Deserialize call arguments into a typed tool input.
fn parse_input<T: DeserializeOwned>(arguments: Option<JsonObject>) -> Result<T, McpError> {
    serde_json::from_value(serde_json::Value::Object(arguments.unwrap_or_default()))
        .map_err(|e| McpError::invalid_params(format!("Invalid tool arguments: {}", e), None))
}

impl ServerHandler for SapService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name.clone(),
                title: Some(self.name.clone()),
                version: self.version.clone(),
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "Read-only database access tools.\n\
                \n\
                ## Workflow\n\
                1. Call `{prefix}_get_tables` to discover tables (optional schema/search filters)\n\
                2. Call `{prefix}_get_columns` with a table name to inspect its columns\n\
                3. Call `{prefix}_run_query` with a SELECT statement\n\
                \n\
                All results are CSV text with a header line. Only SELECT statements are\n\
                accepted; unbounded queries are capped at 50 rows unless an explicit\n\
                LIMIT or TOP is given.",
                prefix = self.prefix
            )),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = vec![
            Tool::new(
                self.tool_name("get_tables"),
                tools::get_tables::DESCRIPTION,
                input_schema::<GetTablesInput>(),
            ),
            Tool::new(
                self.tool_name("get_columns"),
                tools::get_columns::DESCRIPTION,
                input_schema::<GetColumnsInput>(),
            ),
            Tool::new(
                self.tool_name("run_query"),
                tools::run_query::DESCRIPTION,
                input_schema::<RunQueryInput>(),
            ),
        ];

        Ok(ListToolsResult {
            tools,
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let name = request.name.to_string();

        let text = if name == self.tool_name("get_tables") {
            let input: GetTablesInput = parse_input(request.arguments)?;
            self.dispatch(move |connector| tools::get_tables(connector, input))
                .await?
        } else if name == self.tool_name("get_columns") {
            let input: GetColumnsInput = parse_input(request.arguments)?;
            self.dispatch(move |connector| tools::get_columns(connector, input))
                .await?
        } else if name == self.tool_name("run_query") {
            let input: RunQueryInput = parse_input(request.arguments)?;
            self.dispatch(move |connector| tools::run_query(connector, input))
                .await?
        } else {
            return Err(McpError::invalid_params(
                format!("Unknown tool: {}", name),
                None,
            ));
        };

        // Handler output is always a successful text result, including the
        // "ERROR: ..." strings; no structured error crosses this boundary.
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}
