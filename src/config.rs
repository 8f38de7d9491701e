//! Configuration handling for the SAP MCP Server.
//!
//! Runtime options (transport, bind address) come from CLI arguments and
//! environment variables; the server identity and connector parameters come
//! from a YAML configuration file.

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8088;
/// System DB port for multi-tenant HANA installations.
pub const DEFAULT_HANA_PORT: u16 = 30013;

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// HTTP with streamable responses (for web clients)
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Command line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sap-mcp-server",
    about = "MCP server for SAP HANA and ODBC data sources - enables AI assistants to explore schemas and run SELECT queries",
    version,
    author
)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "SAP_MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// Host to bind to (only used with http transport)
    #[arg(long, default_value = DEFAULT_HTTP_HOST, env = "SAP_MCP_HTTP_HOST")]
    pub host: String,

    /// Port for the http transport. Overrides server.http_port from the config file.
    #[arg(short, long, env = "SAP_MCP_HTTP_PORT")]
    pub port: Option<u16>,

    /// Enable JSON logging format
    #[arg(long, env = "SAP_MCP_JSON_LOGS")]
    pub json_logs: bool,
}

/// Server identity section of the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name reported during MCP initialization
    pub name: String,
    /// Tool name prefix, e.g. "sap_hana" yields "sap_hana_get_tables"
    pub prefix: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_http_port() -> u16 {
    DEFAULT_HTTP_PORT
}

fn default_hana_port() -> u16 {
    DEFAULT_HANA_PORT
}

fn default_true() -> bool {
    true
}

/// SAP HANA connection parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct HanaConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_hana_port")]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    /// Tenant database name for multi-tenant HANA. Empty means direct connect.
    #[serde(default)]
    pub database_name: String,
    #[serde(default)]
    pub encrypt: bool,
    #[serde(default = "default_true", rename = "sslValidateCertificate")]
    pub ssl_validate_certificate: bool,
}

/// Generic ODBC connection parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct OdbcConfig {
    #[serde(default)]
    pub connection_string: String,
}

/// Connector selection, tagged by `type` in the YAML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConnectorConfig {
    Hana(HanaConfig),
    Odbc(OdbcConfig),
}

impl ConnectorConfig {
    /// Type tag as written in the configuration file.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Hana(_) => "hana",
            Self::Odbc(_) => "odbc",
        }
    }
}

/// Resolved configuration file contents.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub connector: ConnectorConfig,
    /// Optional log file. Without it, logs go to stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Validate the configuration and return the list of problems found.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.server.name.is_empty() {
            errors.push("Server name is required".to_string());
        }
        if self.server.prefix.is_empty() {
            errors.push("Server prefix is required".to_string());
        }

        match &self.connector {
            ConnectorConfig::Hana(hana) => {
                if hana.host.is_empty() {
                    errors.push("HANA host is required".to_string());
                }
                if hana.user.is_empty() {
                    errors.push("HANA user is required".to_string());
                }
                if hana.password.is_empty() {
                    errors.push("HANA password is required".to_string());
                }
            }
            ConnectorConfig::Odbc(odbc) => {
                if odbc.connection_string.is_empty() {
                    errors.push("ODBC connection_string is required".to_string());
                }
            }
        }

        errors
    }
}

/// Load configuration from a YAML file.
pub fn load_config(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        return Err(format!("Configuration file not found: {}", path.display()));
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    serde_yaml::from_str(&contents).map_err(|e| format!("Invalid configuration: {}", e))
}
