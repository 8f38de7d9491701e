//! SAP MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools for AI assistants
//! to explore and query SAP HANA and generic ODBC data sources.

pub mod config;
pub mod connectors;
pub mod error;
pub mod mcp;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use connectors::Connector;
pub use error::ConnectorError;
pub use mcp::SapService;
