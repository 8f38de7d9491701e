//! SAP MCP Server - Main entry point.
//!
//! This server provides MCP (Model Context Protocol) tools for AI assistants
//! to explore and query SAP HANA and generic ODBC data sources.

use clap::Parser;
use sap_mcp_server::config::{self, Cli, TransportMode};
use sap_mcp_server::connectors::create_connector;
use sap_mcp_server::mcp::{SapService, SharedConnector};
use sap_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Stdout stays clean for the stdio transport: logs go to the configured
/// log file, or to stderr when none is set.
fn init_tracing(json_logs: bool, log_file: Option<&Path>) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))?;
            let writer = Arc::new(file);
            if json_logs {
                registry.with(fmt::layer().json().with_writer(writer)).init();
            } else {
                registry
                    .with(fmt::layer().with_ansi(false).with_writer(writer))
                    .init();
            }
        }
        None => {
            if json_logs {
                registry
                    .with(fmt::layer().json().with_writer(std::io::stderr))
                    .init();
            } else {
                registry
                    .with(
                        fmt::layer()
                            .with_target(true)
                            .with_writer(std::io::stderr),
                    )
                    .init();
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load and validate the configuration file
    let config = match config::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let errors = config.validate();
    if !errors.is_empty() {
        eprintln!("Configuration errors:");
        for e in &errors {
            eprintln!("  - {}", e);
        }
        std::process::exit(1);
    }

    if let Err(e) = init_tracing(cli.json_logs, config.log_file.as_deref()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    info!(
        transport = %cli.transport,
        connector = config.connector.type_name(),
        "Starting SAP MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Gate server startup on a working database connection. The probe is
    // blocking driver work, so it runs off the async runtime.
    let connector = create_connector(&config.connector);
    let (connector, probe_ok, probe_detail) = tokio::task::spawn_blocking(move || {
        let mut connector = connector;
        let ok = connector.test_connection();
        let detail = connector.last_error().map(str::to_string);
        (connector, ok, detail)
    })
    .await?;

    if !probe_ok {
        let mut message = "Failed to connect to database.".to_string();
        if let Some(detail) = probe_detail {
            message.push_str(&format!("\nDetails: {}", detail));
        }
        message.push_str("\n\nPlease check your configuration.");
        eprintln!("Connection Error: {}", message);
        std::process::exit(1);
    }
    info!("Database connection successful");

    let connector: SharedConnector = Arc::new(Mutex::new(connector));
    let service = SapService::new(
        connector.clone(),
        config.server.name.clone(),
        config.server.prefix.clone(),
        config.server.version.clone(),
    );

    // Run the appropriate transport
    let result = match cli.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            let transport = StdioTransport::new(service, connector);
            transport.run().await
        }
        TransportMode::Http => {
            let port = cli.port.unwrap_or(config.server.http_port);
            info!(host = %cli.host, port, "Using HTTP transport");
            let transport = HttpTransport::new(service, connector, cli.host.clone(), port);
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
