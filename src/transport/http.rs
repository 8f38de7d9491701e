//! HTTP transport with Streamable HTTP support for the MCP server.
//!
//! This transport uses HTTP with SSE streaming responses,
//! which is suitable for web-based MCP integrations.

use crate::error::{ServerError, ServerResult};
use crate::mcp::{SapService, SharedConnector};
use crate::transport::Transport;
use crate::transport::stdio::close_connector;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

/// HTTP transport implementation with Streamable HTTP support.
///
/// This transport provides:
/// - HTTP endpoints for MCP protocol messages
/// - Server-Sent Events for streaming responses
/// - Session management for stateful connections
pub struct HttpTransport {
    service: SapService,
    connector: SharedConnector,
    /// Host to bind to
    host: String,
    /// Port to bind to
    port: u16,
}

impl HttpTransport {
    /// Create a new HTTP transport serving the given service.
    pub fn new(
        service: SapService,
        connector: SharedConnector,
        host: impl Into<String>,
        port: u16,
    ) -> Self {
        Self {
            service,
            connector,
            host: host.into(),
            port,
        }
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Transport for HttpTransport {
    async fn run(&self) -> ServerResult<()> {
        let bind_addr = self.bind_addr();
        info!("Starting MCP server with HTTP transport on {}", bind_addr);

        // Clone for the service factory closure
        let service = self.service.clone();

        // Create the StreamableHttpService with a factory that hands out
        // clones of the shared service
        let http_service = StreamableHttpService::new(
            move || Ok(service.clone()),
            LocalSessionManager::default().into(),
            Default::default(),
        );

        // Serve the MCP protocol from the root path
        let app = axum::Router::new().fallback_service(http_service);

        let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
            ServerError::transport(format!("Failed to bind to {}: {}", bind_addr, e))
        })?;

        info!("MCP endpoint ready");

        // Graceful shutdown: SSE connections may keep the server alive
        // indefinitely, so force exit after a timeout once a shutdown
        // signal is received
        const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(30);

        let shutdown_notify = Arc::new(tokio::sync::Notify::new());
        let shutdown_notify_clone = shutdown_notify.clone();

        let shutdown_signal = async move {
            wait_for_signal().await;
            shutdown_notify_clone.notify_one();
        };

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal);

        // Race between: server completing normally vs forced timeout/second
        // signal after shutdown
        tokio::select! {
            result = server => {
                match result {
                    Ok(()) => info!("HTTP server stopped"),
                    Err(e) => {
                        error!(error = %e, "HTTP server error");
                        return Err(ServerError::transport(format!(
                            "HTTP server error: {}",
                            e
                        )));
                    }
                }
            }
            _ = async {
                // Wait for shutdown signal, then wait for either timeout or second signal
                shutdown_notify.notified().await;
                info!(
                    timeout_secs = GRACEFUL_TIMEOUT.as_secs(),
                    "Waiting for connections to close (send signal again to force exit)..."
                );

                tokio::select! {
                    _ = tokio::time::sleep(GRACEFUL_TIMEOUT) => {
                        warn!("Graceful shutdown timeout, forcing exit");
                    }
                    _ = wait_for_signal() => {
                        warn!("Received second signal, forcing immediate exit");
                    }
                }
            } => {
                // Timeout or second signal reached - server will be dropped
            }
        }

        // Release the database connection
        info!("Closing database connection");
        close_connector(&self.connector);

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn wait_for_signal() {
    let ctrl_c = signal::ctrl_c();

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
