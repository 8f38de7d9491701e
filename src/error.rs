//! Error types for the SAP MCP Server.
//!
//! This module defines all error types using `thiserror` for ergonomic error
//! handling. Errors cross the connector boundary as descriptive text, never
//! as raw driver error objects.

use thiserror::Error;

/// Maximum length of raw backend error text kept for display.
pub const MAX_ERROR_DISPLAY_LEN: usize = 500;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("failed to establish backend connection: {message}")]
    Connection { message: String },

    #[error("database driver not available: {message}")]
    DriverMissing { message: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("backend error: {message}")]
    Backend { message: String },
}

impl ConnectorError {
    /// Create a connection error, truncating the raw backend text for display.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: truncate_for_display(message.into()),
        }
    }

    /// Create a driver-missing error.
    pub fn driver_missing(message: impl Into<String>) -> Self {
        Self::DriverMissing {
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: truncate_for_display(message.into()),
        }
    }
}

/// Cap error text so a driver dumping its whole state stays readable.
fn truncate_for_display(mut message: String) -> String {
    if message.chars().count() > MAX_ERROR_DISPLAY_LEN {
        message = message.chars().take(MAX_ERROR_DISPLAY_LEN).collect();
        message.push_str("...");
    }
    message
}

/// Convert hdbconnect errors to ConnectorError.
impl From<hdbconnect::HdbError> for ConnectorError {
    fn from(err: hdbconnect::HdbError) -> Self {
        ConnectorError::backend(err.to_string())
    }
}

/// Convert odbc-api errors to ConnectorError.
impl From<odbc_api::Error> for ConnectorError {
    fn from(err: odbc_api::Error) -> Self {
        ConnectorError::backend(err.to_string())
    }
}

/// Result type alias for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Errors raised by the server shell (transports, startup) rather than by
/// a connector operation.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("failed to connect to database: {message}")]
    Startup { message: String },
}

impl ServerError {
    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a startup error.
    pub fn startup(message: impl Into<String>) -> Self {
        Self::Startup {
            message: message.into(),
        }
    }
}

/// Result type alias for server shell operations.
pub type ServerResult<T> = Result<T, ServerError>;
