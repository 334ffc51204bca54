//! Error types for Databricks MCP operations
//!
//! Validation and configuration failures are raised before any statement
//! reaches the warehouse. Everything else comes from the warehouse driver and
//! is passed through without reinterpretation.

use mcp_common::{IntoMcpError, McpError};
use thiserror::Error;

/// Errors that can occur while building or executing a statement
#[derive(Error, Debug)]
pub enum DatabricksError {
    /// A required tool argument is missing or unacceptable
    #[error("{0}")]
    Validation(String),

    /// A row value outside null/string/boolean/number
    #[error("unsupported value for column '{column}': expected null, string, boolean or number, got {kind}")]
    InvalidValue { column: String, kind: &'static str },

    /// Write tool called while the server runs read-only
    #[error("write operations are disabled (read_only = true)")]
    ReadOnly,

    /// Missing or malformed configuration, including an unresolvable catalog
    #[error("{0}")]
    Config(String),

    /// Transport-level failure talking to the warehouse
    #[error("warehouse request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Warehouse answered with a non-success HTTP status
    #[error("warehouse API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Statement reached a terminal state other than SUCCEEDED
    #[error("statement {statement_id} {state}: {message}")]
    Statement {
        statement_id: String,
        state: String,
        message: String,
    },

    /// Result did not have the columns or row shape the caller relies on
    #[error("unexpected result shape: {0}")]
    UnexpectedShape(String),

    #[error("invalid warehouse URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to decode warehouse response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias for Databricks operations
pub type DatabricksResult<T> = Result<T, DatabricksError>;

impl DatabricksError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True for errors caused by the caller's arguments or setup rather than
    /// by the warehouse
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidValue { .. } | Self::ReadOnly | Self::Config(_)
        )
    }
}

impl IntoMcpError for DatabricksError {
    fn into_mcp_error(self) -> McpError {
        if self.is_caller_error() {
            McpError::invalid_params(self.to_string(), None)
        } else {
            McpError::internal_error(self.to_string(), None)
        }
    }
}

impl From<DatabricksError> for McpError {
    fn from(e: DatabricksError) -> Self {
        e.into_mcp_error()
    }
}
