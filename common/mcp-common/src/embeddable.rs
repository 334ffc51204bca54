//! In-process tool invocation
//!
//! [`EmbeddableMcp`] lets a host call an MCP server's tools directly, without
//! a stdio transport in between. Integration tests use the same path.
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//!
//! let server = DatabricksMcpServer::try_new()?;
//! let result = server
//!     .call_tool("list_tables", serde_json::json!({ "catalog": "shop" }))
//!     .await?;
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

/// Error type for embeddable MCP operations
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    /// No tool with that name
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Parameters did not deserialize into the tool's parameter type
    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),

    /// The tool ran and returned an MCP error
    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

/// Result type for embeddable MCP operations
pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// An MCP server whose tools can be called in-process
///
/// Implementations must be `Send + Sync`; tool calls may arrive concurrently
/// from several tasks. Servers built with `#[tool_router]` list their tools
/// via `self.tool_router.list_all()` and dispatch `call_tool` by name.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Name used in MCP configuration files
    fn server_name(&self) -> &str;

    fn list_tools(&self) -> Vec<Tool>;

    /// Run the named tool with JSON object parameters
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    fn server_description(&self) -> Option<&str> {
        None
    }

    fn server_version(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoServer;

    #[async_trait]
    impl EmbeddableMcp for EchoServer {
        fn server_name(&self) -> &str {
            "echo"
        }

        fn list_tools(&self) -> Vec<Tool> {
            vec![]
        }

        async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
            if name != "echo" {
                return Err(EmbeddableError::ToolNotFound(name.to_string()));
            }
            let text: String = serde_json::from_value(params)?;
            Ok(crate::json_success(&text)?)
        }
    }

    #[test]
    fn test_defaults() {
        let server = EchoServer;
        assert_eq!(server.server_name(), "echo");
        assert!(server.list_tools().is_empty());
        assert!(server.server_description().is_none());
        assert!(server.server_version().is_none());
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let result = EchoServer.call_tool("unknown", serde_json::json!({})).await;
        assert!(matches!(result, Err(EmbeddableError::ToolNotFound(_))));
    }

    #[tokio::test]
    async fn test_bad_params() {
        let result = EchoServer.call_tool("echo", serde_json::json!({"a": 1})).await;
        assert!(matches!(result, Err(EmbeddableError::InvalidParams(_))));
    }

    #[test]
    fn test_mcp_error_message_is_kept() {
        let err: EmbeddableError = rmcp::ErrorData::invalid_params("Provide a table name.", None).into();
        assert_eq!(err.to_string(), "mcp error: Provide a table name.");
    }
}
