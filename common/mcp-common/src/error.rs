//! Error conversion for MCP tools
//!
//! Domain error types implement [`IntoMcpError`] to decide which MCP error
//! code the caller sees; argument problems should become `invalid_params`,
//! everything else `internal_error`.

use rmcp::ErrorData as McpError;

/// Conversion into an MCP protocol error
///
/// ```rust,ignore
/// impl IntoMcpError for DatabricksError {
///     fn into_mcp_error(self) -> McpError {
///         if self.is_caller_error() {
///             McpError::invalid_params(self.to_string(), None)
///         } else {
///             McpError::internal_error(self.to_string(), None)
///         }
///     }
/// }
/// ```
pub trait IntoMcpError {
    fn into_mcp_error(self) -> McpError;
}
