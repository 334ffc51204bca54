//! MCP Common - Shared plumbing for MCP servers
//!
//! - **Initialization**: [`serve_stdio!`] builds the server and serves it over stdio
//! - **Results**: [`json_success`] turns any serializable value into a tool result
//! - **Errors**: [`IntoMcpError`] for mapping domain errors to MCP error codes
//! - **Embeddable**: [`EmbeddableMcp`] trait for in-process tool calls
//!
//! # Example
//!
//! ```rust,ignore
//! // main.rs
//! mcp_common::serve_stdio!(DatabricksMcpServer, "databricks_mcp");
//!
//! // inside a tool
//! let result = handlers::sql_query(&self.executor, params).await?;
//! json_success(&result)
//! ```

pub mod embeddable;
pub mod error;
pub mod init;
pub mod result;

// Re-export commonly used items at crate root
pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::IntoMcpError;
pub use init::init_tracing;
pub use result::json_success;

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Tool},
    ErrorData as McpError,
};

// Re-export async_trait for implementing EmbeddableMcp
pub use async_trait::async_trait;
