//! Databricks MCP Library
//!
//! MCP tools for a Databricks SQL warehouse: list tables, run read-only
//! queries, and insert/update/delete rows. Every call builds one SQL
//! statement and runs it over its own connection.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use databricks_mcp::DatabricksMcpServer;
//! use mcp_common::EmbeddableMcp;
//!
//! let server = DatabricksMcpServer::try_new()?;
//! let result = server
//!     .call_tool("sql_query", serde_json::json!({ "query": "select * from shop.core.products" }))
//!     .await?;
//! ```
//!
//! # Configuration
//! Set `DATABRICKS_HOST`, `DATABRICKS_HTTP_PATH` and `DATABRICKS_TOKEN`, or
//! configure them in `~/.binks/databricks.toml`. See [`config`].

pub mod config;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod params;
pub mod server;
pub mod sql;
pub mod types;
pub mod warehouse;

// Re-export main server type
pub use server::DatabricksMcpServer;

pub use config::DatabricksConfig;
pub use error::{DatabricksError, DatabricksResult};
pub use executor::{QueryExecutor, SqlConnection, SqlConnector, StatementOutcome};

// Re-export parameter types for direct API usage
pub use params::*;
