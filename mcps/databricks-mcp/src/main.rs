//! Databricks MCP Server
//!
//! Serves the Databricks SQL tools over stdio. Startup fails when the
//! warehouse connection settings are missing.

use databricks_mcp::DatabricksMcpServer;

mcp_common::serve_stdio!(DatabricksMcpServer, "databricks_mcp");
