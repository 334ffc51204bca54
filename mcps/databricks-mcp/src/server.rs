//! MCP Server implementation for Databricks SQL
//!
//! Tools delegate to [`crate::handlers`]; this module only wires parameters,
//! the read-only gate and JSON formatting.

use mcp_common::{
    async_trait, json_success, EmbeddableError, EmbeddableMcp, EmbeddableResult, McpError,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router,
};
use serde_json::Value;
use std::sync::Arc;

use crate::config::DatabricksConfig;
use crate::error::{DatabricksError, DatabricksResult};
use crate::executor::{QueryExecutor, SqlConnector};
use crate::handlers;
use crate::params::*;
use crate::sql::Namespace;
use crate::warehouse::WarehouseConnector;

const INSTRUCTIONS: &str = "Databricks SQL MCP server. Use list_tables to see tables in a \
     catalog.schema, sql_query for SELECT/SHOW/DESCRIBE (SELECTs are capped at 25 rows unless \
     they carry a LIMIT), and insert_row, update_rows, delete_rows to change data. Unqualified \
     table names resolve against the configured default catalog and schema.";

/// Databricks SQL MCP Server
#[derive(Clone)]
pub struct DatabricksMcpServer {
    executor: QueryExecutor,
    namespace: Namespace,
    read_only: bool,
    tool_router: ToolRouter<Self>,
}

impl DatabricksMcpServer {
    /// Build a server from the environment, failing when required settings are missing
    pub fn try_new() -> anyhow::Result<Self> {
        let config = DatabricksConfig::load()?;
        let connector = WarehouseConnector::new(&config)?;
        Ok(Self::with_connector(&config, Arc::new(connector)))
    }

    /// Build a server over any connector
    pub fn with_connector(config: &DatabricksConfig, connector: Arc<dyn SqlConnector>) -> Self {
        tracing::info!(
            default_catalog = ?config.default_catalog,
            default_schema = %config.default_schema,
            read_only = config.read_only,
            "Databricks MCP server configured"
        );

        Self {
            executor: QueryExecutor::new(connector),
            namespace: config.namespace(),
            read_only: config.read_only,
            tool_router: Self::tool_router(),
        }
    }

    fn ensure_writable(&self) -> DatabricksResult<()> {
        if self.read_only {
            return Err(DatabricksError::ReadOnly);
        }
        Ok(())
    }
}

#[tool_router]
impl DatabricksMcpServer {
    #[tool(description = "List tables in a catalog.schema. Falls back to the configured default catalog and schema. Returns {result: [{database, table, isTemporary}]}.")]
    async fn list_tables(
        &self,
        Parameters(params): Parameters<ListTablesParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = handlers::list_tables(&self.executor, &self.namespace, params).await?;
        json_success(&result)
    }

    #[tool(description = "Run a read-only query (SELECT / SHOW / DESCRIBE). A SELECT without LIMIT gets LIMIT 25 appended. Returns {columns, rows, rowcount}.")]
    async fn sql_query(
        &self,
        Parameters(params): Parameters<SqlQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("sql_query: {}", params.query.trim());
        let result = handlers::sql_query(&self.executor, params).await?;
        json_success(&result)
    }

    #[tool(description = "Insert a single row. `data` maps column names to values (string, number, boolean or null). Returns {success, affected_rows}.")]
    async fn insert_row(
        &self,
        Parameters(params): Parameters<InsertRowParams>,
    ) -> Result<CallToolResult, McpError> {
        self.ensure_writable()?;
        tracing::info!(table = %params.table, columns = params.data.len(), "insert_row");
        let result = handlers::insert_row(&self.executor, &self.namespace, params).await?;
        json_success(&result)
    }

    #[tool(description = "Update rows. Example: table=\"products\", set_data={\"price\": 1000}, where_sql=\"lower(name) = 'apple'\". A WHERE clause is required. Returns {success, affected_rows}.")]
    async fn update_rows(
        &self,
        Parameters(params): Parameters<UpdateRowsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.ensure_writable()?;
        tracing::info!(table = %params.table, where_sql = %params.where_sql, "update_rows");
        let result = handlers::update_rows(&self.executor, &self.namespace, params).await?;
        json_success(&result)
    }

    #[tool(description = "Delete rows. Example: table=\"shipments\", where_sql=\"status = 'pending'\". A WHERE clause is required. Returns {success, affected_rows}.")]
    async fn delete_rows(
        &self,
        Parameters(params): Parameters<DeleteRowsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.ensure_writable()?;
        tracing::info!(table = %params.table, where_sql = %params.where_sql, "delete_rows");
        let result = handlers::delete_rows(&self.executor, &self.namespace, params).await?;
        json_success(&result)
    }
}

#[tool_handler]
impl rmcp::ServerHandler for DatabricksMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mode = if self.read_only { "read-only" } else { "read-write" };
        ServerInfo {
            instructions: Some(format!("{} Currently in {} mode.", INSTRUCTIONS, mode)),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for DatabricksMcpServer {
    fn server_name(&self) -> &str {
        "databricks"
    }

    fn server_description(&self) -> Option<&str> {
        Some(INSTRUCTIONS)
    }

    fn server_version(&self) -> Option<&str> {
        Some(env!("CARGO_PKG_VERSION"))
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "list_tables" => {
                let params: ListTablesParams = serde_json::from_value(params)?;
                self.list_tables(Parameters(params)).await.map_err(Into::into)
            }

            "sql_query" => {
                let params: SqlQueryParams = serde_json::from_value(params)?;
                self.sql_query(Parameters(params)).await.map_err(Into::into)
            }

            "insert_row" => {
                let params: InsertRowParams = serde_json::from_value(params)?;
                self.insert_row(Parameters(params)).await.map_err(Into::into)
            }

            "update_rows" => {
                let params: UpdateRowsParams = serde_json::from_value(params)?;
                self.update_rows(Parameters(params)).await.map_err(Into::into)
            }

            "delete_rows" => {
                let params: DeleteRowsParams = serde_json::from_value(params)?;
                self.delete_rows(Parameters(params)).await.map_err(Into::into)
            }

            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}
