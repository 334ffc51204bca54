//! Single-statement execution
//!
//! [`QueryExecutor`] opens a fresh connection for every statement and closes
//! it before returning, whether the statement succeeded or not. The
//! connection itself comes from a [`SqlConnector`], so the warehouse driver
//! can be swapped for an in-memory one in tests.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::error::DatabricksResult;
use crate::types::QueryResult;

/// What the driver reports for one executed statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementOutcome {
    /// `None` when the statement produced no result set
    pub columns: Option<Vec<String>>,
    pub rows: Vec<Vec<Value>>,
    pub rowcount: i64,
}

/// Opens connections to the warehouse
#[async_trait]
pub trait SqlConnector: Send + Sync {
    async fn connect(&self) -> DatabricksResult<Box<dyn SqlConnection>>;
}

/// A connection owned by exactly one call
#[async_trait]
pub trait SqlConnection: Send {
    /// Run the statement text verbatim and fetch every result row
    async fn execute(&mut self, statement: &str) -> DatabricksResult<StatementOutcome>;

    async fn commit(&mut self) -> DatabricksResult<()>;

    /// Release the connection. Failures are logged by the implementation.
    async fn close(self: Box<Self>);
}

/// Runs one statement per call over a fresh connection
#[derive(Clone)]
pub struct QueryExecutor {
    connector: Arc<dyn SqlConnector>,
}

impl QueryExecutor {
    pub fn new(connector: Arc<dyn SqlConnector>) -> Self {
        Self { connector }
    }

    /// Execute `statement`, committing afterwards when `commit` is set.
    ///
    /// Driver errors are returned as-is. No retries.
    #[instrument(skip(self))]
    pub async fn execute(&self, statement: &str, commit: bool) -> DatabricksResult<QueryResult> {
        let mut conn = self.connector.connect().await?;
        let outcome = run(conn.as_mut(), statement, commit).await;
        conn.close().await;

        let outcome = outcome.inspect_err(|e| warn!(error = %e, "statement failed"))?;
        debug!(rowcount = outcome.rowcount, "statement finished");

        Ok(match outcome.columns {
            Some(columns) => QueryResult {
                columns,
                rows: outcome.rows,
                rowcount: outcome.rowcount,
            },
            None => QueryResult {
                columns: Vec::new(),
                rows: Vec::new(),
                rowcount: outcome.rowcount,
            },
        })
    }
}

async fn run(
    conn: &mut dyn SqlConnection,
    statement: &str,
    commit: bool,
) -> DatabricksResult<StatementOutcome> {
    let outcome = conn.execute(statement).await?;
    if commit {
        conn.commit().await?;
    }
    Ok(outcome)
}
