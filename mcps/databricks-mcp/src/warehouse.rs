//! Databricks SQL warehouse driver
//!
//! Implements [`SqlConnector`] on top of the Statement Execution API.
//! See: https://docs.databricks.com/api/workspace/statementexecution
//!
//! Each statement is submitted with `on_wait_timeout = CONTINUE`; if it is
//! still pending when the inline wait expires, its status is polled until it
//! reaches a terminal state. Results are requested as inline `JSON_ARRAY`
//! chunks and every chunk is fetched before the outcome is returned.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::DatabricksConfig;
use crate::error::{DatabricksError, DatabricksResult};
use crate::executor::{SqlConnection, SqlConnector, StatementOutcome};
use crate::types::ROWCOUNT_UNKNOWN;

const STATEMENTS_PATH: &str = "/api/2.0/sql/statements";

/// Connection target shared by every session
struct Endpoint {
    client: Client,
    base_url: Url,
    warehouse_id: String,
    token: String,
    wait_timeout: String,
    poll_interval: Duration,
}

/// Opens sessions against one SQL warehouse
pub struct WarehouseConnector {
    endpoint: Arc<Endpoint>,
}

impl WarehouseConnector {
    pub fn new(config: &DatabricksConfig) -> DatabricksResult<Self> {
        let base_url = base_url(&config.host)?;
        let warehouse_id = warehouse_id(&config.http_path)?;

        let client = Client::builder()
            .user_agent(concat!("databricks-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.warehouse.request_timeout_secs))
            .build()?;

        tracing::info!(
            host = %base_url,
            warehouse_id = %warehouse_id,
            "Configured Databricks SQL warehouse"
        );

        Ok(Self {
            endpoint: Arc::new(Endpoint {
                client,
                base_url,
                warehouse_id,
                token: config.token.clone(),
                wait_timeout: config.warehouse.wait_timeout(),
                poll_interval: Duration::from_millis(config.warehouse.poll_interval_ms),
            }),
        })
    }

    pub fn warehouse_id(&self) -> &str {
        &self.endpoint.warehouse_id
    }
}

#[async_trait]
impl SqlConnector for WarehouseConnector {
    async fn connect(&self) -> DatabricksResult<Box<dyn SqlConnection>> {
        Ok(Box::new(WarehouseSession {
            endpoint: self.endpoint.clone(),
            executed: 0,
        }))
    }
}

/// One call's view of the warehouse.
///
/// The statements API is stateless and commits each statement on its own, so
/// commit and close only log.
pub struct WarehouseSession {
    endpoint: Arc<Endpoint>,
    executed: usize,
}

#[async_trait]
impl SqlConnection for WarehouseSession {
    #[instrument(skip(self))]
    async fn execute(&mut self, statement: &str) -> DatabricksResult<StatementOutcome> {
        let endpoint = &self.endpoint;
        let request = ExecuteStatementRequest {
            statement,
            warehouse_id: &endpoint.warehouse_id,
            wait_timeout: &endpoint.wait_timeout,
            on_wait_timeout: "CONTINUE",
            format: "JSON_ARRAY",
            disposition: "INLINE",
        };

        let submit_url = endpoint.base_url.join(STATEMENTS_PATH)?;
        let mut response: StatementResponse = endpoint
            .send(endpoint.client.post(submit_url).json(&request))
            .await?;

        while response.status.state.is_pending() {
            debug!(statement_id = %response.statement_id, "statement still running");
            tokio::time::sleep(endpoint.poll_interval).await;
            let status_url = endpoint
                .base_url
                .join(&format!("{}/{}", STATEMENTS_PATH, response.statement_id))?;
            response = endpoint.send(endpoint.client.get(status_url)).await?;
        }

        response.ensure_succeeded()?;
        self.executed += 1;

        let mut rows = Vec::new();
        let mut next = match response.result {
            Some(chunk) => {
                rows.extend(chunk.data_array.unwrap_or_default());
                chunk.next_chunk_internal_link
            }
            None => None,
        };
        while let Some(link) = next {
            let chunk: ResultChunk = endpoint
                .send(endpoint.client.get(endpoint.base_url.join(&link)?))
                .await?;
            rows.extend(chunk.data_array.unwrap_or_default());
            next = chunk.next_chunk_internal_link;
        }

        Ok(outcome(response.manifest, rows))
    }

    async fn commit(&mut self) -> DatabricksResult<()> {
        debug!("statement auto-committed by warehouse");
        Ok(())
    }

    async fn close(self: Box<Self>) {
        debug!(statements = self.executed, "session closed");
    }
}

impl Endpoint {
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> DatabricksResult<T> {
        let response = request.bearer_auth(&self.token).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "warehouse request rejected");
            return Err(DatabricksError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Accepts `dbc-1.cloud.databricks.com` or a full `https://` URL
fn base_url(host: &str) -> DatabricksResult<Url> {
    let host = host.trim().trim_end_matches('/');
    let url = if host.starts_with("http://") || host.starts_with("https://") {
        Url::parse(host)?
    } else {
        Url::parse(&format!("https://{}", host))?
    };
    if url.host_str().is_none() {
        return Err(DatabricksError::config(format!(
            "DATABRICKS_HOST {:?} has no host name",
            host
        )));
    }
    Ok(url)
}

/// Last segment of `/sql/1.0/warehouses/<id>` or `/sql/1.0/endpoints/<id>`
fn warehouse_id(http_path: &str) -> DatabricksResult<String> {
    let segments: Vec<&str> = http_path
        .trim()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    match segments.as_slice() {
        [.., kind, id] if matches!(*kind, "warehouses" | "endpoints") => Ok(id.to_string()),
        _ => Err(DatabricksError::config(format!(
            "DATABRICKS_HTTP_PATH {:?} does not name a SQL warehouse (expected /sql/1.0/warehouses/<id>)",
            http_path
        ))),
    }
}

/// Build the outcome from the manifest and every fetched row
fn outcome(manifest: Option<ResultManifest>, rows: Vec<Vec<Value>>) -> StatementOutcome {
    let Some(manifest) = manifest else {
        return StatementOutcome {
            columns: None,
            rows: Vec::new(),
            rowcount: ROWCOUNT_UNKNOWN,
        };
    };

    let columns: Option<Vec<String>> = manifest
        .schema
        .map(|schema| schema.columns.into_iter().map(|c| c.name).collect());

    let affected = match columns.as_deref() {
        Some([first, ..]) if first == "num_affected_rows" => {
            rows.first().and_then(|row| row.first()).and_then(as_count)
        }
        _ => None,
    };

    StatementOutcome {
        columns,
        rowcount: affected
            .or(manifest.total_row_count)
            .unwrap_or(ROWCOUNT_UNKNOWN),
        rows,
    }
}

/// JSON_ARRAY cells arrive as strings
fn as_count(cell: &Value) -> Option<i64> {
    match cell {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

// Statement Execution API wire types

#[derive(Debug, Serialize)]
struct ExecuteStatementRequest<'a> {
    statement: &'a str,
    warehouse_id: &'a str,
    wait_timeout: &'a str,
    on_wait_timeout: &'static str,
    format: &'static str,
    disposition: &'static str,
}

#[derive(Debug, Deserialize)]
struct StatementResponse {
    statement_id: String,
    status: StatementStatus,
    #[serde(default)]
    manifest: Option<ResultManifest>,
    #[serde(default)]
    result: Option<ResultChunk>,
}

#[derive(Debug, Deserialize)]
struct StatementStatus {
    state: StatementState,
    #[serde(default)]
    error: Option<ServiceError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum StatementState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Canceled,
    Closed,
    #[serde(other)]
    Unknown,
}

impl StatementState {
    fn is_pending(self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Canceled => "CANCELED",
            Self::Closed => "CLOSED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultManifest {
    #[serde(default)]
    schema: Option<ResultSchema>,
    #[serde(default)]
    total_row_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ResultSchema {
    #[serde(default)]
    columns: Vec<ColumnInfo>,
}

#[derive(Debug, Deserialize)]
struct ColumnInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ResultChunk {
    #[serde(default)]
    data_array: Option<Vec<Vec<Value>>>,
    #[serde(default)]
    next_chunk_internal_link: Option<String>,
}

impl StatementResponse {
    fn ensure_succeeded(&self) -> DatabricksResult<()> {
        if self.status.state == StatementState::Succeeded {
            return Ok(());
        }
        let message = match &self.status.error {
            Some(ServiceError {
                error_code: Some(code),
                message: Some(message),
            }) => format!("[{}] {}", code, message),
            Some(ServiceError {
                message: Some(message),
                ..
            }) => message.clone(),
            _ => "no error detail returned".to_string(),
        };
        Err(DatabricksError::Statement {
            statement_id: self.statement_id.clone(),
            state: self.status.state.as_str().to_string(),
            message,
        })
    }
}
