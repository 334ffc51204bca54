//! Response types returned by the tools

use serde::Serialize;
use serde_json::Value;

/// Row count reported when the warehouse gives none
pub const ROWCOUNT_UNKNOWN: i64 = -1;

/// Normalized result of one statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// Column names, empty when the statement produced no result set
    pub columns: Vec<String>,
    /// Rows aligned to `columns`
    pub rows: Vec<Vec<Value>>,
    /// Driver-reported count, possibly [`ROWCOUNT_UNKNOWN`]
    pub rowcount: i64,
}

/// One entry of `SHOW TABLES`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableEntry {
    pub database: Value,
    pub table: Value,
    #[serde(rename = "isTemporary")]
    pub is_temporary: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListTablesResult {
    pub result: Vec<TableEntry>,
}

/// Summary returned by insert/update/delete
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationResult {
    pub success: bool,
    pub affected_rows: i64,
}

impl From<QueryResult> for MutationResult {
    fn from(result: QueryResult) -> Self {
        Self {
            success: true,
            affected_rows: result.rowcount,
        }
    }
}
