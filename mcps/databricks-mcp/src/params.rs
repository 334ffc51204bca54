//! Parameter definitions for databricks-mcp tools
//!
//! Required arguments are plain fields so the published schema lists them as
//! required. Empty values still reach the statement builders' validation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::sql::TableTarget;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListTablesParams {
    /// Catalog to list (defaults to DB_DEFAULT_CATALOG)
    #[serde(default)]
    pub catalog: Option<String>,
    /// Schema to list (defaults to DB_DEFAULT_SCHEMA, then "core")
    #[serde(default)]
    pub schema: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SqlQueryParams {
    /// Read-only statement: SELECT, SHOW or DESCRIBE. SELECTs without LIMIT get LIMIT 25.
    pub query: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct InsertRowParams {
    /// Table name; a dotted name is used as-is
    pub table: String,
    /// Column to value mapping for the new row
    pub data: Map<String, Value>,
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct UpdateRowsParams {
    /// Table name; a dotted name is used as-is
    pub table: String,
    /// Column to new value mapping
    pub set_data: Map<String, Value>,
    /// WHERE clause without the keyword, e.g. "lower(name) = 'apple'"
    pub where_sql: String,
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DeleteRowsParams {
    /// Table name; a dotted name is used as-is
    pub table: String,
    /// WHERE clause without the keyword, e.g. "status = 'pending'"
    pub where_sql: String,
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
}

macro_rules! table_target {
    ($($params:ty),*) => {
        $(
            impl $params {
                pub fn target(&self) -> TableTarget<'_> {
                    TableTarget {
                        name: &self.table,
                        catalog: self.catalog.as_deref(),
                        schema: self.schema.as_deref(),
                    }
                }
            }
        )*
    };
}

table_target!(InsertRowParams, UpdateRowsParams, DeleteRowsParams);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn required<T: JsonSchema>() -> Vec<String> {
        let schema = serde_json::to_value(schemars::schema_for!(T)).unwrap();
        let mut names: Vec<String> = schema["required"]
            .as_array()
            .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    #[test]
    fn test_schemas_mark_required_arguments() {
        assert!(required::<ListTablesParams>().is_empty());
        assert_eq!(required::<SqlQueryParams>(), vec!["query"]);
        assert_eq!(required::<InsertRowParams>(), vec!["data", "table"]);
        assert_eq!(
            required::<UpdateRowsParams>(),
            vec!["set_data", "table", "where_sql"]
        );
        assert_eq!(required::<DeleteRowsParams>(), vec!["table", "where_sql"]);
    }

    #[test]
    fn test_missing_required_argument_fails_to_parse() {
        assert!(serde_json::from_value::<SqlQueryParams>(json!({})).is_err());
        assert!(serde_json::from_value::<DeleteRowsParams>(json!({"table": "t"})).is_err());
    }

    #[test]
    fn test_optional_namespace_arguments() {
        let params: DeleteRowsParams =
            serde_json::from_value(json!({"table": "t", "where_sql": "id = 1"})).unwrap();
        assert_eq!(params.target().catalog, None);
        assert_eq!(params.target().schema, None);
    }
}
