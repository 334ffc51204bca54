//! Per-tool statement builders
//!
//! Each builder checks its arguments in a fixed order and returns exactly one
//! SQL statement. Nothing here touches the warehouse, so a rejected call never
//! produces a statement.

use serde_json::{Map, Value};

use super::ident::{Namespace, TableTarget};
use super::literal::RowData;
use crate::error::{DatabricksError, DatabricksResult};

/// Row cap appended to SELECT statements that carry no LIMIT
pub const DEFAULT_ROW_LIMIT: u32 = 25;

const READ_ONLY_KEYWORDS: [&str; 3] = ["select", "show", "describe"];

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// `SHOW TABLES IN <catalog>.<schema>`
pub fn show_tables(
    namespace: &Namespace,
    catalog: Option<&str>,
    schema: Option<&str>,
) -> DatabricksResult<String> {
    let (catalog, schema) = namespace.resolve(catalog, schema)?;
    Ok(format!("SHOW TABLES IN {}.{}", catalog, schema))
}

/// Normalize an ad-hoc read-only query.
///
/// Only the leading keyword is inspected, and LIMIT detection is a plain
/// substring test on `" limit "`. A string literal containing that text
/// suppresses the cap, and a LIMIT preceded by a newline or tab is missed.
pub fn read_only_query(query: &str) -> DatabricksResult<String> {
    if is_blank(query) {
        return Err(DatabricksError::validation("Provide a SQL query."));
    }

    let trimmed = query.trim();
    let mut statement = trimmed.strip_suffix(';').unwrap_or(trimmed).to_string();
    let lowered = statement.to_lowercase();

    if !READ_ONLY_KEYWORDS.iter().any(|kw| lowered.starts_with(kw)) {
        return Err(DatabricksError::validation(
            "Only SELECT / SHOW / DESCRIBE are allowed in sql_query.",
        ));
    }

    if lowered.starts_with("select") && !format!(" {} ", lowered).contains(" limit ") {
        statement.push_str(&format!(" LIMIT {}", DEFAULT_ROW_LIMIT));
    }

    Ok(statement)
}

/// `INSERT INTO <fqtn> (<cols>) VALUES (<vals>)`
pub fn insert_row(
    namespace: &Namespace,
    target: TableTarget<'_>,
    data: &Map<String, Value>,
) -> DatabricksResult<String> {
    if is_blank(target.name) {
        return Err(DatabricksError::validation("Provide a table name."));
    }
    if data.is_empty() {
        return Err(DatabricksError::validation(
            "Provide data as a non-empty object.",
        ));
    }

    let fqtn = namespace.qualify(target)?;
    let row = RowData::try_from(data)?;
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        fqtn,
        row.column_list(),
        row.value_list()
    ))
}

/// `UPDATE <fqtn> SET <col = val, ...> WHERE <where_sql>`
///
/// `where_sql` is required so that an update can never cover the whole table.
pub fn update_rows(
    namespace: &Namespace,
    target: TableTarget<'_>,
    set_data: &Map<String, Value>,
    where_sql: &str,
) -> DatabricksResult<String> {
    if is_blank(target.name) {
        return Err(DatabricksError::validation("Provide a table name."));
    }
    if set_data.is_empty() {
        return Err(DatabricksError::validation(
            "Provide set_data as a non-empty object.",
        ));
    }
    if is_blank(where_sql) {
        return Err(DatabricksError::validation(
            "Provide a WHERE clause to avoid updating all rows.",
        ));
    }

    let fqtn = namespace.qualify(target)?;
    let row = RowData::try_from(set_data)?;
    Ok(format!(
        "UPDATE {} SET {} WHERE {}",
        fqtn,
        row.assignments(),
        where_sql
    ))
}

/// `DELETE FROM <fqtn> WHERE <where_sql>`
pub fn delete_rows(
    namespace: &Namespace,
    target: TableTarget<'_>,
    where_sql: &str,
) -> DatabricksResult<String> {
    if is_blank(target.name) {
        return Err(DatabricksError::validation("Provide a table name."));
    }
    if is_blank(where_sql) {
        return Err(DatabricksError::validation(
            "Provide a WHERE clause to avoid deleting all rows.",
        ));
    }

    let fqtn = namespace.qualify(target)?;
    Ok(format!("DELETE FROM {} WHERE {}", fqtn, where_sql))
}
