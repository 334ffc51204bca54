//! Tool handlers
//!
//! Each handler builds its statement (which validates the arguments) and runs
//! it through the executor. Reads never commit; writes always do.

use crate::error::{DatabricksError, DatabricksResult};
use crate::executor::QueryExecutor;
use crate::params::*;
use crate::sql::{statement, Namespace};
use crate::types::{ListTablesResult, MutationResult, QueryResult, TableEntry};

/// Column names `SHOW TABLES` is expected to return, in order
const SHOW_TABLES_COLUMNS: [&str; 3] = ["database", "tableName", "isTemporary"];

pub async fn list_tables(
    executor: &QueryExecutor,
    namespace: &Namespace,
    params: ListTablesParams,
) -> DatabricksResult<ListTablesResult> {
    let sql = statement::show_tables(
        namespace,
        params.catalog.as_deref(),
        params.schema.as_deref(),
    )?;
    let out = executor.execute(&sql, false).await?;
    Ok(ListTablesResult {
        result: table_entries(out)?,
    })
}

/// Map `SHOW TABLES` rows onto named entries after checking the column layout
fn table_entries(out: QueryResult) -> DatabricksResult<Vec<TableEntry>> {
    let matches = out.columns.len() >= SHOW_TABLES_COLUMNS.len()
        && SHOW_TABLES_COLUMNS
            .iter()
            .zip(&out.columns)
            .all(|(want, got)| got.eq_ignore_ascii_case(want));

    if !matches && !(out.columns.is_empty() && out.rows.is_empty()) {
        return Err(DatabricksError::UnexpectedShape(format!(
            "SHOW TABLES returned columns {:?}, expected {:?}",
            out.columns, SHOW_TABLES_COLUMNS
        )));
    }

    out.rows
        .into_iter()
        .map(|row| {
            let mut cells = row.into_iter();
            match (cells.next(), cells.next(), cells.next()) {
                (Some(database), Some(table), Some(is_temporary)) => Ok(TableEntry {
                    database,
                    table,
                    is_temporary,
                }),
                _ => Err(DatabricksError::UnexpectedShape(
                    "SHOW TABLES row has fewer than 3 cells".to_string(),
                )),
            }
        })
        .collect()
}

pub async fn sql_query(
    executor: &QueryExecutor,
    params: SqlQueryParams,
) -> DatabricksResult<QueryResult> {
    let sql = statement::read_only_query(&params.query)?;
    executor.execute(&sql, false).await
}

pub async fn insert_row(
    executor: &QueryExecutor,
    namespace: &Namespace,
    params: InsertRowParams,
) -> DatabricksResult<MutationResult> {
    let sql = statement::insert_row(namespace, params.target(), &params.data)?;
    Ok(executor.execute(&sql, true).await?.into())
}

pub async fn update_rows(
    executor: &QueryExecutor,
    namespace: &Namespace,
    params: UpdateRowsParams,
) -> DatabricksResult<MutationResult> {
    let sql = statement::update_rows(
        namespace,
        params.target(),
        &params.set_data,
        &params.where_sql,
    )?;
    Ok(executor.execute(&sql, true).await?.into())
}

pub async fn delete_rows(
    executor: &QueryExecutor,
    namespace: &Namespace,
    params: DeleteRowsParams,
) -> DatabricksResult<MutationResult> {
    let sql = statement::delete_rows(namespace, params.target(), &params.where_sql)?;
    Ok(executor.execute(&sql, true).await?.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn show_tables_result(columns: &[&str], rows: Vec<Vec<Value>>) -> QueryResult {
        QueryResult {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            rowcount: -1,
        }
    }

    #[test]
    fn test_table_entries_remap_by_position() {
        let out = show_tables_result(
            &SHOW_TABLES_COLUMNS,
            vec![
                vec![json!("core"), json!("products"), json!("false")],
                vec![json!("core"), json!("orders"), json!("false")],
            ],
        );
        let entries = table_entries(out).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].table, json!("orders"));

        let encoded = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(
            encoded,
            json!({"database": "core", "table": "products", "isTemporary": "false"})
        );
    }

    #[test]
    fn test_table_entries_reject_unknown_layout() {
        let out = show_tables_result(
            &["tableName", "database", "isTemporary"],
            vec![vec![json!("products"), json!("core"), json!("false")]],
        );
        assert!(matches!(
            table_entries(out),
            Err(DatabricksError::UnexpectedShape(_))
        ));
    }

    #[test]
    fn test_table_entries_accept_extra_trailing_columns() {
        let out = show_tables_result(
            &["database", "tableName", "isTemporary", "information"],
            vec![vec![json!("core"), json!("t"), json!("true"), json!("x")]],
        );
        assert_eq!(table_entries(out).unwrap()[0].is_temporary, json!("true"));
    }

    #[test]
    fn test_table_entries_short_row() {
        let out = show_tables_result(&SHOW_TABLES_COLUMNS, vec![vec![json!("core")]]);
        assert!(table_entries(out).is_err());
    }

    #[test]
    fn test_empty_result_without_columns_is_empty_list() {
        let out = show_tables_result(&[], vec![]);
        assert!(table_entries(out).unwrap().is_empty());
    }
}
