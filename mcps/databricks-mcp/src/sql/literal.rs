//! SQL literal rendering for row values

use serde_json::{Map, Number, Value};
use std::fmt;

use crate::error::{DatabricksError, DatabricksResult};

/// A scalar cell value accepted from tool callers
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl SqlValue {
    /// Convert a JSON value, rejecting arrays and objects.
    ///
    /// `column` is only used for the error message.
    pub fn from_json(column: &str, value: Value) -> DatabricksResult<Self> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => Ok(Self::Number(n)),
            Value::String(s) => Ok(Self::String(s)),
            Value::Array(_) => Err(DatabricksError::InvalidValue {
                column: column.to_string(),
                kind: "array",
            }),
            Value::Object(_) => Err(DatabricksError::InvalidValue {
                column: column.to_string(),
                kind: "object",
            }),
        }
    }

    /// Render as SQL literal text
    pub fn to_literal(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(true) => f.write_str("TRUE"),
            Self::Bool(false) => f.write_str("FALSE"),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

/// Ordered `column -> value` pairs for INSERT and UPDATE
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowData {
    columns: Vec<(String, SqlValue)>,
}

impl RowData {
    /// `a, b, c`
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `'x', 1, NULL`
    pub fn value_list(&self) -> String {
        self.columns
            .iter()
            .map(|(_, value)| value.to_literal())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `a = 'x', b = 1`
    pub fn assignments(&self) -> String {
        self.columns
            .iter()
            .map(|(name, value)| format!("{} = {}", name, value.to_literal()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TryFrom<&Map<String, Value>> for RowData {
    type Error = DatabricksError;

    fn try_from(map: &Map<String, Value>) -> DatabricksResult<Self> {
        let columns = map
            .iter()
            .map(|(name, value)| Ok((name.clone(), SqlValue::from_json(name, value.clone())?)))
            .collect::<DatabricksResult<Vec<_>>>()?;
        Ok(Self { columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn literal(value: Value) -> String {
        SqlValue::from_json("c", value).unwrap().to_literal()
    }

    #[test]
    fn test_null_and_booleans() {
        assert_eq!(literal(Value::Null), "NULL");
        assert_eq!(literal(json!(true)), "TRUE");
        assert_eq!(literal(json!(false)), "FALSE");
    }

    #[test]
    fn test_strings_are_quoted_with_doubled_quotes() {
        assert_eq!(literal(json!("Widget")), "'Widget'");
        assert_eq!(literal(json!("O'Brien")), "'O''Brien'");
        assert_eq!(literal(json!("''")), "''''''");
        assert_eq!(literal(json!("")), "''");
    }

    #[test]
    fn test_numbers_keep_decimal_text() {
        assert_eq!(literal(json!(1000)), "1000");
        assert_eq!(literal(json!(-7)), "-7");
        assert_eq!(literal(json!(9.99)), "9.99");
    }

    #[test]
    fn test_nested_values_are_rejected() {
        let err = SqlValue::from_json("tags", json!(["a", "b"])).unwrap_err();
        assert!(matches!(err, DatabricksError::InvalidValue { kind: "array", .. }));
        assert!(err.to_string().contains("tags"));

        let err = SqlValue::from_json("meta", json!({"k": 1})).unwrap_err();
        assert!(matches!(err, DatabricksError::InvalidValue { kind: "object", .. }));
    }

    #[test]
    fn test_row_data_keeps_caller_order() {
        let map = json!({"zeta": 1, "alpha": "a", "mid": null});
        let row = RowData::try_from(map.as_object().unwrap()).unwrap();
        assert_eq!(row.column_list(), "zeta, alpha, mid");
        assert_eq!(row.value_list(), "1, 'a', NULL");
        assert_eq!(row.assignments(), "zeta = 1, alpha = 'a', mid = NULL");
    }
}
