//! Table name qualification

use crate::error::{DatabricksError, DatabricksResult};

/// Schema used when neither the caller nor the config names one
pub const DEFAULT_SCHEMA: &str = "core";

const MISSING_CATALOG: &str = "Catalog is required (set DB_DEFAULT_CATALOG or pass catalog).";

/// Default catalog and schema applied to unqualified table names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    default_catalog: Option<String>,
    default_schema: String,
}

/// A table reference as supplied by a tool call
#[derive(Debug, Clone, Copy)]
pub struct TableTarget<'a> {
    pub name: &'a str,
    pub catalog: Option<&'a str>,
    pub schema: Option<&'a str>,
}

impl Namespace {
    pub fn new(default_catalog: Option<String>, default_schema: impl Into<String>) -> Self {
        let default_schema = default_schema.into();
        Self {
            default_catalog: default_catalog.filter(|c| !c.is_empty()),
            default_schema: if default_schema.is_empty() {
                DEFAULT_SCHEMA.to_string()
            } else {
                default_schema
            },
        }
    }

    /// Pick the effective `(catalog, schema)` pair.
    ///
    /// Empty overrides count as absent. Fails when no catalog is available
    /// from either the call or the defaults.
    pub fn resolve<'a>(
        &'a self,
        catalog: Option<&'a str>,
        schema: Option<&'a str>,
    ) -> DatabricksResult<(&'a str, &'a str)> {
        let catalog = catalog
            .filter(|c| !c.is_empty())
            .or(self.default_catalog.as_deref())
            .ok_or_else(|| DatabricksError::config(MISSING_CATALOG))?;
        let schema = schema
            .filter(|s| !s.is_empty())
            .unwrap_or(self.default_schema.as_str());
        Ok((catalog, schema))
    }

    /// Fully qualify a table name.
    ///
    /// A name that already contains a `.` is returned untouched and the
    /// overrides are ignored.
    pub fn qualify(&self, target: TableTarget<'_>) -> DatabricksResult<String> {
        if target.name.contains('.') {
            return Ok(target.name.to_string());
        }
        let (catalog, schema) = self.resolve(target.catalog, target.schema)?;
        Ok(format!("{}.{}.{}", catalog, schema, target.name))
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new(None, DEFAULT_SCHEMA)
    }
}
