//! Configuration for Databricks MCP Server
//!
//! Values are layered, later sources winning:
//! 1. TOML file at `DATABRICKS_CONFIG_PATH`, else `~/.binks/databricks.toml` (optional)
//! 2. `.env` in the working directory (never overrides the real environment)
//! 3. Environment variables
//!
//! | Variable               | Required | Default |
//! |------------------------|----------|---------|
//! | `DATABRICKS_HOST`      | yes      |         |
//! | `DATABRICKS_HTTP_PATH` | yes      |         |
//! | `DATABRICKS_TOKEN`     | yes      |         |
//! | `DB_DEFAULT_CATALOG`   | no       |         |
//! | `DB_DEFAULT_SCHEMA`    | no       | `core`  |
//! | `DATABRICKS_READ_ONLY` | no       | `false` |

use anyhow::Context;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{DatabricksError, DatabricksResult};
use crate::sql::{Namespace, DEFAULT_SCHEMA};

/// Resolved, immutable server configuration
#[derive(Clone)]
pub struct DatabricksConfig {
    /// Workspace host, with or without scheme
    pub host: String,
    /// Warehouse HTTP path, e.g. `/sql/1.0/warehouses/abc123`
    pub http_path: String,
    /// Personal access token
    pub token: String,
    pub default_catalog: Option<String>,
    pub default_schema: String,
    /// Reject insert/update/delete when set
    pub read_only: bool,
    pub warehouse: WarehouseSettings,
}

/// Statement execution tuning
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WarehouseSettings {
    /// Seconds the API waits inline before we start polling (5-50)
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,

    /// Delay between status polls for long-running statements
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_wait_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    500
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for WarehouseSettings {
    fn default() -> Self {
        Self {
            wait_timeout_secs: default_wait_timeout(),
            poll_interval_ms: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl WarehouseSettings {
    /// `wait_timeout` as accepted by the statements API
    pub fn wait_timeout(&self) -> String {
        format!("{}s", self.wait_timeout_secs.clamp(5, 50))
    }
}

/// On-disk layout of `databricks.toml`
///
/// ```toml
/// read_only = false
///
/// [connection]
/// host = "dbc-1234.cloud.databricks.com"
/// http_path = "/sql/1.0/warehouses/abc123"
/// token = "dapi..."
///
/// [defaults]
/// catalog = "shop"
/// schema = "core"
///
/// [warehouse]
/// wait_timeout_secs = 30
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub read_only: Option<bool>,
    #[serde(default)]
    pub connection: ConnectionSection,
    #[serde(default)]
    pub defaults: DefaultsSection,
    #[serde(default)]
    pub warehouse: WarehouseSettings,
}

#[derive(Default, Deserialize)]
pub struct ConnectionSection {
    pub host: Option<String>,
    pub http_path: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DefaultsSection {
    pub catalog: Option<String>,
    pub schema: Option<String>,
}

impl fmt::Debug for ConnectionSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSection")
            .field("host", &self.host)
            .field("http_path", &self.http_path)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl FileConfig {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse config from {:?}", path))
    }
}

impl DatabricksConfig {
    /// Load configuration from file, `.env` and the environment
    pub fn load() -> anyhow::Result<Self> {
        let file = match Self::config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from: {}", path.display());
                FileConfig::read(&path)?
            }
            _ => FileConfig::default(),
        };

        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
        }

        Ok(Self::from_sources(file, |key| std::env::var(key).ok())?)
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("DATABRICKS_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }
        dirs::home_dir().map(|home| home.join(".binks").join("databricks.toml"))
    }

    /// Merge a file config with environment lookups.
    ///
    /// Empty environment values count as unset.
    pub fn from_sources<F>(file: FileConfig, env: F) -> DatabricksResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str, fallback: Option<String>| {
            lookup(key)
                .or(fallback.filter(|v| !v.trim().is_empty()))
                .ok_or_else(|| DatabricksError::config(format!("{} is not set", key)))
        };

        let host = required("DATABRICKS_HOST", file.connection.host)?;
        let http_path = required("DATABRICKS_HTTP_PATH", file.connection.http_path)?;
        let token = required("DATABRICKS_TOKEN", file.connection.token)?;

        let read_only = match lookup("DATABRICKS_READ_ONLY") {
            Some(v) => parse_flag(&v).ok_or_else(|| {
                DatabricksError::config(format!("DATABRICKS_READ_ONLY has invalid value {:?}", v))
            })?,
            None => file.read_only.unwrap_or(false),
        };

        Ok(Self {
            host,
            http_path,
            token,
            default_catalog: lookup("DB_DEFAULT_CATALOG")
                .or(file.defaults.catalog)
                .filter(|c| !c.is_empty()),
            default_schema: lookup("DB_DEFAULT_SCHEMA")
                .or(file.defaults.schema)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
            read_only,
            warehouse: file.warehouse,
        })
    }

    /// Catalog/schema defaults for table qualification
    pub fn namespace(&self) -> Namespace {
        Namespace::new(self.default_catalog.clone(), self.default_schema.clone())
    }
}

impl fmt::Debug for DatabricksConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabricksConfig")
            .field("host", &self.host)
            .field("http_path", &self.http_path)
            .field("token", &"***")
            .field("default_catalog", &self.default_catalog)
            .field("default_schema", &self.default_schema)
            .field("read_only", &self.read_only)
            .field("warehouse", &self.warehouse)
            .finish()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DATABRICKS_HOST", "dbc-1.cloud.databricks.com"),
        ("DATABRICKS_HTTP_PATH", "/sql/1.0/warehouses/abc"),
        ("DATABRICKS_TOKEN", "dapi-secret"),
    ];

    #[test]
    fn test_env_only() {
        let config = DatabricksConfig::from_sources(FileConfig::default(), env_from(&REQUIRED)).unwrap();
        assert_eq!(config.host, "dbc-1.cloud.databricks.com");
        assert_eq!(config.default_catalog, None);
        assert_eq!(config.default_schema, "core");
        assert!(!config.read_only);
        assert_eq!(config.warehouse, WarehouseSettings::default());
    }

    #[test]
    fn test_missing_required_variable() {
        let err = DatabricksConfig::from_sources(
            FileConfig::default(),
            env_from(&REQUIRED[..2]),
        )
        .unwrap_err();
        assert!(matches!(err, DatabricksError::Config(_)));
        assert!(err.to_string().contains("DATABRICKS_TOKEN"));
    }

    #[test]
    fn test_defaults_from_env() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DB_DEFAULT_CATALOG", "shop"));
        pairs.push(("DB_DEFAULT_SCHEMA", "sales"));
        pairs.push(("DATABRICKS_READ_ONLY", "TRUE"));
        let config = DatabricksConfig::from_sources(FileConfig::default(), env_from(&pairs)).unwrap();
        assert_eq!(config.default_catalog.as_deref(), Some("shop"));
        assert_eq!(config.default_schema, "sales");
        assert!(config.read_only);
        assert_eq!(config.namespace().resolve(None, None).unwrap(), ("shop", "sales"));
    }

    #[test]
    fn test_bad_read_only_flag() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DATABRICKS_READ_ONLY", "maybe"));
        let err = DatabricksConfig::from_sources(FileConfig::default(), env_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("DATABRICKS_READ_ONLY"));
    }

    #[test]
    fn test_file_values_are_overridden_by_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
read_only = true

[connection]
host = "file-host"
http_path = "/sql/1.0/warehouses/from-file"
token = "file-token"

[defaults]
catalog = "file_catalog"

[warehouse]
poll_interval_ms = 250
"#
        )
        .unwrap();

        let parsed = FileConfig::read(file.path()).unwrap();
        let config = DatabricksConfig::from_sources(
            parsed,
            env_from(&[("DATABRICKS_HOST", "env-host"), ("DB_DEFAULT_SCHEMA", "")]),
        )
        .unwrap();

        assert_eq!(config.host, "env-host");
        assert_eq!(config.http_path, "/sql/1.0/warehouses/from-file");
        assert_eq!(config.token, "file-token");
        assert_eq!(config.default_catalog.as_deref(), Some("file_catalog"));
        assert_eq!(config.default_schema, "core");
        assert!(config.read_only);
        assert_eq!(config.warehouse.poll_interval_ms, 250);
        assert_eq!(config.warehouse.wait_timeout_secs, 30);
    }

    #[test]
    fn test_unparseable_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[connection\nhost = ").unwrap();
        assert!(FileConfig::read(file.path()).is_err());
    }

    #[test]
    fn test_token_is_redacted() {
        let config = DatabricksConfig::from_sources(FileConfig::default(), env_from(&REQUIRED)).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("dapi-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn test_wait_timeout_is_clamped() {
        let mut settings = WarehouseSettings::default();
        assert_eq!(settings.wait_timeout(), "30s");
        settings.wait_timeout_secs = 1;
        assert_eq!(settings.wait_timeout(), "5s");
        settings.wait_timeout_secs = 600;
        assert_eq!(settings.wait_timeout(), "50s");
    }
}
