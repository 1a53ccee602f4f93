//! # Gateway Configuration
//!
//! Loads the gateway config file and the API key file it points at.
//!
//! The gateway config is JSON; every field has a default so an empty object
//! is a valid config:
//!
//! ```json
//! {
//!   "database_path": "./data/tablegate.db",
//!   "apikey_file": "./data/apikey.json",
//!   "assets_dir": "./assets",
//!   "server": { "host": "0.0.0.0", "port": 8787, "cors_origins": [] },
//!   "log_format": "pretty",
//!   "max_connections": 1
//! }
//! ```
//!
//! The API key file keeps the `apikey_list` layout of existing deployments:
//!
//! ```json
//! { "apikey_list": [ { "key": "abc", "table": "notes" } ] }
//! ```

mod errors;

pub use errors::{ConfigError, ConfigResult};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::auth::{ApiKeyEntry, KeyRegistry};
use crate::http_server::HttpServerConfig;
use crate::observability::LogFormat;

/// Top-level gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// SQLite database file (created if missing)
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Path to the API key file
    #[serde(default = "default_apikey_file")]
    pub apikey_file: PathBuf,

    /// Directory holding index.html and favicon.ico
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    #[serde(default)]
    pub server: HttpServerConfig,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// SQLite pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./data/tablegate.db")
}

fn default_apikey_file() -> PathBuf {
    PathBuf::from("./data/apikey.json")
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("./assets")
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_max_connections() -> u32 {
    1
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            apikey_file: default_apikey_file(),
            assets_dir: default_assets_dir(),
            server: HttpServerConfig::default(),
            log_format: default_log_format(),
            max_connections: default_max_connections(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let config: GatewayConfig = read_json(path)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        self.log_format()?;

        if self.max_connections == 0 {
            return Err(ConfigError::ZeroConnections);
        }

        Ok(())
    }

    /// Parsed log format
    pub fn log_format(&self) -> ConfigResult<LogFormat> {
        self.log_format
            .parse()
            .map_err(|_| ConfigError::InvalidLogFormat(self.log_format.clone()))
    }

    /// Load and validate the API key file this config points at
    pub fn load_registry(&self) -> ConfigResult<KeyRegistry> {
        let file: ApiKeyFile = read_json(&self.apikey_file)?;
        KeyRegistry::from_entries(file.apikey_list)
    }

    /// Resolve relative file paths against `base_dir` (normally the
    /// directory holding the config file)
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        self.database_path = resolve(base_dir, &self.database_path);
        self.assets_dir = resolve(base_dir, &self.assets_dir);
        self.apikey_file = resolve(base_dir, &self.apikey_file);
    }
}

/// On-disk layout of the API key file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeyFile {
    #[serde(default)]
    pub apikey_list: Vec<ApiKeyEntry>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
