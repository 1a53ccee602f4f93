//! CLI command implementations
//!
//! `serve` boots in a fixed order: config, logging, key registry, table
//! store, router, listener. Any failure before the listener is bound is
//! fatal.

use std::path::Path;

use serde_json::json;

use crate::auth::KeyRegistry;
use crate::config::GatewayConfig;
use crate::http_server::{AppState, HttpServer};
use crate::observability::{init_logging, LogFormat};
use crate::status::StatusReporter;
use crate::store::TableStore;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, host, port } => serve(&config, host, port),
        Command::Check { config } => check(&config),
        Command::Keys { config } => keys(&config),
    }
}

/// Load the gateway config with relative paths resolved against the
/// config file's directory
fn load_config(config_path: &Path) -> CliResult<GatewayConfig> {
    let mut config = GatewayConfig::load(config_path)?;
    if let Some(base_dir) = config_path.parent() {
        config.resolve_paths(base_dir);
    }
    Ok(config)
}

/// Start the HTTP gateway
pub fn serve(config_path: &Path, host: Option<String>, port: Option<u16>) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    init_logging(config.log_format()?);

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let registry = config.load_registry()?;
    if registry.is_empty() {
        tracing::warn!("API key registry is empty, every /api/db request will be rejected");
    }

    tracing::info!(
        config = %config_path.display(),
        keys = registry.len(),
        tables = registry.tables().len(),
        database = %config.database_path.display(),
        "configuration loaded"
    );

    let status = StatusReporter::new();

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let store = TableStore::open(&config.database_path, config.max_connections).await?;
        let state = AppState::new(registry, store, status);
        let server = HttpServer::new(config.server.clone(), state, config.assets_dir.clone());

        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Validate config and key file, print a summary
pub fn check(config_path: &Path) -> CliResult<()> {
    init_logging(LogFormat::Pretty);

    let config = load_config(config_path)?;
    let registry = config.load_registry()?;

    write_response(summary(&registry))
}

/// Print table bindings with masked keys
pub fn keys(config_path: &Path) -> CliResult<()> {
    init_logging(LogFormat::Pretty);

    let config = load_config(config_path)?;
    let registry = config.load_registry()?;

    let bindings: Vec<_> = registry
        .masked_entries()
        .into_iter()
        .map(|(key, table)| json!({ "key": key, "table": table.as_str() }))
        .collect();

    write_response(json!({ "bindings": bindings }))
}

fn summary(registry: &KeyRegistry) -> serde_json::Value {
    let tables: Vec<&str> = registry.tables().into_iter().map(|t| t.as_str()).collect();
    json!({
        "valid": true,
        "keys": registry.len(),
        "tables": tables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ApiKeyEntry;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(tmp: &TempDir, apikeys: &str) -> std::path::PathBuf {
        fs::write(tmp.path().join("apikey.json"), apikeys).unwrap();
        let path = tmp.path().join("tablegate.json");
        fs::write(&path, r#"{"apikey_file": "apikey.json"}"#).unwrap();
        path
    }

    #[test]
    fn test_summary_lists_distinct_tables() {
        let registry = KeyRegistry::from_entries(vec![
            ApiKeyEntry::new("a", "notes"),
            ApiKeyEntry::new("b", "notes"),
            ApiKeyEntry::new("c", "todos"),
        ])
        .unwrap();

        let value = summary(&registry);
        assert_eq!(value["keys"], 3);
        assert_eq!(value["tables"], json!(["notes", "todos"]));
    }

    #[test]
    fn test_check_valid_config() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, r#"{"apikey_list": [{"key": "abc", "table": "notes"}]}"#);
        assert!(check(&path).is_ok());
    }

    #[test]
    fn test_check_rejects_bad_table() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, r#"{"apikey_list": [{"key": "abc", "table": "no tes"}]}"#);

        let err = check(&path).unwrap_err();
        assert_eq!(err.code_str(), "TABLEGATE_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_load_config_resolves_relative_paths() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, r#"{"apikey_list": []}"#);

        let config = load_config(&path).unwrap();
        assert!(config.database_path.starts_with(tmp.path()));
        assert_eq!(config.apikey_file, tmp.path().join("apikey.json"));
    }
}
