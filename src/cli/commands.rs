//! CLI command implementations
//!
//! Every command follows the same sequence: load configuration, check
//! the data directory, boot the store from its snapshot, act, and
//! write a single JSON response to stdout.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::agg::{pct, round2};
use crate::ingest::DatasetLoader;
use crate::observability::{Logger, Severity};
use crate::storage::{SnapshotReader, SnapshotWriter};
use crate::store::{Store, StoreOptions};
use crate::views::{Registry, ViewName};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::write_response;

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Reject duplicate customer emails on insert (optional, default
    /// false: source data is known to contain duplicates)
    #[serde(default)]
    pub unique_email: bool,

    /// Minimum log level (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }
        if Severity::parse(&self.log_level).is_none() {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Use trace, info, warn or error.",
                self.log_level
            )));
        }
        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Path of the snapshot file inside the data directory
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_path().join("data").join("snapshot.db")
    }

    /// Store options derived from this config
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            unique_email: self.unique_email,
        }
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Load { config, file } => load(&config, &file),
        Command::View { config, name } => view(&config, &name),
        Command::Views => views(),
        Command::Stats { config } => stats(&config),
    }
}

/// Initialize a new freightdb data directory
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::already_initialized());
    }

    fs::create_dir_all(data_dir.join("data")).map_err(|e| {
        CliError::config_error(format!("Failed to create data directory: {}", e))
    })?;

    write_response(json!({"initialized": true}))?;

    Ok(())
}

/// Import a dataset file, then persist a fresh snapshot
pub fn load(config_path: &Path, file: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let mut store = boot(&config)?;

    let report = DatasetLoader::load(&mut store, file)?;
    SnapshotWriter::write(&store, &config.snapshot_path())?;

    write_response(json!({
        "report": report,
        "totals": {
            "customers": store.customer_count(),
            "products": store.product_count(),
            "orders": store.order_count(),
            "shipping_details": store.shipping_count(),
        }
    }))?;

    Ok(())
}

/// Print the rows of a named view
pub fn view(config_path: &Path, name: &str) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let store = boot(&config)?;

    let rows = Registry::get(&store, name)?;

    write_response(json!({
        "view": name,
        "row_count": rows.len(),
        "rows": rows,
    }))?;

    Ok(())
}

/// List registered views
pub fn views() -> CliResult<()> {
    let listing: Vec<_> = ViewName::ALL
        .into_iter()
        .map(|v| json!({"name": v.as_str(), "description": v.description()}))
        .collect();

    write_response(json!({"views": listing}))?;

    Ok(())
}

/// Print table counts and headline metrics
pub fn stats(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let store = boot(&config)?;

    let mut revenue = 0.0;
    let mut units: u64 = 0;
    for order in store.orders() {
        revenue += order.sales.unwrap_or(0.0);
        units += u64::from(order.quantity.unwrap_or(0));
    }
    let order_count = store.order_count() as u64;
    let avg_order = if order_count == 0 {
        None
    } else {
        Some(round2(revenue / order_count as f64))
    };

    let mut late: u64 = 0;
    let mut on_time: u64 = 0;
    let mut shipped: u64 = 0;
    for shipping in store.shipping_details() {
        shipped += 1;
        match shipping.late_delivery_risk {
            Some(1) => late += 1,
            Some(0) => on_time += 1,
            _ => {}
        }
    }

    write_response(json!({
        "tables": {
            "customers": store.customer_count(),
            "products": store.product_count(),
            "orders": store.order_count(),
            "shipping_details": store.shipping_count(),
        },
        "business": {
            "total_revenue": round2(revenue),
            "avg_order_value": avg_order,
            "total_units": units,
        },
        "delivery": {
            "late": late,
            "on_time": on_time,
            "on_time_pct": pct(on_time, shipped),
        }
    }))?;

    Ok(())
}

/// Check if a data directory is initialized
fn is_initialized(data_dir: &Path) -> bool {
    data_dir.join("data").exists()
}

/// Boot the store from its snapshot.
///
/// A missing snapshot is a fresh, empty store; an unreadable or
/// corrupt snapshot is fatal and the command must not proceed.
fn boot(config: &Config) -> CliResult<Store> {
    if let Some(level) = Severity::parse(&config.log_level) {
        Logger::init_level(level);
    }

    let data_dir = config.data_path();
    if !is_initialized(data_dir) {
        return Err(CliError::not_initialized());
    }

    let snapshot = config.snapshot_path();
    let store = if snapshot.exists() {
        SnapshotReader::read(&snapshot, config.store_options())
            .map_err(|e| CliError::boot_failed(format!("Snapshot load failed: {}", e)))?
    } else {
        Store::with_options(config.store_options())
    };

    Logger::trace(
        "boot_complete",
        &[
            ("customers", &store.customer_count().to_string()),
            ("orders", &store.order_count().to_string()),
        ],
    );

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use tempfile::TempDir;

    fn create_config(temp_dir: &TempDir) -> PathBuf {
        let config_path = temp_dir.path().join("freightdb.json");
        let data_dir = temp_dir.path().join("data");

        let config = json!({
            "data_dir": data_dir.to_string_lossy()
        });

        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    #[test]
    fn test_init_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);
        let data_dir = temp_dir.path().join("data");

        init(&config_path).unwrap();

        assert!(data_dir.join("data").exists());
    }

    #[test]
    fn test_init_refuses_reinit() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        init(&config_path).unwrap();

        let result = init(&config_path);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().code(),
            &CliErrorCode::AlreadyInitialized
        );
    }

    #[test]
    fn test_commands_require_init() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        let result = stats(&config_path);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().code(), &CliErrorCode::NotInitialized);
    }

    #[test]
    fn test_config_validates_log_level() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("freightdb.json");
        let data_dir = temp_dir.path().join("data");

        let config = json!({
            "data_dir": data_dir.to_string_lossy(),
            "log_level": "loud"  // Invalid!
        });

        fs::write(&config_path, config.to_string()).unwrap();

        let result = Config::load(&config_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        let config = Config::load(&config_path).unwrap();
        assert!(!config.unique_email);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_unknown_view_surfaces_code() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);
        init(&config_path).unwrap();

        let err = view(&config_path, "v_nonsense").unwrap_err();
        assert_eq!(err.code_str(), "UNKNOWN_VIEW");
    }
}
