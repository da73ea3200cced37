use serde::Deserialize;
use std::env;
use tracing::warn;

use crate::engine::core::rollup::RecordOrder;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub rollup: RollupSettings,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RollupSettings {
    /// Rows kept after ranking when a plan does not set its own limit
    pub top_n: usize,
    /// Canonical per-key processing order
    pub record_order: RecordOrder,
    /// Reporting window requested from the event store, in days
    pub window_days: i64,
    /// Page size requested from the event store; a practical ceiling, not a guarantee
    pub page_size: usize,
}

impl Default for RollupSettings {
    fn default() -> Self {
        Self {
            top_n: 5,
            record_order: RecordOrder::Arrival,
            window_days: 30,
            page_size: 100,
        }
    }
}

/// Rollup section of a load result, or [`RollupSettings::default`] when it failed.
pub fn rollup_or_default(loaded: Result<Settings, config::ConfigError>) -> RollupSettings {
    match loaded {
        Ok(settings) => settings.rollup,
        Err(e) => {
            warn!(target: "rollup::config", error = %e, "configuration unavailable, using defaults");
            RollupSettings::default()
        }
    }
}

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("ROLLUP_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

/// Layers built-in defaults, the optional file at `path` and `ROLLUP_*` env vars.
pub fn load_settings_from(path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .set_default("logging.log_dir", "logs")?
        .set_default("logging.stdout_level", "info")?
        .set_default("logging.file_level", "debug")?
        .set_default("rollup.top_n", 5_i64)?
        .set_default("rollup.record_order", "arrival")?
        .set_default("rollup.window_days", 30_i64)?
        .set_default("rollup.page_size", 100_i64)?
        .add_source(config::File::with_name(path).required(false))
        .add_source(config::Environment::with_prefix("ROLLUP").separator("__"))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
