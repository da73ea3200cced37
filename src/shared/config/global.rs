use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::shared::config::model::{RollupSettings, Settings, load_settings, rollup_or_default};

pub static CONFIG: Lazy<Arc<Settings>> =
    Lazy::new(|| Arc::new(load_settings().expect("Failed to load configuration")));

/// Rollup settings for the engine entry points. Never panics: a configuration
/// that fails to load yields the built-in defaults.
pub static ROLLUP_SETTINGS: Lazy<RollupSettings> = Lazy::new(|| rollup_or_default(load_settings()));
