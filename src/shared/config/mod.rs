pub mod global;
pub mod model;

pub use global::{CONFIG, ROLLUP_SETTINGS};
pub use model::{LoggingConfig, RollupSettings, Settings, load_settings, load_settings_from, rollup_or_default};
