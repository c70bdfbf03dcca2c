use std::sync::{Arc, OnceLock};

use super::StaticConfig;

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// Get the global configuration if it has been initialized
pub fn try_get_config() -> Option<Arc<StaticConfig>> {
    CONFIG.get().cloned()
}

/// Initialize the global configuration
///
/// Loads configuration from `path` (or "config.toml" when `None`) plus
/// `LP__*` environment overrides. If the file doesn't exist, uses in-memory
/// defaults. Later calls are no-ops.
///
/// # Examples
/// ```no_run
/// use linkpulse::config::init_config;
/// init_config(None);
/// ```
pub fn init_config(path: Option<&str>) -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| Arc::new(StaticConfig::load(path)))
        .clone()
}
