//! Configuration module for Float.
//!
//! Loads the JSONC configuration file once and serves it process-wide.

mod types;

use std::path::PathBuf;
use std::sync::OnceLock;

pub use types::{
    ConfigError, DEFAULT_CLASS_NAME, DEFAULT_DELEGATE_PROTOCOL, DEFAULT_FRAMEWORK_PATH,
    DEFAULT_LOG_LEVEL, FloatConfig, PipConfig, config_paths, load_config as load_config_default,
    load_config_from_path,
};

/// Global configuration instance, loaded once at startup.
static CONFIG: OnceLock<FloatConfig> = OnceLock::new();

/// Custom config path override (set via CLI --config flag).
static CUSTOM_CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Why the configuration file was rejected, if it was.
static LOAD_WARNING: OnceLock<String> = OnceLock::new();

/// Sets a custom configuration file path to use instead of the default search paths.
///
/// Must be called before the first [`get_config`] to take effect. Returns
/// `false` if a path was already set.
pub fn set_custom_config_path(path: PathBuf) -> bool { CUSTOM_CONFIG_PATH.set(path).is_ok() }

/// Loads the configuration from disk, falling back to defaults.
fn load_or_default() -> FloatConfig {
    let result = CUSTOM_CONFIG_PATH
        .get()
        .map_or_else(load_config_default, |path| load_config_from_path(path));

    match result {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "configuration loaded");
            config
        }
        Err(ConfigError::NotFound) => FloatConfig::default(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            let _ = LOAD_WARNING.set(err.to_string());
            FloatConfig::default()
        }
    }
}

/// Returns the global configuration instance, initializing it if necessary.
///
/// If no configuration file is found, returns the defaults.
pub fn get_config() -> &'static FloatConfig { CONFIG.get_or_init(load_or_default) }

/// Returns the load error that made [`get_config`] fall back to defaults.
///
/// The configuration is read before logging is installed, so callers report
/// this once the subscriber is up.
pub fn load_warning() -> Option<&'static str> { LOAD_WARNING.get().map(String::as_str) }
