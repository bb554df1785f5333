//! Configuration types and loading.
//!
//! The configuration file supports JSONC format (JSON with comments). Every
//! field is optional; a missing file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default location of the private framework.
pub const DEFAULT_FRAMEWORK_PATH: &str = "/System/Library/PrivateFrameworks/PIP.framework";

/// Default private controller class.
pub const DEFAULT_CLASS_NAME: &str = "PIPViewController";

/// Default delegate protocol.
pub const DEFAULT_DELEGATE_PROTOCOL: &str = "PIPViewControllerDelegate";

/// Default log filter level.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FloatConfig {
    /// Log level used when `RUST_LOG` is not set (`trace` to `error`).
    pub log_level: String,

    /// Picture-in-picture proxy settings.
    pub pip: PipConfig,
}

impl Default for FloatConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            pip: PipConfig::default(),
        }
    }
}

impl FloatConfig {
    /// Returns the configured log level, or the default if it is not a known level.
    #[must_use]
    pub fn effective_log_level(&self) -> &str {
        match self.log_level.as_str() {
            level @ ("trace" | "debug" | "info" | "warn" | "error") => level,
            _ => DEFAULT_LOG_LEVEL,
        }
    }
}

/// Where to find the private controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipConfig {
    /// Set to `false` to report the feature as absent without probing.
    pub enabled: bool,

    /// Framework bundle loaded when the class is not registered yet.
    pub framework_path: String,

    /// Controller class name.
    pub class_name: String,

    /// Delegate protocol name.
    pub delegate_protocol: String,
}

impl Default for PipConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            framework_path: DEFAULT_FRAMEWORK_PATH.to_string(),
            class_name: DEFAULT_CLASS_NAME.to_string(),
            delegate_protocol: DEFAULT_DELEGATE_PROTOCOL.to_string(),
        }
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/float/config.json or \
         ~/Library/Application Support/float/config.json"
    )]
    NotFound,

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Application directory name under the config roots.
const APP_DIR: &str = "float";

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/float/` if set
/// 2. `~/.config/float/`
/// 3. `~/Library/Application Support/float/` (macOS native)
///
/// Each directory is checked for `config.jsonc`, then `config.json`.
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut dirs_to_check = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        dirs_to_check.push(PathBuf::from(xdg_config).join(APP_DIR));
    }
    if let Some(home) = dirs::home_dir() {
        dirs_to_check.push(home.join(".config").join(APP_DIR));
    }
    if let Some(config_dir) = dirs::config_dir() {
        dirs_to_check.push(config_dir.join(APP_DIR));
    }

    let mut paths = Vec::new();
    for dir in dirs_to_check {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }
    paths
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if the file does not exist, or an IO or
/// parse error if it cannot be read.
pub fn load_config_from_path(path: &Path) -> Result<(FloatConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    let config: FloatConfig = serde_json::from_reader(reader)?;
    Ok((config, path.to_path_buf()))
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if no file exists in any searched
/// location, or the error from the first file that exists.
pub fn load_config() -> Result<(FloatConfig, PathBuf), ConfigError> {
    config_paths()
        .into_iter()
        .find(|path| path.exists())
        .map_or(Err(ConfigError::NotFound), |path| load_config_from_path(&path))
}
