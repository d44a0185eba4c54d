use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ModHeadersError, Result};

/// Where the file-backed rule store keeps its keys
#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    /// Directory holding one file per key
    /// Default: ".modheaders"
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { path: default_store_path() }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    /// Default: "info"
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Show module path (target) in log messages
    /// Default: false
    #[serde(default)]
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), show_target: false }
    }
}

/// Reload the rules when the store changes on disk
#[derive(Debug, Deserialize, Clone)]
pub struct WatchConfig {
    /// Default: false
    #[serde(default)]
    pub enabled: bool,
    /// Quiet period before a burst of file events triggers one reload
    /// Default: 200
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { enabled: false, debounce_ms: default_debounce_ms() }
    }
}

/// Host settings for the command line front-end
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Load TOML settings; a missing file yields the defaults
pub fn load_settings<P: AsRef<Path>>(p: P) -> Result<Settings> {
    let path = p.as_ref();
    if !path.exists() {
        return Ok(Settings::default());
    }
    let txt = fs::read_to_string(path)
        .map_err(|e| ModHeadersError::Config(format!("Failed to read settings file: {e}")))?;
    let settings: Settings = toml::from_str(&txt)
        .map_err(|e| ModHeadersError::Config(format!("Failed to parse settings: {e}")))?;

    validate_settings(&settings)?;

    Ok(settings)
}

fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.store.path.as_os_str().is_empty() {
        return Err(ModHeadersError::Config("store path cannot be empty".into()));
    }
    if settings.watch.debounce_ms == 0 {
        return Err(ModHeadersError::Config("debounce_ms must be > 0".into()));
    }
    Ok(())
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".modheaders")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_debounce_ms() -> u64 {
    200
}
