//! Configuration loading for steepbook.
//!
//! Resolution order (highest to lowest priority):
//! 1. Explicit CLI flags (via [`ConfigOptions`])
//! 2. Environment variables (STEEPBOOK_DATA, STEEPBOOK_EXPORT_DIR)
//! 3. `config.toml` in the config directory
//! 4. Built-in defaults
//!
//! The config directory itself comes from the `--config` flag,
//! STEEPBOOK_CONFIG, `$XDG_CONFIG_HOME/steepbook`, or the platform config
//! directory, in that order.

use crate::logging::{LogFormat, LogLevel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Directory name under the platform config/data roots.
const APP_DIR_NAME: &str = "steepbook";

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Where the session store lives.
    pub data_dir: Option<PathBuf>,
    /// Where exports are written.
    pub export_dir: Option<PathBuf>,
    /// Skip the import-overwrite and delete confirmations.
    pub assume_yes: bool,
    pub log_level: Option<LogLevel>,
    pub log_format: Option<LogFormat>,
}

/// Overrides from the command line.
#[derive(Debug, Default, Clone)]
pub struct ConfigOptions {
    pub config_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
}

/// Fully resolved settings with provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub config_dir: PathBuf,
    /// The config file that was read, if one existed.
    pub config_path: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub assume_yes: bool,
    pub log_level: Option<LogLevel>,
    pub log_format: Option<LogFormat>,
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|val| !val.is_empty())
        .map(PathBuf::from)
}

/// Resolve the config directory.
pub fn resolve_config_dir(options: &ConfigOptions) -> PathBuf {
    if let Some(dir) = &options.config_dir {
        return dir.clone();
    }
    if let Some(dir) = env_path("STEEPBOOK_CONFIG") {
        return dir;
    }
    if let Some(xdg) = env_path("XDG_CONFIG_HOME") {
        return xdg.join(APP_DIR_NAME);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Platform default for the session store directory.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Read `config.toml` from `config_dir`. A missing file yields defaults.
pub fn read_config_file(config_dir: &Path) -> Result<(AppConfig, Option<PathBuf>)> {
    let path = config_dir.join(CONFIG_FILE_NAME);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No config file; using defaults");
            return Ok((AppConfig::default(), None));
        }
        Err(e) => return Err(ConfigError::Io { path, source: e }),
    };

    let config: AppConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.clone(),
        source: e,
    })?;
    Ok((config, Some(path)))
}

/// Load configuration with the standard resolution order.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig> {
    let config_dir = resolve_config_dir(options);
    let (file, config_path) = read_config_file(&config_dir)?;

    let data_dir = options
        .data_dir
        .clone()
        .or_else(|| env_path("STEEPBOOK_DATA"))
        .or(file.data_dir)
        .unwrap_or_else(default_data_dir);

    let export_dir = options
        .export_dir
        .clone()
        .or_else(|| env_path("STEEPBOOK_EXPORT_DIR"))
        .or(file.export_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(ResolvedConfig {
        config_dir,
        config_path,
        data_dir,
        export_dir,
        assume_yes: file.assume_yes,
        log_level: file.log_level,
        log_format: file.log_format,
    })
}
