//! Configuration loading traits and types.
//!
//! Host settings are plain TOML. The user-facing configuration script is
//! Lua and is handled by `lumen_script::config`; both share [`ConfigError`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use lumen_common::config::{ConfigError, SharedConfig, TomlLoader};
//! use lumen_common::paths::default_settings_path;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct PanelSettings {
//!     #[serde(default)]
//!     shared: SharedConfig,
//!     columns: u16,
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let settings = PanelSettings::load(&default_settings_path())?;
//!     settings.shared.validate()?;
//!     println!("{} columns", settings.columns);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Configuration script failed to compile or run.
    #[error("Configuration script failed: {0}")]
    ScriptFailed(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Verbosity of the host's own diagnostics, independent of [`ErrorLevel`].
///
/// [`ErrorLevel`]: crate::error::ErrorLevel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Interpreter and registry internals.
    Trace,
    /// Domain registrations, context lifecycle.
    Debug,
    /// Startup and shutdown milestones.
    #[default]
    Info,
    /// Degraded operation only.
    Warn,
    /// Failures only.
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// `[shared]` table of `lumen.toml`.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "lumen-desktop"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Host diagnostics verbosity.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Name used in startup and shutdown log lines.
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: "lumen".to_string(),
        }
    }
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load any deserializable settings type from a TOML file.
///
/// A missing file is `FileNotFound`; unreadable or malformed content is
/// `ParseError`.
pub trait TomlLoader: Sized + serde::de::DeserializeOwned {
    /// Read and deserialize `path`.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound(path.to_path_buf())
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> TomlLoader for T {}
