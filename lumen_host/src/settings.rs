//! Host settings and script configuration types.
//!
//! Two files drive a Lumen process:
//!
//! - `lumen.toml` ([`HostSettings`]) - how errors are presented and which
//!   modules always load
//! - `init.lua` ([`ScriptConfig`]) - the user configuration script, whose
//!   global `config` table is deserialized into this type
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! log_level = "debug"
//! service_name = "lumen-desktop"
//!
//! [errors]
//! min_console_level = "critical"
//! exit_on_fatal = true
//!
//! [modules]
//! load = ["console"]
//! ```

use lumen_common::config::SharedConfig;
use lumen_common::error::ErrorLevel;
use lumen_common::module::SurfaceSpec;
use serde::Deserialize;
use std::str::FromStr;

/// Contents of `lumen.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostSettings {
    /// Common fields (log level, service name).
    #[serde(default)]
    pub shared: SharedConfig,

    /// Error presentation.
    #[serde(default)]
    pub errors: ErrorSettings,

    /// Module loading.
    #[serde(default)]
    pub modules: ModuleSettings,
}

/// `[errors]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorSettings {
    /// Least severe level printed by the console subscriber.
    #[serde(default = "default_min_console_level")]
    pub min_console_level: ErrorLevel,

    /// Stop startup as soon as any `Fatal` error is reported.
    #[serde(default = "default_exit_on_fatal")]
    pub exit_on_fatal: bool,
}

fn default_min_console_level() -> ErrorLevel {
    ErrorLevel::Warning
}

fn default_exit_on_fatal() -> bool {
    true
}

impl Default for ErrorSettings {
    fn default() -> Self {
        Self {
            min_console_level: default_min_console_level(),
            exit_on_fatal: default_exit_on_fatal(),
        }
    }
}

/// `[modules]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleSettings {
    /// Modules loaded before the configuration script's own list.
    #[serde(default)]
    pub load: Vec<String>,
}

/// The `config` table of `init.lua`.
///
/// ```lua
/// config = {
///     modules = { "console" },
///     surfaces = { { module = "console", title = "main", width = 800, height = 600 } },
///     invoke = { { module = "console", entry = "print", args = { "ready" } } },
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScriptConfig {
    /// Modules to load.
    #[serde(default)]
    pub modules: Vec<String>,

    /// Display surfaces to create once modules are loaded.
    #[serde(default)]
    pub surfaces: Vec<SurfaceConfig>,

    /// Entry points to run after surfaces are created.
    #[serde(default)]
    pub invoke: Vec<Invocation>,
}

/// One display surface request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SurfaceConfig {
    /// Owning module.
    pub module: String,
    /// Surface title.
    pub title: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceConfig {
    /// Geometry handed to the module.
    pub fn spec(&self) -> SurfaceSpec {
        SurfaceSpec {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

/// One entry point call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Invocation {
    /// Target module.
    pub module: String,
    /// Entry point name.
    pub entry: String,
    /// String arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

impl FromStr for Invocation {
    type Err = String;

    /// Parse `module:entry[:arg...]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let module = parts.next().unwrap_or_default();
        let entry = parts.next().unwrap_or_default();
        if module.is_empty() || entry.is_empty() {
            return Err(format!("expected MODULE:ENTRY[:ARG...], got {s:?}"));
        }
        Ok(Self {
            module: module.to_string(),
            entry: entry.to_string(),
            args: parts.map(str::to_string).collect(),
        })
    }
}
