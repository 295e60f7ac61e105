//! Lua configuration loader.
//!
//! A configuration file is an ordinary Lua script that assigns a global
//! `config` table:
//!
//! ```lua
//! config = {
//!     modules = { "console" },
//!     theme = "dark",
//! }
//! if not config.font then warn("no font configured, using default") end
//! ```
//!
//! `warn(...)` and `critical(...)` report through the error registry under
//! the `config` domain without aborting the script.

use crate::context::{ScriptContext, Status};
use crate::function::ReportFunction;
use lumen_common::config::ConfigError;
use lumen_common::consts::CONFIG_DOMAIN;
use lumen_common::error::{DomainId, ErrorLevel, SharedRegistry};
use mlua::{LuaSerdeExt, Value};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::info;

/// Global the configuration script must assign.
pub const CONFIG_GLOBAL: &str = "config";

/// Runs configuration scripts and deserializes their `config` table.
#[derive(Debug)]
pub struct LuaConfigLoader {
    registry: SharedRegistry,
    domain: DomainId,
    script_domain: Option<DomainId>,
}

impl LuaConfigLoader {
    /// Create a loader and register the `config` domain.
    pub fn new(registry: SharedRegistry) -> Self {
        let domain = registry.register(CONFIG_DOMAIN);
        Self {
            registry,
            domain,
            script_domain: None,
        }
    }

    /// Domain configuration problems are reported under.
    pub fn domain(&self) -> DomainId {
        self.domain
    }

    /// Domain of the script contexts this loader runs, once one was created.
    pub fn script_domain(&self) -> Option<DomainId> {
        self.script_domain
    }

    /// Run the script at `path` and deserialize its `config` global.
    ///
    /// Script failures were already reported at `Fatal` by the script context;
    /// a missing or ill-typed `config` table is reported here at `Critical`.
    ///
    /// # Errors
    /// - `ConfigError::FileNotFound` if `path` cannot be read
    /// - `ConfigError::ScriptFailed` if the script fails to compile or run
    /// - `ConfigError::ValidationError` if `config` is absent or has the wrong shape
    pub fn load<T: DeserializeOwned>(&mut self, path: &Path) -> Result<T, ConfigError> {
        info!("Loading configuration script {}", path.display());
        let mut context = self.context()?;

        match context.parse(path) {
            Status::Ok => {}
            Status::File => return Err(ConfigError::FileNotFound(path.to_path_buf())),
            status => {
                return Err(ConfigError::ScriptFailed(format!(
                    "{}: {status}",
                    path.display()
                )));
            }
        }

        let value: Value = context
            .lua()
            .globals()
            .get(CONFIG_GLOBAL)
            .map_err(|e| self.invalid(path, e.to_string()))?;
        if value.is_nil() {
            return Err(self.invalid(path, format!("no `{CONFIG_GLOBAL}` table defined")));
        }

        let config = context
            .lua()
            .from_value(value)
            .map_err(|e| self.invalid(path, e.to_string()))?;
        context.destroy();
        Ok(config)
    }

    /// Fresh context with the reporting functions installed.
    fn context(&mut self) -> Result<ScriptContext, ConfigError> {
        let created = match self.script_domain {
            Some(domain) => ScriptContext::with_domain(self.registry.clone(), domain),
            None => ScriptContext::create(self.registry.clone()),
        };
        let context = created.map_err(|e| self.script_setup_failed(e.to_string()))?;
        self.script_domain = Some(context.domain());

        for (name, level) in [("warn", ErrorLevel::Warning), ("critical", ErrorLevel::Critical)] {
            context
                .register_function(
                    name,
                    ReportFunction::new(self.registry.clone(), self.domain, level),
                )
                .map_err(|e| self.script_setup_failed(e.to_string()))?;
        }
        Ok(context)
    }

    fn script_setup_failed(&self, reason: String) -> ConfigError {
        self.registry.report(
            self.domain,
            ErrorLevel::Fatal,
            format!("cannot set up configuration interpreter: {reason}"),
        );
        ConfigError::ScriptFailed(reason)
    }

    fn invalid(&self, path: &Path, reason: String) -> ConfigError {
        let message = format!("{}: {reason}", path.display());
        self.registry
            .report(self.domain, ErrorLevel::Critical, message.clone());
        ConfigError::ValidationError(message)
    }
}
