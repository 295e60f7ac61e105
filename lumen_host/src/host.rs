//! Host struct and startup orchestration.
//!
//! The `Host` owns the error registry and everything that reports into it.
//! Startup runs in a fixed order:
//!
//! 1. Settings validated, console and fatal-latch subscribers installed
//! 2. Configuration script executed (`init.lua`)
//! 3. Modules loaded: settings list, then script list, then CLI extras
//! 4. Surfaces created, entry points invoked
//!
//! With `exit_on_fatal`, any `Fatal` report stops startup at the next step
//! boundary. `Critical` reports (failed module loads, failed entry points)
//! leave the host running in a degraded state.

use crate::module_registry::ModuleRegistry;
use crate::modules::register_builtin_modules;
use crate::settings::{HostSettings, Invocation, ScriptConfig};
use crate::subscribers::{FatalLatch, install_console};
use lumen_common::config::ConfigError;
use lumen_common::error::{ErrorRegistry, SharedRegistry, SubscriptionId};
use lumen_common::module::ModuleError;
use lumen_script::LuaConfigLoader;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that stop the host.
#[derive(Debug, Error)]
pub enum HostError {
    /// Settings or configuration script problem
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Module problem that could not be tolerated
    #[error(transparent)]
    Module(#[from] ModuleError),

    /// A `Fatal` error was reported and `exit_on_fatal` is set
    #[error("Fatal error reported: {0}")]
    Fatal(String),
}

/// Owns the registry, the configuration loader and the module registry.
pub struct Host {
    settings: HostSettings,
    registry: SharedRegistry,
    console: SubscriptionId,
    latch: FatalLatch,
    config_loader: LuaConfigLoader,
    modules: ModuleRegistry,
}

impl Host {
    /// Create a host with the built-in modules registered.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if the settings are invalid.
    pub fn new(settings: HostSettings) -> Result<Self, HostError> {
        settings.shared.validate()?;

        let registry = ErrorRegistry::shared();
        let console = install_console(&registry, settings.errors.min_console_level);
        let latch = FatalLatch::install(&registry);
        let config_loader = LuaConfigLoader::new(registry.clone());
        let mut modules = ModuleRegistry::new(registry.clone());
        register_builtin_modules(&mut modules);

        info!(
            "Host '{}' created with {} built-in modules",
            settings.shared.service_name,
            modules.list_modules().len()
        );

        Ok(Self {
            settings,
            registry,
            console,
            latch,
            config_loader,
            modules,
        })
    }

    /// Shared error registry.
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Module registry, e.g. to register additional factories.
    pub fn modules(&mut self) -> &mut ModuleRegistry {
        &mut self.modules
    }

    /// Fatal latch installed at construction.
    pub fn latch(&self) -> &FatalLatch {
        &self.latch
    }

    /// Run the configuration script and return its `config` table.
    pub fn load_script(&mut self, path: &Path) -> Result<ScriptConfig, HostError> {
        let config = self.config_loader.load(path)?;
        self.check_fatal()?;
        Ok(config)
    }

    /// Load modules, create surfaces and run entry points.
    ///
    /// `extra_modules` and `extra_invocations` come from the command line and
    /// run after the script's own lists.
    pub fn start(
        &mut self,
        script: &ScriptConfig,
        extra_modules: &[String],
        extra_invocations: &[Invocation],
    ) -> Result<(), HostError> {
        let names: Vec<String> = self
            .settings
            .modules
            .load
            .iter()
            .chain(&script.modules)
            .chain(extra_modules)
            .cloned()
            .collect();
        for name in &names {
            if let Err(e) = self.modules.load(name) {
                warn!("Continuing without module '{name}': {e}");
            }
            self.check_fatal()?;
        }

        for surface in &script.surfaces {
            if let Err(e) = self.modules.create_surface(&surface.module, &surface.spec()) {
                warn!("Surface '{}' not created: {e}", surface.title);
            }
            self.check_fatal()?;
        }

        for invocation in script.invoke.iter().chain(extra_invocations) {
            self.invoke(invocation)?;
        }

        info!(
            "Host started with modules {:?}",
            self.modules.loaded_modules()
        );
        Ok(())
    }

    /// Run one entry point. Failures are reported and tolerated.
    pub fn invoke(&mut self, invocation: &Invocation) -> Result<(), HostError> {
        let Invocation {
            module,
            entry,
            args,
        } = invocation;
        if let Err(e) = self.modules.invoke(module, entry, args) {
            warn!("Entry point {module}:{entry} failed: {e}");
        }
        self.check_fatal()
    }

    /// Unload modules, detach subscribers and clear the registry.
    pub fn shutdown(mut self) {
        self.modules.unload_all();
        self.registry.remove_callback(self.console);
        self.registry.shutdown();
        info!("Host '{}' shut down", self.settings.shared.service_name);
    }

    fn check_fatal(&self) -> Result<(), HostError> {
        if self.settings.errors.exit_on_fatal && self.latch.is_tripped() {
            return Err(HostError::Fatal(
                self.latch.first_message().unwrap_or_default(),
            ));
        }
        Ok(())
    }
}
