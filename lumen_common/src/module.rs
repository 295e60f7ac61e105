//! Extension module capability table and error types.
//!
//! This module defines:
//! - `ExtensionModule` trait - Interface every extension module exposes
//! - `ModuleError` enum - Error types for module operations
//! - `ModuleFactory` type alias - Factory function type
//! - `ModuleContext` - What a module receives at init to report errors
//!
//! Discovery and loading of shared objects is the loader's business; this
//! crate only fixes the capability table the loader talks to.

use crate::error::{DomainId, ErrorLevel, SharedRegistry};
use thiserror::Error;

/// Error types for extension module operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    /// Module initialization failed
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    /// No factory registered under this name
    #[error("Module not found: {0}")]
    NotFound(String),

    /// Module is registered but not loaded
    #[error("Module not loaded: {0}")]
    NotLoaded(String),

    /// Named entry point does not exist
    #[error("Module '{module}' has no entry point '{entry}'")]
    UnknownEntryPoint {
        /// Module name
        module: String,
        /// Requested entry point
        entry: String,
    },

    /// Entry point ran and failed
    #[error("Entry point failed: {0}")]
    EntryFailed(String),

    /// Display surface could not be created
    #[error("Surface creation failed: {0}")]
    SurfaceFailed(String),
}

/// Factory function type for creating module instances.
pub type ModuleFactory = fn() -> Box<dyn ExtensionModule>;

/// Handed to a module at `init` so it can report through the shared registry.
#[derive(Debug, Clone)]
pub struct ModuleContext {
    /// Shared error registry.
    pub registry: SharedRegistry,
    /// Domain the loader registered for module errors.
    pub domain: DomainId,
}

impl ModuleContext {
    /// Report under the loader's domain.
    pub fn report(&self, level: ErrorLevel, message: impl Into<String>) {
        self.registry.report(self.domain, level, message);
    }
}

/// Requested geometry of a display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSpec {
    /// Window or panel title
    pub title: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// A display surface owned by a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    /// Module-local surface number
    pub id: u32,
    /// Geometry the surface was created with
    pub spec: SurfaceSpec,
}

/// Trait defining the interface for extension modules.
///
/// # Lifecycle
///
/// 1. `init()` - Called once right after the factory creates the module
/// 2. `create_surface()` / `invoke()` - Any number of times
/// 3. `unload()` - Called once before the module is dropped
pub trait ExtensionModule: Send {
    /// Returns the module's unique identifier.
    fn name(&self) -> &'static str;

    /// Returns the module's semantic version.
    fn version(&self) -> &'static str;

    /// Initialize the module.
    ///
    /// # Errors
    /// Return `ModuleError::InitFailed` if initialization cannot complete.
    fn init(&mut self, ctx: &ModuleContext) -> Result<(), ModuleError>;

    /// Release everything the module holds.
    fn unload(&mut self) -> Result<(), ModuleError>;

    /// Create a display surface.
    ///
    /// Default: modules without a display return `SurfaceFailed`.
    fn create_surface(&mut self, spec: &SurfaceSpec) -> Result<Surface, ModuleError> {
        Err(ModuleError::SurfaceFailed(format!(
            "module '{}' cannot create surface '{}'",
            self.name(),
            spec.title
        )))
    }

    /// Invoke a named entry point.
    fn invoke(&mut self, entry: &str, args: &[String]) -> Result<(), ModuleError>;
}
