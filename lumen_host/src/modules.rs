//! Built-in extension modules.
//!
//! - [`console`] - Terminal panes and diagnostic entry points
//!
//! # Adding New Modules
//!
//! 1. Create a new submodule under `modules/`
//! 2. Implement `ExtensionModule` from `lumen_common::module`
//! 3. Register its factory in [`register_builtin_modules`]

pub mod console;

use crate::module_registry::ModuleRegistry;

/// Register every built-in module factory.
pub fn register_builtin_modules(registry: &mut ModuleRegistry) {
    registry.register(console::MODULE_NAME, console::create_module);
}
