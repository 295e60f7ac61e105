//! Extension module registry.
//!
//! Holds the factories of every known module and the instances that are
//! currently loaded. Every failure is reported through the error registry
//! under the `module` domain before it is returned.

use lumen_common::consts::MODULE_DOMAIN;
use lumen_common::error::{DomainId, ErrorLevel, SharedRegistry};
use lumen_common::module::{
    ExtensionModule, ModuleContext, ModuleError, ModuleFactory, Surface, SurfaceSpec,
};
use std::collections::HashMap;
use tracing::{debug, info};

/// Registry of available and loaded extension modules.
///
/// Constructed at startup, populated via `register()`, and owned by the
/// host. No global state, testable in isolation.
pub struct ModuleRegistry {
    factories: HashMap<&'static str, ModuleFactory>,
    loaded: Vec<Box<dyn ExtensionModule>>,
    context: ModuleContext,
}

impl ModuleRegistry {
    /// Create an empty registry and register the `module` error domain.
    pub fn new(registry: SharedRegistry) -> Self {
        let domain = registry.register(MODULE_DOMAIN);
        Self {
            factories: HashMap::new(),
            loaded: Vec::new(),
            context: ModuleContext { registry, domain },
        }
    }

    /// Domain module errors are reported under.
    pub fn domain(&self) -> DomainId {
        self.context.domain
    }

    /// Register a module factory.
    ///
    /// # Panics
    /// Panics if a module with the same name is already registered.
    pub fn register(&mut self, name: &'static str, factory: ModuleFactory) {
        if self.factories.contains_key(name) {
            panic!("Module '{name}' is already registered");
        }
        self.factories.insert(name, factory);
    }

    /// Get a module factory by name.
    pub fn get_factory(&self, name: &str) -> Option<ModuleFactory> {
        self.factories.get(name).copied()
    }

    /// List all registered module names.
    pub fn list_modules(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    /// Names of loaded modules, in load order.
    pub fn loaded_modules(&self) -> Vec<&'static str> {
        self.loaded.iter().map(|module| module.name()).collect()
    }

    /// `true` if `name` is loaded.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.iter().any(|module| module.name() == name)
    }

    /// Create and initialize a module. Loading a loaded module is a no-op.
    ///
    /// # Errors
    /// `ModuleError::NotFound` for unknown names, or whatever `init` returned.
    /// Both are reported at `Critical`.
    pub fn load(&mut self, name: &str) -> Result<(), ModuleError> {
        if self.is_loaded(name) {
            debug!("Module '{name}' already loaded");
            return Ok(());
        }
        let factory = self
            .get_factory(name)
            .ok_or_else(|| ModuleError::NotFound(name.to_string()))
            .map_err(|e| self.critical(e))?;

        let mut module = factory();
        module.init(&self.context).map_err(|e| self.critical(e))?;
        info!("Loaded module '{}' v{}", module.name(), module.version());
        self.loaded.push(module);
        Ok(())
    }

    /// Call a named entry point of a loaded module.
    pub fn invoke(&mut self, name: &str, entry: &str, args: &[String]) -> Result<(), ModuleError> {
        let result = match self.find_mut(name) {
            Some(module) => module.invoke(entry, args),
            None => Err(ModuleError::NotLoaded(name.to_string())),
        };
        result.map_err(|e| self.critical(e))
    }

    /// Ask a loaded module for a display surface.
    pub fn create_surface(
        &mut self,
        name: &str,
        spec: &SurfaceSpec,
    ) -> Result<Surface, ModuleError> {
        let result = match self.find_mut(name) {
            Some(module) => module.create_surface(spec),
            None => Err(ModuleError::NotLoaded(name.to_string())),
        };
        result.map_err(|e| self.critical(e))
    }

    /// Unload every module, most recently loaded first.
    ///
    /// Unload failures are reported at `Warning` and do not stop the others.
    pub fn unload_all(&mut self) {
        while let Some(mut module) = self.loaded.pop() {
            match module.unload() {
                Ok(()) => info!("Unloaded module '{}'", module.name()),
                Err(e) => self.context.report(
                    ErrorLevel::Warning,
                    format!("unloading '{}' failed: {e}", module.name()),
                ),
            }
        }
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Box<dyn ExtensionModule>> {
        self.loaded.iter_mut().find(|module| module.name() == name)
    }

    fn critical(&self, err: ModuleError) -> ModuleError {
        self.context.report(ErrorLevel::Critical, err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_common::error::ErrorRegistry;

    struct TestModule;

    impl ExtensionModule for TestModule {
        fn name(&self) -> &'static str {
            "test"
        }

        fn version(&self) -> &'static str {
            "0.1.0"
        }

        fn init(&mut self, _ctx: &ModuleContext) -> Result<(), ModuleError> {
            Ok(())
        }

        fn unload(&mut self) -> Result<(), ModuleError> {
            Ok(())
        }

        fn invoke(&mut self, entry: &str, _args: &[String]) -> Result<(), ModuleError> {
            match entry {
                "ping" => Ok(()),
                _ => Err(ModuleError::UnknownEntryPoint {
                    module: "test".to_string(),
                    entry: entry.to_string(),
                }),
            }
        }
    }

    struct BrokenModule;

    impl ExtensionModule for BrokenModule {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn version(&self) -> &'static str {
            "0.0.1"
        }

        fn init(&mut self, _ctx: &ModuleContext) -> Result<(), ModuleError> {
            Err(ModuleError::InitFailed("no device".to_string()))
        }

        fn unload(&mut self) -> Result<(), ModuleError> {
            Ok(())
        }

        fn invoke(&mut self, _entry: &str, _args: &[String]) -> Result<(), ModuleError> {
            Ok(())
        }
    }

    fn create_test_module() -> Box<dyn ExtensionModule> {
        Box::new(TestModule)
    }

    fn create_broken_module() -> Box<dyn ExtensionModule> {
        Box::new(BrokenModule)
    }

    #[test]
    fn registry_register_and_load() {
        let mut reg = ModuleRegistry::new(ErrorRegistry::shared());
        reg.register("test", create_test_module);

        reg.load("test").expect("should load");
        reg.load("test").expect("second load is a no-op");
        assert_eq!(reg.loaded_modules(), vec!["test"]);
        reg.invoke("test", "ping", &[]).expect("ping");
    }

    #[test]
    fn registry_module_not_found_is_reported() {
        let errors = ErrorRegistry::shared();
        let mut reg = ModuleRegistry::new(errors.clone());

        let result = reg.load("nonexistent");
        assert!(matches!(result, Err(ModuleError::NotFound(_))));

        let queue = errors.messages(reg.domain()).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].level, ErrorLevel::Critical);
    }

    #[test]
    fn registry_init_failure_is_not_loaded() {
        let errors = ErrorRegistry::shared();
        let mut reg = ModuleRegistry::new(errors.clone());
        reg.register("broken", create_broken_module);

        assert!(matches!(reg.load("broken"), Err(ModuleError::InitFailed(_))));
        assert!(!reg.is_loaded("broken"));
        assert!(errors.messages(reg.domain()).unwrap()[0].text.contains("no device"));
    }

    #[test]
    fn registry_invoke_unloaded_module() {
        let mut reg = ModuleRegistry::new(ErrorRegistry::shared());
        reg.register("test", create_test_module);
        assert!(matches!(
            reg.invoke("test", "ping", &[]),
            Err(ModuleError::NotLoaded(_))
        ));
    }

    #[test]
    fn registry_list_modules() {
        let mut reg = ModuleRegistry::new(ErrorRegistry::shared());
        reg.register("alpha", create_test_module);
        reg.register("beta", create_test_module);

        let mut names = reg.list_modules();
        names.sort();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn registry_duplicate_panics() {
        let mut reg = ModuleRegistry::new(ErrorRegistry::shared());
        reg.register("dup", create_test_module);
        reg.register("dup", create_test_module);
    }

    #[test]
    fn registry_unload_all_empties() {
        let mut reg = ModuleRegistry::new(ErrorRegistry::shared());
        reg.register("test", create_test_module);
        reg.load("test").unwrap();

        reg.unload_all();
        assert!(reg.loaded_modules().is_empty());
    }
}
