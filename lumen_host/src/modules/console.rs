//! Console module.
//!
//! Surfaces are terminal panes. Entry points:
//!
//! | Entry   | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `print` | Logs the arguments at INFO                          |
//! | `warn`  | Reports the arguments at `Warning`                  |
//! | `fail`  | Returns `EntryFailed` with the arguments as reason  |
//! | `panes` | Logs the open panes                                 |

use lumen_common::error::ErrorLevel;
use lumen_common::module::{ExtensionModule, ModuleContext, ModuleError, Surface, SurfaceSpec};
use tracing::info;

/// Registered name.
pub const MODULE_NAME: &str = "console";

/// Panes larger than this in either dimension are refused.
const MAX_PANE_EXTENT: u32 = 16_384;

/// Factory registered with the module registry.
pub fn create_module() -> Box<dyn ExtensionModule> {
    Box::new(ConsoleModule::default())
}

/// Terminal pane provider.
#[derive(Debug, Default)]
pub struct ConsoleModule {
    ctx: Option<ModuleContext>,
    panes: Vec<Surface>,
    next_pane: u32,
}

impl ConsoleModule {
    /// Panes created so far.
    pub fn panes(&self) -> &[Surface] {
        &self.panes
    }

    fn context(&self) -> Result<&ModuleContext, ModuleError> {
        self.ctx
            .as_ref()
            .ok_or_else(|| ModuleError::NotLoaded(MODULE_NAME.to_string()))
    }
}

impl ExtensionModule for ConsoleModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn init(&mut self, ctx: &ModuleContext) -> Result<(), ModuleError> {
        self.ctx = Some(ctx.clone());
        Ok(())
    }

    fn unload(&mut self) -> Result<(), ModuleError> {
        self.panes.clear();
        self.ctx = None;
        Ok(())
    }

    fn create_surface(&mut self, spec: &SurfaceSpec) -> Result<Surface, ModuleError> {
        self.context()?;
        if spec.width == 0 || spec.height == 0 {
            return Err(ModuleError::SurfaceFailed(format!(
                "pane '{}' has an empty extent {}x{}",
                spec.title, spec.width, spec.height
            )));
        }
        if spec.width > MAX_PANE_EXTENT || spec.height > MAX_PANE_EXTENT {
            return Err(ModuleError::SurfaceFailed(format!(
                "pane '{}' exceeds {MAX_PANE_EXTENT} pixels",
                spec.title
            )));
        }

        let surface = Surface {
            id: self.next_pane,
            spec: spec.clone(),
        };
        self.next_pane += 1;
        info!("Console pane {} '{}' opened", surface.id, spec.title);
        self.panes.push(surface.clone());
        Ok(surface)
    }

    fn invoke(&mut self, entry: &str, args: &[String]) -> Result<(), ModuleError> {
        let ctx = self.context()?;
        let text = args.join(" ");
        match entry {
            "print" => info!(target: "lumen::console", "{text}"),
            "warn" => ctx.report(ErrorLevel::Warning, text),
            "fail" => return Err(ModuleError::EntryFailed(text)),
            "panes" => {
                for pane in &self.panes {
                    info!(target: "lumen::console", "pane {}: {}", pane.id, pane.spec.title);
                }
            }
            _ => {
                return Err(ModuleError::UnknownEntryPoint {
                    module: MODULE_NAME.to_string(),
                    entry: entry.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_common::error::ErrorRegistry;

    fn loaded() -> (ConsoleModule, ModuleContext) {
        let registry = ErrorRegistry::shared();
        let ctx = ModuleContext {
            domain: registry.register("module"),
            registry,
        };
        let mut module = ConsoleModule::default();
        module.init(&ctx).unwrap();
        (module, ctx)
    }

    fn spec(width: u32, height: u32) -> SurfaceSpec {
        SurfaceSpec {
            title: "main".to_string(),
            width,
            height,
        }
    }

    #[test]
    fn test_panes_get_sequential_ids() {
        let (mut module, _ctx) = loaded();
        assert_eq!(module.create_surface(&spec(80, 24)).unwrap().id, 0);
        assert_eq!(module.create_surface(&spec(80, 24)).unwrap().id, 1);
        assert_eq!(module.panes().len(), 2);
    }

    #[test]
    fn test_empty_pane_rejected() {
        let (mut module, _ctx) = loaded();
        assert!(matches!(
            module.create_surface(&spec(0, 24)),
            Err(ModuleError::SurfaceFailed(_))
        ));
    }

    #[test]
    fn test_warn_entry_reports() {
        let (mut module, ctx) = loaded();
        module
            .invoke("warn", &["low".to_string(), "disk".to_string()])
            .unwrap();
        let queue = ctx.registry.messages(ctx.domain).unwrap();
        assert_eq!(queue[0].text, "low disk");
        assert_eq!(queue[0].level, ErrorLevel::Warning);
    }

    #[test]
    fn test_uninitialized_module_refuses_calls() {
        let mut module = ConsoleModule::default();
        assert!(matches!(
            module.invoke("print", &[]),
            Err(ModuleError::NotLoaded(_))
        ));
    }

    #[test]
    fn test_unload_closes_panes() {
        let (mut module, _ctx) = loaded();
        module.create_surface(&spec(10, 10)).unwrap();
        module.unload().unwrap();
        assert!(module.panes().is_empty());
    }
}
