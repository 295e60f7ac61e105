//! Host functions callable from scripts.
//!
//! A host function receives the interpreter and the call arguments and
//! returns the values handed back to the script. Closures with the matching
//! signature implement [`HostFunction`] directly.

use lumen_common::error::{DomainId, ErrorLevel, SharedRegistry};
use mlua::{FromLuaMulti, Lua, MultiValue, Variadic};

/// Native functionality exposed to script code.
pub trait HostFunction {
    /// Run the function for one script call.
    fn call(&self, lua: &Lua, args: MultiValue) -> mlua::Result<MultiValue>;
}

impl<F> HostFunction for F
where
    F: Fn(&Lua, MultiValue) -> mlua::Result<MultiValue>,
{
    fn call(&self, lua: &Lua, args: MultiValue) -> mlua::Result<MultiValue> {
        self(lua, args)
    }
}

/// Reports its arguments, joined by tabs, at a fixed level.
///
/// Lets scripts raise warnings without aborting, e.g. `warn("unknown key", k)`.
#[derive(Debug, Clone)]
pub struct ReportFunction {
    registry: SharedRegistry,
    domain: DomainId,
    level: ErrorLevel,
}

impl ReportFunction {
    /// Report under `domain` at `level`.
    pub fn new(registry: SharedRegistry, domain: DomainId, level: ErrorLevel) -> Self {
        Self {
            registry,
            domain,
            level,
        }
    }
}

impl HostFunction for ReportFunction {
    fn call(&self, lua: &Lua, args: MultiValue) -> mlua::Result<MultiValue> {
        let parts = Variadic::<String>::from_lua_multi(args, lua)?;
        self.registry.report(self.domain, self.level, parts.join("\t"));
        Ok(MultiValue::new())
    }
}
