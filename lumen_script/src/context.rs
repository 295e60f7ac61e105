//! Script context lifecycle.
//!
//! ```text
//!  create() ──► Created ──parse ok──► Loaded
//!                  │                    │
//!                  └──parse failed──► Failed ──parse──► Loaded | Failed
//!
//!  destroy(self) / drop ──► interpreter released (any state)
//! ```
//!
//! Compile and runtime failures are not distinguished by severity: both set a
//! non-ok [`Status`], keep the error text pending, and `parse` reports it at
//! `Fatal` through the registry before returning. Callers wanting another
//! level call [`ScriptContext::report_errors`] themselves; the pending error
//! is consumed by the first report, so later calls are no-ops.

use crate::error::ScriptError;
use crate::function::HostFunction;
use lumen_common::consts::LUA_DOMAIN;
use lumen_common::error::{DomainId, ErrorLevel, SharedRegistry};
use mlua::{Lua, LuaOptions, MultiValue, StdLib};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Outcome of the last `parse`.
///
/// [`Status::code`] passes the Lua status numbers through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Compiled and ran cleanly
    Ok,
    /// Runtime error while executing the chunk
    Runtime,
    /// Compile error
    Syntax,
    /// Allocation failure inside the interpreter
    Memory,
    /// File could not be read
    File,
}

impl Status {
    /// Numeric status; zero is success.
    pub const fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Runtime => 2,
            Status::Syntax => 3,
            Status::Memory => 4,
            Status::File => 6,
        }
    }

    /// `true` for [`Status::Ok`].
    pub const fn is_ok(self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Ok => "ok",
            Status::Runtime => "runtime error",
            Status::Syntax => "syntax error",
            Status::Memory => "out of memory",
            Status::File => "file error",
        };
        write!(f, "{label} ({})", self.code())
    }
}

/// Lifecycle state of a live context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Interpreter ready, nothing executed yet
    Created,
    /// Last file compiled and ran
    Loaded,
    /// Last file failed to compile or run
    Failed,
}

/// A failed load or call, before it is reported.
struct Failure {
    status: Status,
    message: String,
}

impl From<mlua::Error> for Failure {
    fn from(err: mlua::Error) -> Self {
        match err {
            mlua::Error::SyntaxError { message, .. } => Failure {
                status: Status::Syntax,
                message,
            },
            mlua::Error::MemoryError(message) => Failure {
                status: Status::Memory,
                message,
            },
            mlua::Error::RuntimeError(message) => Failure {
                status: Status::Runtime,
                message,
            },
            other => Failure {
                status: Status::Runtime,
                message: other.to_string(),
            },
        }
    }
}

/// Library set every context starts with; the base library is always present.
///
/// `package` is opened unrestricted, so scripts can `require` C modules and
/// call `package.loadlib`.
fn standard_libs() -> StdLib {
    StdLib::IO | StdLib::TABLE | StdLib::STRING | StdLib::MATH | StdLib::PACKAGE
}

/// One owned Lua interpreter bound to an error domain.
pub struct ScriptContext {
    lua: Lua,
    registry: SharedRegistry,
    domain: DomainId,
    state: ContextState,
    last_status: Status,
    pending_error: Option<String>,
    last_results: usize,
}

impl ScriptContext {
    /// Create an interpreter and register a fresh `"lua"` domain for it.
    ///
    /// # Errors
    /// Returns `ScriptError::Lua` if the interpreter cannot be set up.
    pub fn create(registry: SharedRegistry) -> Result<Self, ScriptError> {
        let domain = registry.register(LUA_DOMAIN);
        Self::with_domain(registry, domain)
    }

    /// Create an interpreter that reports under an already registered domain.
    ///
    /// Contexts sharing a domain share its queue.
    pub fn with_domain(registry: SharedRegistry, domain: DomainId) -> Result<Self, ScriptError> {
        // SAFETY: the library set holds no `debug`, and `package.loadlib` plus the
        // C searchers run only code the configuration script names itself.
        let lua = unsafe { Lua::unsafe_new_with(standard_libs(), LuaOptions::new()) };
        debug!(%domain, "script context created");
        Ok(Self {
            lua,
            registry,
            domain,
            state: ContextState::Created,
            last_status: Status::Ok,
            pending_error: None,
            last_results: 0,
        })
    }

    /// Domain every error of this context is reported under.
    pub fn domain(&self) -> DomainId {
        self.domain
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Status of the most recent `parse`.
    pub fn last_status(&self) -> Status {
        self.last_status
    }

    /// Number of values returned by the last successful chunk.
    pub fn last_results(&self) -> usize {
        self.last_results
    }

    /// Borrow the interpreter for host-side reads such as globals.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// Expose `function` to scripts as global `name`.
    ///
    /// Only scripts executed afterwards see it. Registering a name again
    /// replaces the previous function.
    ///
    /// # Errors
    /// `ScriptError::InvalidName` for an empty name, `ScriptError::Lua` if the
    /// interpreter refuses the function.
    pub fn register_function<F>(&self, name: &str, function: F) -> Result<(), ScriptError>
    where
        F: HostFunction + 'static,
    {
        if name.is_empty() {
            return Err(ScriptError::InvalidName(name.to_string()));
        }
        let callable = self
            .lua
            .create_function(move |lua, args: MultiValue| function.call(lua, args))?;
        self.lua.globals().set(name, callable)?;
        debug!(domain = %self.domain, "registered host function '{name}'");
        Ok(())
    }

    /// Compile the file at `path` and run it with no arguments.
    ///
    /// On failure the error is reported at `Fatal` before returning.
    pub fn parse(&mut self, path: impl AsRef<Path>) -> Status {
        let path = path.as_ref();
        let status = match self.execute(path) {
            Ok(results) => {
                self.last_results = results;
                self.pending_error = None;
                Status::Ok
            }
            Err(failure) => {
                self.last_results = 0;
                self.pending_error = Some(if failure.message.is_empty() {
                    format!("{}: {}", path.display(), failure.status)
                } else {
                    failure.message
                });
                failure.status
            }
        };

        self.last_status = status;
        if status.is_ok() {
            self.state = ContextState::Loaded;
            info!(domain = %self.domain, "executed {}", path.display());
        } else {
            self.state = ContextState::Failed;
            self.report_errors(ErrorLevel::Fatal);
        }
        status
    }

    fn execute(&self, path: &Path) -> Result<usize, Failure> {
        let source = fs::read(path).map_err(|e| Failure {
            status: Status::File,
            message: format!("cannot open {}: {e}", path.display()),
        })?;
        let chunk = self
            .lua
            .load(source)
            .set_name(format!("@{}", path.display()));
        let function = chunk.into_function()?;
        let results: MultiValue = function.call(())?;
        Ok(results.len())
    }

    /// Report the pending error of the last failed `parse` at `level`.
    ///
    /// No-op when the last status is ok or the error was already reported.
    pub fn report_errors(&mut self, level: ErrorLevel) {
        if self.last_status.is_ok() {
            return;
        }
        if let Some(message) = self.pending_error.take() {
            self.registry.report(self.domain, level, message);
        }
    }

    /// Release the interpreter. The context cannot be used afterwards.
    pub fn destroy(self) {
        drop(self);
    }
}

impl Drop for ScriptContext {
    fn drop(&mut self) {
        debug!(domain = %self.domain, "script context destroyed");
    }
}

impl fmt::Debug for ScriptContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptContext")
            .field("domain", &self.domain)
            .field("state", &self.state)
            .field("last_status", &self.last_status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_common::error::ErrorRegistry;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn script(source: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(source.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Ok.code(), 0);
        assert!(Status::Ok.is_ok());
        for status in [Status::Runtime, Status::Syntax, Status::Memory, Status::File] {
            assert_ne!(status.code(), 0);
            assert!(!status.is_ok());
        }
    }

    #[test]
    fn test_create_registers_lua_domain() {
        let registry = ErrorRegistry::shared();
        let ctx = ScriptContext::create(registry.clone()).unwrap();
        assert_eq!(registry.lookup(ctx.domain()).as_deref(), Some("lua"));
        assert_eq!(ctx.state(), ContextState::Created);
        assert_eq!(ctx.last_status(), Status::Ok);
    }

    #[test]
    fn test_standard_libraries_loaded() {
        let registry = ErrorRegistry::shared();
        let mut ctx = ScriptContext::create(registry).unwrap();
        let file = script(
            "assert(io and table and string and math and package)\n\
             ok = string.format('%d', math.floor(2.5))",
        );
        assert_eq!(ctx.parse(file.path()), Status::Ok);
        let ok: String = ctx.lua().globals().get("ok").unwrap();
        assert_eq!(ok, "2");
    }

    #[test]
    fn test_dynamic_library_loading_enabled() {
        let registry = ErrorRegistry::shared();
        let mut ctx = ScriptContext::create(registry.clone()).unwrap();
        let file = script(
            "assert(type(package.loadlib) == 'function')\n\
             local f, err, where = package.loadlib('/nonexistent/libnothing.so', '*')\n\
             assert(f == nil and where == 'open')\n\
             loaderr = err",
        );
        assert_eq!(ctx.parse(file.path()), Status::Ok);
        let err: String = ctx.lua().globals().get("loaderr").unwrap();
        assert!(!err.contains("safe mode"), "{err}");
        assert!(registry.messages(ctx.domain()).unwrap().is_empty());
    }

    #[test]
    fn test_returned_values_counted() {
        let registry = ErrorRegistry::shared();
        let mut ctx = ScriptContext::create(registry).unwrap();
        let file = script("return 1, 'two', {}");
        assert_eq!(ctx.parse(file.path()), Status::Ok);
        assert_eq!(ctx.last_results(), 3);
    }

    #[test]
    fn test_runtime_error_status() {
        let registry = ErrorRegistry::shared();
        let mut ctx = ScriptContext::create(registry.clone()).unwrap();
        let file = script("error('kaboom')");
        assert_eq!(ctx.parse(file.path()), Status::Runtime);
        assert_eq!(ctx.state(), ContextState::Failed);

        let queue = registry.messages(ctx.domain()).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].level, ErrorLevel::Fatal);
        assert!(queue[0].text.contains("kaboom"));
    }

    #[test]
    fn test_failed_context_can_parse_again() {
        let registry = ErrorRegistry::shared();
        let mut ctx = ScriptContext::create(registry).unwrap();
        let bad = script("this is not lua");
        let good = script("value = 1");

        assert_eq!(ctx.parse(bad.path()), Status::Syntax);
        assert_eq!(ctx.parse(good.path()), Status::Ok);
        assert_eq!(ctx.state(), ContextState::Loaded);
    }

    #[test]
    fn test_empty_function_name_rejected() {
        let registry = ErrorRegistry::shared();
        let ctx = ScriptContext::create(registry).unwrap();
        let result =
            ctx.register_function("", |_: &Lua, args: MultiValue| Ok::<_, mlua::Error>(args));
        assert!(matches!(result, Err(ScriptError::InvalidName(_))));
    }
}
