//! # Lumen Script
//!
//! Embedded Lua 5.4 for Lumen. A [`ScriptContext`] owns one interpreter,
//! exposes host functions to it, runs script files and routes every failure
//! through the shared error registry.
//!
//! # Module Structure
//!
//! - [`context`] - `ScriptContext`, execution status and lifecycle
//! - [`function`] - Host function capability exposed to scripts
//! - [`config`] - Lua configuration loader
//! - [`error`] - `ScriptError`

pub mod config;
pub mod context;
pub mod error;
pub mod function;

pub use crate::config::LuaConfigLoader;
pub use crate::context::{ContextState, ScriptContext, Status};
pub use crate::error::ScriptError;
pub use crate::function::{HostFunction, ReportFunction};
