//! Prelude module for common re-exports.
//!
//! ```rust
//! use lumen_common::prelude::*;
//! ```

// ─── Error reporting ────────────────────────────────────────────────
pub use crate::error::{
    DomainId, ErrorEvent, ErrorLevel, ErrorRegistry, Message, SharedRegistry, SubscriptionId,
};

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, LogLevel, SharedConfig, TomlLoader};

// ─── Domain labels ──────────────────────────────────────────────────
pub use crate::consts::{CONFIG_DOMAIN, LUA_DOMAIN, MODULE_DOMAIN};

// ─── Extension modules ──────────────────────────────────────────────
pub use crate::module::{
    ExtensionModule, ModuleContext, ModuleError, ModuleFactory, Surface, SurfaceSpec,
};
