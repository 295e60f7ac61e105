//! # Lumen Host Library
//!
//! Wires the error registry, the Lua configuration loader and extension
//! modules into one process.
//!
//! # Module Structure
//!
//! - [`host`] - `Host` struct, startup and shutdown orchestration
//! - [`module_registry`] - Extension module factories and loaded instances
//! - [`modules`] - Built-in extension modules
//! - [`settings`] - Host settings (TOML) and script configuration (Lua)
//! - [`subscribers`] - Console and fatal-latch error subscribers
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          lumen_host                              │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────────┐  │
//! │  │ LuaConfig    │   │    Host      │◄─►│  ModuleRegistry      │  │
//! │  │ Loader       │◄──┤              │   │                      │  │
//! │  └──────┬───────┘   └──────┬───────┘   └──────────┬───────────┘  │
//! │         │ report           │ subscribe            │ report       │
//! │         ▼                  ▼                      ▼              │
//! │  ┌───────────────────────────────────────────────────────────┐   │
//! │  │             ErrorRegistry (lumen_common)                  │   │
//! │  └───────────────────────────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod host;
pub mod module_registry;
pub mod modules;
pub mod settings;
pub mod subscribers;

// Re-export key types for convenience
pub use crate::host::{Host, HostError};
pub use crate::module_registry::ModuleRegistry;
pub use crate::settings::{HostSettings, ScriptConfig};
pub use crate::subscribers::FatalLatch;
