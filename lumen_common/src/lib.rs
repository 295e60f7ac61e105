//! Lumen Common Library
//!
//! Shared building blocks for every Lumen crate: the error-domain registry
//! that all subsystems report through, settings loading, path resolution
//! and the capability interface of extension modules.
//!
//! # Module Structure
//!
//! - [`error`] - Error levels and the error-domain registry
//! - [`config`] - TOML settings loading traits and types
//! - [`module`] - Extension module capability table
//! - [`paths`] - XDG config path resolution
//! - [`consts`] - Well-known domain labels
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use lumen_common::prelude::*;
//!
//! let registry = ErrorRegistry::shared();
//! let domain = registry.register("config");
//! lumen_common::report!(registry, domain, ErrorLevel::Warning, "missing key {}", "font");
//! assert_eq!(registry.messages(domain).map(|q| q.len()), Some(1));
//! ```

pub mod config;
pub mod consts;
pub mod error;
pub mod module;
pub mod paths;
pub mod prelude;
