//! Well-known error domain labels.
//!
//! Each reporting subsystem registers exactly one of these at its own
//! initialization time.

/// Domain registered by every script context.
pub const LUA_DOMAIN: &str = "lua";

/// Domain registered by the configuration loader.
pub const CONFIG_DOMAIN: &str = "config";

/// Domain registered by the extension module loader.
pub const MODULE_DOMAIN: &str = "module";
