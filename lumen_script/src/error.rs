//! Script error types.

use thiserror::Error;

/// Errors raised while building or extending a script context.
///
/// Failures of the scripts themselves are not errors of this type: they are
/// reported through the error registry and surface as a [`crate::Status`].
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Interpreter error
    #[error("Lua error: {0}")]
    Lua(#[from] mlua::Error),

    /// Host function name cannot be used as a global
    #[error("Invalid host function name: {0:?}")]
    InvalidName(String),
}
