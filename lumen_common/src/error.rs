//! Leveled error reporting.
//!
//! - [`level`] - `ErrorLevel` severity ordering
//! - [`registry`] - `ErrorRegistry`, domains, queues and subscriber fan-out

pub mod level;
pub mod registry;

pub use level::{ErrorLevel, ParseLevelError};
pub use registry::{
    DomainId, ErrorCallback, ErrorEvent, ErrorRegistry, Message, SharedRegistry, SubscriptionId,
};
