//! Error subscribers installed by the host.
//!
//! - [`install_console`] - re-emits reports as `tracing` events
//! - [`FatalLatch`] - remembers the first `Fatal` report so startup can stop

use lumen_common::error::{ErrorEvent, ErrorLevel, ErrorRegistry, SharedRegistry, SubscriptionId};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, warn};

/// Print every report at or above `min_level` through `tracing`.
///
/// `Fatal` and `Critical` become ERROR events, `Warning` becomes WARN.
/// Domain names are resolved at print time.
pub fn install_console(registry: &SharedRegistry, min_level: ErrorLevel) -> SubscriptionId {
    let names = Arc::downgrade(registry);
    registry.add_callback(move |event: &ErrorEvent<'_>| {
        if event.level < min_level {
            return;
        }
        let domain = names
            .upgrade()
            .and_then(|registry| registry.lookup(event.domain))
            .unwrap_or_else(|| event.domain.to_string());
        match event.level {
            ErrorLevel::Fatal | ErrorLevel::Critical => {
                error!(domain = %domain, level = %event.level, "{}", event.message);
            }
            ErrorLevel::Warning => {
                warn!(domain = %domain, level = %event.level, "{}", event.message);
            }
        }
    })
}

/// Trips on the first `Fatal` report.
#[derive(Debug, Clone, Default)]
pub struct FatalLatch {
    tripped: Arc<AtomicBool>,
    first: Arc<Mutex<Option<String>>>,
}

impl FatalLatch {
    /// Subscribe a new latch to `registry`.
    pub fn install(registry: &ErrorRegistry) -> Self {
        let latch = Self::default();
        let sink = latch.clone();
        registry.add_callback(move |event| {
            if event.level == ErrorLevel::Fatal {
                sink.trip(event.message);
            }
        });
        latch
    }

    fn trip(&self, message: &str) {
        if !self.tripped.swap(true, Ordering::SeqCst) {
            *self.first.lock() = Some(message.to_string());
        }
    }

    /// `true` once any `Fatal` report was seen.
    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }

    /// Text of the first `Fatal` report.
    pub fn first_message(&self) -> Option<String> {
        self.first.lock().clone()
    }
}
