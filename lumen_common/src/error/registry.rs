//! Error domain registry.
//!
//! The registry is the single integration point between subsystems that
//! produce errors (config loader, script contexts, extension modules) and
//! the layers that present them (console, log file, dialogs).
//!
//! # Flow
//!
//! ```text
//!  producer ──register(name)──► DomainId
//!  producer ──report(id, level, text)──► queue[id].push ──► every subscriber, in order
//! ```
//!
//! Ids are handed out monotonically from 0 and never reused. Registration is
//! never deduplicated by name; use [`ErrorRegistry::find`] first when one
//! domain per name is wanted.
//!
//! # Re-entrancy
//!
//! The internal lock is released before subscribers run, so a callback may
//! itself call `report`, `register` or `add_callback`. Subscribers added
//! during a fan-out only see later reports.

use crate::error::level::ErrorLevel;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Stable identifier of a registered error domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DomainId(u32);

impl DomainId {
    /// Build an id from its raw value.
    ///
    /// Only ids returned by [`ErrorRegistry::register`] refer to a domain.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One reported error, as stored in its domain queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Severity at report time.
    pub level: ErrorLevel,
    /// Fully formatted text.
    pub text: String,
}

impl Message {
    /// Create a queue entry.
    pub fn new(level: ErrorLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// What a subscriber receives for every report.
#[derive(Debug, Clone, Copy)]
pub struct ErrorEvent<'a> {
    /// Reporting domain.
    pub domain: DomainId,
    /// Severity.
    pub level: ErrorLevel,
    /// Formatted message text.
    pub message: &'a str,
}

/// Handle returned by [`ErrorRegistry::add_callback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Subscriber callback. Any context the subscriber needs is captured by the closure.
pub type ErrorCallback = Arc<dyn Fn(&ErrorEvent<'_>) + Send + Sync>;

/// Registry handle shared between producers and subscribers.
pub type SharedRegistry = Arc<ErrorRegistry>;

struct Domain {
    name: String,
    queue: Vec<Message>,
}

struct Subscriber {
    id: SubscriptionId,
    callback: ErrorCallback,
}

#[derive(Default)]
struct Inner {
    domains: Vec<Domain>,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
}

/// Registry of error domains, their message queues and the subscriber list.
///
/// Constructed once at startup and passed to every producer and subscriber.
/// No global state, so each test can own an isolated registry.
#[derive(Default)]
pub struct ErrorRegistry {
    inner: Mutex<Inner>,
}

impl ErrorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry behind a [`SharedRegistry`] handle.
    pub fn shared() -> SharedRegistry {
        Arc::new(Self::new())
    }

    /// Register a new domain and return its id.
    ///
    /// Always allocates a fresh id, even when `name` is already registered.
    ///
    /// # Panics
    /// Panics if the `u32` id space is exhausted.
    pub fn register(&self, name: &str) -> DomainId {
        let mut inner = self.inner.lock();
        let raw = u32::try_from(inner.domains.len()).expect("error domain id space exhausted");
        inner.domains.push(Domain {
            name: name.to_string(),
            queue: Vec::new(),
        });
        let id = DomainId(raw);
        debug!(domain = %id, "registered error domain '{name}'");
        id
    }

    /// Name a domain was registered under, or `None` for unknown ids.
    pub fn lookup(&self, id: DomainId) -> Option<String> {
        self.inner
            .lock()
            .domains
            .get(id.index())
            .map(|domain| domain.name.clone())
    }

    /// First domain registered under `name`.
    pub fn find(&self, name: &str) -> Option<DomainId> {
        self.inner
            .lock()
            .domains
            .iter()
            .position(|domain| domain.name == name)
            .map(|index| DomainId(index as u32))
    }

    /// All domains in registration order.
    pub fn domains(&self) -> Vec<(DomainId, String)> {
        self.inner
            .lock()
            .domains
            .iter()
            .enumerate()
            .map(|(index, domain)| (DomainId(index as u32), domain.name.clone()))
            .collect()
    }

    /// Record a message against `id`, then hand it to every subscriber.
    ///
    /// The message is queued before any callback runs. Callbacks run on the
    /// caller's stack in registration order. Reports against ids that were
    /// never registered are ignored: nothing is queued and no callback runs.
    pub fn report(&self, id: DomainId, level: ErrorLevel, message: impl Into<String>) {
        let text = message.into();

        let callbacks = {
            let mut inner = self.inner.lock();
            let Inner {
                domains,
                subscribers,
                ..
            } = &mut *inner;
            match domains.get_mut(id.index()) {
                Some(domain) => {
                    domain.queue.push(Message::new(level, text.clone()));
                    Some(
                        subscribers
                            .iter()
                            .map(|subscriber| Arc::clone(&subscriber.callback))
                            .collect::<Vec<_>>(),
                    )
                }
                None => None,
            }
        };

        let Some(callbacks) = callbacks else {
            warn!(domain = %id, %level, "report for unregistered error domain ignored: {text}");
            return;
        };

        let event = ErrorEvent {
            domain: id,
            level,
            message: &text,
        };
        for callback in &callbacks {
            callback(&event);
        }
    }

    /// Subscribe to every report from every domain.
    pub fn add_callback<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ErrorEvent<'_>) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.subscribers.push(Subscriber {
            id,
            callback: Arc::new(callback),
        });
        id
    }

    /// Remove a subscriber. Returns `false` if it was already gone.
    pub fn remove_callback(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|subscriber| subscriber.id != id);
        inner.subscribers.len() != before
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// Snapshot of a domain's queue, oldest first.
    pub fn messages(&self, id: DomainId) -> Option<Vec<Message>> {
        self.inner
            .lock()
            .domains
            .get(id.index())
            .map(|domain| domain.queue.clone())
    }

    /// Take every queued message of a domain, leaving its queue empty.
    pub fn drain(&self, id: DomainId) -> Vec<Message> {
        self.inner
            .lock()
            .domains
            .get_mut(id.index())
            .map(|domain| std::mem::take(&mut domain.queue))
            .unwrap_or_default()
    }

    /// Drop every subscriber and queued message.
    ///
    /// Domains stay registered so ids held by producers remain valid.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock();
        let pending: usize = inner.domains.iter().map(|domain| domain.queue.len()).sum();
        let subscribers = inner.subscribers.len();
        inner.subscribers.clear();
        for domain in &mut inner.domains {
            domain.queue.clear();
        }
        info!(
            "Error registry shut down: {} domains, {} subscribers, {} queued messages discarded",
            inner.domains.len(),
            subscribers,
            pending
        );
    }
}

impl fmt::Debug for ErrorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ErrorRegistry")
            .field("domains", &inner.domains.len())
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

/// Report a message built with `format!` syntax.
///
/// ```rust
/// use lumen_common::error::{ErrorLevel, ErrorRegistry};
///
/// let registry = ErrorRegistry::new();
/// let id = registry.register("module");
/// lumen_common::report!(registry, id, ErrorLevel::Critical, "entry '{}' failed", "draw");
/// assert_eq!(registry.messages(id).unwrap()[0].text, "entry 'draw' failed");
/// ```
#[macro_export]
macro_rules! report {
    ($registry:expr, $domain:expr, $level:expr, $($arg:tt)+) => {
        $registry.report($domain, $level, ::std::format!($($arg)+))
    };
}
