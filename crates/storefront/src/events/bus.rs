//! Synchronous in-process publish/subscribe dispatcher.

use std::sync::{Arc, Mutex, PoisonError, TryLockError};

use regex::Regex;
use tracing::warn;

use super::{AppEvent, EventKind};

/// Token identifying one subscription, returned by the `on*` registration
/// methods and accepted by [`EventBus::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What a subscription listens for.
enum EventFilter {
    /// Exactly one event kind.
    Kind(EventKind),
    /// Every event whose wire name matches the pattern.
    Pattern(Regex),
    /// Every emission (diagnostics).
    Any,
}

impl EventFilter {
    fn matches(&self, event: &AppEvent) -> bool {
        match self {
            Self::Kind(kind) => *kind == event.kind(),
            Self::Pattern(pattern) => pattern.is_match(event.name()),
            Self::Any => true,
        }
    }
}

type SharedHandler = Arc<Mutex<dyn FnMut(&AppEvent) + Send>>;

struct Subscription {
    id: SubscriptionId,
    filter: EventFilter,
    handler: SharedHandler,
}

struct Registry {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

/// The in-process publish/subscribe bus.
///
/// Dispatch is fully synchronous: [`EventBus::emit`] invokes every matching
/// handler in registration order before returning. Handlers may themselves
/// emit; the handler list is snapshotted at `emit` entry, so registrations
/// made during a dispatch take effect from the next emission. A handler that
/// (indirectly) re-enters itself is skipped for the inner emission.
///
/// The bus is cheaply cloneable; clones share one handler registry.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Mutex<Registry>>,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry {
                subscriptions: Vec::new(),
                next_id: 0,
            })),
        }
    }

    fn subscribe(
        &self,
        filter: EventFilter,
        handler: impl FnMut(&AppEvent) + Send + 'static,
    ) -> SubscriptionId {
        let mut registry = self.registry();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.subscriptions.push(Subscription {
            id,
            filter,
            handler: Arc::new(Mutex::new(handler)),
        });
        id
    }

    /// Register a handler for one event kind.
    pub fn on(
        &self,
        kind: EventKind,
        handler: impl FnMut(&AppEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.subscribe(EventFilter::Kind(kind), handler)
    }

    /// Register one handler for every event whose wire name matches
    /// `pattern` (e.g. `^basket:` for all basket events).
    pub fn on_pattern(
        &self,
        pattern: Regex,
        handler: impl FnMut(&AppEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.subscribe(EventFilter::Pattern(pattern), handler)
    }

    /// Register a catch-all handler receiving every emission.
    pub fn on_any(&self, handler: impl FnMut(&AppEvent) + Send + 'static) -> SubscriptionId {
        self.subscribe(EventFilter::Any, handler)
    }

    /// Remove a subscription. Unknown ids are a no-op.
    pub fn off(&self, id: SubscriptionId) {
        self.registry().subscriptions.retain(|sub| sub.id != id);
    }

    /// Remove every catch-all subscription registered with
    /// [`EventBus::on_any`].
    pub fn off_any(&self) {
        self.registry()
            .subscriptions
            .retain(|sub| !matches!(sub.filter, EventFilter::Any));
    }

    /// Synchronously invoke every matching handler in registration order.
    pub fn emit(&self, event: AppEvent) {
        // Snapshot outside the dispatch loop so handlers can register,
        // remove, and emit without deadlocking on the registry.
        let matching: Vec<SharedHandler> = {
            let registry = self.registry();
            registry
                .subscriptions
                .iter()
                .filter(|sub| sub.filter.matches(&event))
                .map(|sub| Arc::clone(&sub.handler))
                .collect()
        };

        for handler in matching {
            let mut guard = match handler.try_lock() {
                Ok(guard) => guard,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => {
                    // The handler is already running further up the stack.
                    warn!(event = event.name(), "skipping re-entrant handler");
                    continue;
                }
            };
            (*guard)(&event);
        }
    }

    /// Build a callback that emits the event produced by `build` from a
    /// later value. Lets collaborators report back through the bus without
    /// holding a bus reference; any fixed context is captured by `build`.
    pub fn trigger<T, F>(&self, build: F) -> impl Fn(T) + Send + Sync + 'static
    where
        F: Fn(T) -> AppEvent + Send + Sync + 'static,
    {
        let bus = self.clone();
        move |value| bus.emit(build(value))
    }

    fn registry(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
