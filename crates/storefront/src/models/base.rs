//! Shared model plumbing.

use std::sync::{Mutex, PoisonError};

use crate::events::{AppEvent, EventBus};

/// One private state slot plus a bound emit capability.
///
/// Outside code only ever sees cloned snapshots via [`ModelState::get`];
/// the owning model replaces the whole value atomically with
/// [`ModelState::set`]. This forces every mutation through the model's
/// public methods, each of which documents the transition with an event.
///
/// Locks are never held while emitting, so handlers are free to read the
/// model that just notified them.
pub struct ModelState<T> {
    data: Mutex<T>,
    bus: EventBus,
}

impl<T: Clone> ModelState<T> {
    /// Create a state slot with its initial value and bus binding.
    pub fn new(bus: EventBus, initial: T) -> Self {
        Self {
            data: Mutex::new(initial),
            bus,
        }
    }

    /// A snapshot of the current state.
    pub fn get(&self) -> T {
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Atomically replace the whole state value.
    pub fn set(&self, value: T) {
        *self.data.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }

    /// Forward an event to the shared bus.
    pub fn emit(&self, event: AppEvent) {
        self.bus.emit(event);
    }

    /// The bus this model is bound to.
    pub const fn bus(&self) -> &EventBus {
        &self.bus
    }
}
