//! Registry delivering each event batch to every registered observer.

use std::fmt;

use maze_sprint_core::{Event, EventObserver};

/// Ordered set of collaborators notified after each tick.
#[derive(Default)]
pub struct Observers {
    observers: Vec<Box<dyn EventObserver>>,
}

impl Observers {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer; observers are notified in registration order.
    pub fn register(&mut self, observer: Box<dyn EventObserver>) {
        self.observers.push(observer);
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Reports whether no observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Delivers `events` once to every observer. Empty batches are skipped.
    pub fn publish(&mut self, events: &[Event]) {
        if events.is_empty() {
            return;
        }
        for observer in &mut self.observers {
            observer.observe(events);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.observers.len())
            .finish()
    }
}
