//! C7 Progress Bus: a lightweight publish pathway. Observers are
//! non-blocking by contract (spec §4.7) — if one blocks, the pipeline
//! blocks, same as the teacher's direct-call event handlers impose no
//! extra buffering of their own.

use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;
use xgen_core::ProgressEvent;

pub trait ProgressObserver: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

/// Holds zero or more observers, attached at construction. Mutating the
/// observer list mid-run is disallowed by the spec; this type simply
/// never exposes a way to do so after `new`.
pub struct ProgressBus {
    observers: Vec<Box<dyn ProgressObserver>>,
}

impl ProgressBus {
    pub fn new(observers: Vec<Box<dyn ProgressObserver>>) -> Self {
        Self { observers }
    }

    pub fn empty() -> Self {
        Self { observers: Vec::new() }
    }

    /// Publishes to every observer. An observer panic is caught and
    /// logged — it must never affect the pipeline outcome (spec §4.5).
    pub fn publish(&self, event: ProgressEvent) {
        for observer in &self.observers {
            let result = catch_unwind(AssertUnwindSafe(|| observer.on_event(&event)));
            if result.is_err() {
                warn!(step = event.step_index, "progress observer panicked; event dropped for that observer");
            }
        }
    }
}
