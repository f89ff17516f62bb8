// Metrics Collector - process-wide additive counters

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Label -> count registry
///
/// Share via `Arc`; increments are serialized by the inner mutex. No
/// decrement, no reset.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    counts: Mutex<BTreeMap<String, u64>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one to `label`, returning the new count
    pub fn increment(&self, label: &str) -> u64 {
        let mut counts = self.lock();
        let count = counts.entry(label.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Current count, zero if never incremented
    pub fn get(&self, label: &str) -> u64 {
        self.lock().get(label).copied().unwrap_or(0)
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.lock().clone()
    }

    // Counters stay usable even if a holder panicked mid-update
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, u64>> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
