//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start
//! - Lock-free (atomics, Relaxed ordering)

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters shared by the HTTP handlers and the offline gates
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    predictions_served: AtomicU64,
    predictions_failed: AtomicU64,
    requests_rejected: AtomicU64,
    model_unavailable: AtomicU64,
    batches_validated: AtomicU64,
    batches_rejected: AtomicU64,
    violations_reported: AtomicU64,
    values_filled: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_predictions_served(&self) {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_predictions_failed(&self) {
        self.predictions_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// A request was rejected by validation; `violations` is its violation count
    pub fn record_rejection(&self, violations: usize) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
        self.violations_reported
            .fetch_add(violations as u64, Ordering::Relaxed);
    }

    pub fn increment_model_unavailable(&self) {
        self.model_unavailable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_batches_validated(&self) {
        self.batches_validated.fetch_add(1, Ordering::Relaxed);
    }

    /// A batch failed validation with `violations` violations
    pub fn record_batch_rejection(&self, violations: usize) {
        self.batches_rejected.fetch_add(1, Ordering::Relaxed);
        self.violations_reported
            .fetch_add(violations as u64, Ordering::Relaxed);
    }

    pub fn add_values_filled(&self, count: u64) {
        self.values_filled.fetch_add(count, Ordering::Relaxed);
    }

    /// Get all metrics as a point-in-time snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            predictions_served: self.predictions_served.load(Ordering::Relaxed),
            predictions_failed: self.predictions_failed.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
            model_unavailable: self.model_unavailable.load(Ordering::Relaxed),
            batches_validated: self.batches_validated.load(Ordering::Relaxed),
            batches_rejected: self.batches_rejected.load(Ordering::Relaxed),
            violations_reported: self.violations_reported.load(Ordering::Relaxed),
            values_filled: self.values_filled.load(Ordering::Relaxed),
        }
    }

    /// Current values as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or_default()
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub predictions_served: u64,
    pub predictions_failed: u64,
    pub requests_rejected: u64,
    pub model_unavailable: u64,
    pub batches_validated: u64,
    pub batches_rejected: u64,
    pub violations_reported: u64,
    pub values_filled: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_zero() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.predictions_served, 0);
        assert_eq!(snapshot.requests_rejected, 0);
        assert_eq!(snapshot.violations_reported, 0);
    }

    #[test]
    fn test_rejections_accumulate_violations() {
        let registry = MetricsRegistry::new();
        registry.record_rejection(2);
        registry.record_batch_rejection(3);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.requests_rejected, 1);
        assert_eq!(snapshot.batches_rejected, 1);
        assert_eq!(snapshot.violations_reported, 5);
    }

    #[test]
    fn test_to_json() {
        let registry = MetricsRegistry::new();
        registry.increment_predictions_served();
        registry.add_values_filled(4);

        let json = registry.to_json();
        assert_eq!(json["predictions_served"], 1);
        assert_eq!(json["values_filled"], 4);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..250 {
                        reg.increment_predictions_served();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().predictions_served, 2000);
    }
}
