//! Shared handler state
//!
//! Built once before the server binds and handed to every router. The
//! model is resolved at startup; handlers never load or swap it.

use std::sync::Arc;

use crate::model::Model;
use crate::observability::MetricsRegistry;
use crate::schema::RecordValidator;

/// Immutable dependencies of the HTTP handlers
#[derive(Debug)]
pub struct AppState {
    model: Option<Arc<Model>>,
    validator: RecordValidator,
    metrics: Arc<MetricsRegistry>,
    fill_missing: bool,
}

impl AppState {
    /// State with a fresh metrics registry and nulls rejected.
    pub fn new(validator: RecordValidator, model: Option<Model>) -> Self {
        Self {
            model: model.map(Arc::new),
            validator,
            metrics: Arc::new(MetricsRegistry::new()),
            fill_missing: false,
        }
    }

    /// Shares an existing metrics registry.
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Median-fill nulls in batch predictions instead of rejecting them.
    pub fn with_fill_missing(mut self, fill_missing: bool) -> Self {
        self.fill_missing = fill_missing;
        self
    }

    pub fn model(&self) -> Option<&Arc<Model>> {
        self.model.as_ref()
    }

    pub fn validator(&self) -> &RecordValidator {
        &self.validator
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn fill_missing(&self) -> bool {
        self.fill_missing
    }
}
