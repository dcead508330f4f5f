//! Observability subsystem
//!
//! - Structured logging (JSON lines, typed events)
//! - Atomic counters exposed over HTTP
//!
//! HTTP request spans are handled separately by `tower-http`'s trace
//! layer through `tracing`.
//!
//! # Usage
//!
//! ```ignore
//! use diabetes_serve::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::ModelLoaded, &[("stage", "Production")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_predictions_served();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Severity an event is logged at
fn severity_of(event: Event) -> Severity {
    if event.is_failure() {
        Severity::Error
    } else if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a typed event
pub fn log_event(event: Event) {
    Logger::log(severity_of(event), event.as_str(), &[]);
}

/// Log a typed event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_of(event), event.as_str(), fields);
}
