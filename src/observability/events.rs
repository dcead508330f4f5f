//! Observable events
//!
//! Events are explicit and typed. Each maps to one stable string used as
//! the `event` key of a log line.

use std::fmt;

/// Observable events of the service and the offline gates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Schema resolved for the validator
    SchemaLoaded,
    /// HTTP server bound and serving
    ServeStart,
    /// HTTP server stopped
    ServeStop,

    // Model
    /// Model artifact loaded
    ModelLoaded,
    /// Requested stage unusable, trying fallback stage
    ModelFallback,
    /// No artifact could be loaded; predictions answer 503
    ModelUnavailable,

    // Serving
    /// Prediction returned
    PredictionServed,
    /// Request failed validation
    PredictionRejected,
    /// Inference raised an error
    PredictionFailed,

    // Offline gates
    /// Batch passed validation
    BatchValidated,
    /// Batch failed validation
    BatchRejected,
    /// Data quality report produced
    QualityReport,
    /// Performance gate evaluated
    PerformanceGate,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::ServeStart => "SERVE_START",
            Event::ServeStop => "SERVE_STOP",
            Event::ModelLoaded => "MODEL_LOADED",
            Event::ModelFallback => "MODEL_FALLBACK",
            Event::ModelUnavailable => "MODEL_UNAVAILABLE",
            Event::PredictionServed => "PREDICTION_SERVED",
            Event::PredictionRejected => "PREDICTION_REJECTED",
            Event::PredictionFailed => "PREDICTION_FAILED",
            Event::BatchValidated => "BATCH_VALIDATED",
            Event::BatchRejected => "BATCH_REJECTED",
            Event::QualityReport => "QUALITY_REPORT",
            Event::PerformanceGate => "PERFORMANCE_GATE",
        }
    }

    /// Events that denote a failure of the operation they describe
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::ModelUnavailable | Event::PredictionFailed | Event::BatchRejected
        )
    }

    /// Events that describe something the caller can recover from
    pub fn is_warning(&self) -> bool {
        matches!(self, Event::ModelFallback | Event::PredictionRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
