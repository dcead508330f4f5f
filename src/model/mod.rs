//! Model subsystem: artifacts, estimators and inference
//!
//! A model is read once from a JSON artifact and never mutated. Its
//! probability capability is decided at load time by the estimator
//! kind, so callers match on [`Estimator`] or read
//! [`Prediction::probabilities`] instead of probing at request time.

mod artifact;
mod classifier;
mod errors;
mod input;
mod loader;
mod predictor;

pub use artifact::{EstimatorSpec, ModelArtifact, StandardScaler};
pub use classifier::{Classifier, LogisticRegression, NearestCentroid, ProbabilisticClassifier};
pub use errors::{ModelError, ModelErrorCode, ModelResult};
pub use input::ModelInputValidator;
pub use loader::{ModelLoader, FALLBACK_STAGE};
pub use predictor::{Estimator, Model, ModelInfo, Prediction};
