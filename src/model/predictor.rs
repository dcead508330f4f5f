//! Loaded, immutable model

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::batch::{json_type_name, Record};

use super::artifact::{EstimatorSpec, ModelArtifact, StandardScaler};
use super::classifier::{Classifier, LogisticRegression, NearestCentroid, ProbabilisticClassifier};
use super::errors::{ModelError, ModelResult};

/// Estimator with its capability resolved at load time.
pub enum Estimator {
    Probabilistic(Box<dyn ProbabilisticClassifier>),
    LabelsOnly(Box<dyn Classifier>),
}

impl Estimator {
    fn n_features(&self) -> usize {
        match self {
            Estimator::Probabilistic(c) => c.n_features(),
            Estimator::LabelsOnly(c) => c.n_features(),
        }
    }
}

impl From<EstimatorSpec> for Estimator {
    fn from(estimator: EstimatorSpec) -> Self {
        match estimator {
            EstimatorSpec::NearestCentroid { centroids } => {
                Estimator::LabelsOnly(Box::new(NearestCentroid::new(centroids)))
            }
            EstimatorSpec::Logistic { weights, intercepts } => {
                Estimator::Probabilistic(Box::new(LogisticRegression::new(weights, intercepts)))
            }
        }
    }
}

/// Output of one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: usize,
    /// Present only when the estimator exposes probabilities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<Vec<f64>>,
}

/// Descriptive metadata reported by the service
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub stage: String,
    pub estimator: &'static str,
    pub supports_probabilities: bool,
    pub features: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

/// A model ready for inference. Shared read-only across requests.
pub struct Model {
    info: ModelInfo,
    scaler: Option<StandardScaler>,
    estimator: Estimator,
}

impl Model {
    /// Builds a model from a structurally valid artifact.
    pub fn from_artifact(artifact: ModelArtifact, stage: impl Into<String>) -> ModelResult<Self> {
        artifact
            .validate_structure()
            .map_err(|e| ModelError::malformed(&artifact.name, e))?;

        let kind = artifact.estimator.kind();
        let estimator = Estimator::from(artifact.estimator);

        Ok(Self {
            info: ModelInfo {
                name: artifact.name,
                version: artifact.version,
                stage: stage.into(),
                estimator: kind,
                supports_probabilities: matches!(estimator, Estimator::Probabilistic(_)),
                features: artifact.features,
                loaded_at: Utc::now(),
            },
            scaler: artifact.scaler,
            estimator,
        })
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    pub fn features(&self) -> &[String] {
        &self.info.features
    }

    pub fn supports_probabilities(&self) -> bool {
        self.info.supports_probabilities
    }

    /// Extracts the feature row of a record in model column order.
    pub fn feature_row(&self, record: &Record) -> ModelResult<Vec<f64>> {
        self.info
            .features
            .iter()
            .map(|name| match record.get(name) {
                Some(v) => v.as_f64().ok_or_else(|| {
                    ModelError::inference_failed(format!(
                        "Feature '{}' must be numeric, got {}",
                        name,
                        json_type_name(v)
                    ))
                }),
                None => Err(ModelError::inference_failed(format!(
                    "Feature '{}' missing from input",
                    name
                ))),
            })
            .collect()
    }

    /// Predicts a record.
    pub fn predict(&self, record: &Record) -> ModelResult<Prediction> {
        let row = self.feature_row(record)?;
        self.predict_row(&row)
    }

    /// Predicts a raw feature row in model column order.
    pub fn predict_row(&self, row: &[f64]) -> ModelResult<Prediction> {
        if row.len() != self.estimator.n_features() {
            return Err(ModelError::inference_failed(format!(
                "Expected {} features, got {}",
                self.estimator.n_features(),
                row.len()
            )));
        }

        let scaled = match &self.scaler {
            Some(scaler) => scaler.transform(row),
            None => row.to_vec(),
        };

        let prediction = match &self.estimator {
            Estimator::Probabilistic(c) => Prediction {
                label: c.predict(&scaled),
                probabilities: Some(c.predict_proba(&scaled)),
            },
            Estimator::LabelsOnly(c) => Prediction {
                label: c.predict(&scaled),
                probabilities: None,
            },
        };
        Ok(prediction)
    }

    /// Probability of class 1 for ranking metrics, if available.
    pub fn positive_score(prediction: &Prediction) -> Option<f64> {
        prediction
            .probabilities
            .as_ref()
            .and_then(|p| p.get(1).copied())
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model").field("info", &self.info).finish()
    }
}
