//! On-disk model artifact format
//!
//! ```json
//! {
//!   "name": "DiabetesClusterClassifier",
//!   "version": "3",
//!   "features": ["Pregnancies", "Glucose", ...],
//!   "scaler": { "mean": [...], "scale": [...] },
//!   "estimator": { "kind": "nearest_centroid", "centroids": [[...], ...] }
//! }
//! ```
//!
//! `scaler` is optional. Estimator kinds: `nearest_centroid`, `logistic`.

use serde::{Deserialize, Serialize};

use super::errors::{ModelError, ModelResult};

/// Serialized model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub version: String,
    /// Input columns in the order the estimator expects
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<StandardScaler>,
    pub estimator: EstimatorSpec,
}

/// Per-feature standardization: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Standardizes a row. A zero scale leaves the centred value as is.
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| if *s == 0.0 { x - m } else { (x - m) / s })
            .collect()
    }
}

/// Estimator parameters, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorSpec {
    /// Cluster assignment by closest centroid; labels only
    NearestCentroid { centroids: Vec<Vec<f64>> },
    /// Linear model; exposes class probabilities
    Logistic {
        weights: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
}

impl EstimatorSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            EstimatorSpec::NearestCentroid { .. } => "nearest_centroid",
            EstimatorSpec::Logistic { .. } => "logistic",
        }
    }
}

impl ModelArtifact {
    /// Parses artifact JSON. `source` names the document in errors.
    pub fn parse(content: &str, source: &str) -> ModelResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| ModelError::malformed(source, format!("Invalid JSON: {}", e)))
    }

    /// Checks every dimension agrees with `features`.
    pub fn validate_structure(&self) -> Result<(), String> {
        let n = self.features.len();
        if n == 0 {
            return Err("Artifact must list at least one feature".into());
        }

        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != n || scaler.scale.len() != n {
                return Err(format!(
                    "Scaler has {} means and {} scales for {} features",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    n
                ));
            }
        }

        match &self.estimator {
            EstimatorSpec::NearestCentroid { centroids } => {
                if centroids.is_empty() {
                    return Err("nearest_centroid needs at least one centroid".into());
                }
                if let Some(bad) = centroids.iter().position(|c| c.len() != n) {
                    return Err(format!("Centroid {} does not have {} coordinates", bad, n));
                }
            }
            EstimatorSpec::Logistic { weights, intercepts } => {
                if weights.is_empty() {
                    return Err("logistic needs at least one weight row".into());
                }
                if weights.len() == 2 {
                    return Err("logistic with two classes must use a single weight row".into());
                }
                if weights.len() != intercepts.len() {
                    return Err(format!(
                        "{} weight rows but {} intercepts",
                        weights.len(),
                        intercepts.len()
                    ));
                }
                if let Some(bad) = weights.iter().position(|w| w.len() != n) {
                    return Err(format!("Weight row {} does not have {} entries", bad, n));
                }
            }
        }

        Ok(())
    }
}
