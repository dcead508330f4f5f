//! Estimators behind a loaded model
//!
//! Two capabilities exist: every estimator assigns a label; some also
//! return class probabilities. Which one a model has is fixed when its
//! artifact is loaded.

/// Assigns a class label to one scaled feature row.
pub trait Classifier: Send + Sync {
    /// Number of input features.
    fn n_features(&self) -> usize;

    /// Predicted class index.
    fn predict(&self, row: &[f64]) -> usize;
}

/// A classifier that also yields per-class probabilities.
pub trait ProbabilisticClassifier: Classifier {
    /// Probabilities per class, summing to 1.
    fn predict_proba(&self, row: &[f64]) -> Vec<f64>;
}

/// Assigns the index of the closest centroid (k-means style clusters).
#[derive(Debug, Clone)]
pub struct NearestCentroid {
    centroids: Vec<Vec<f64>>,
}

impl NearestCentroid {
    pub fn new(centroids: Vec<Vec<f64>>) -> Self {
        Self { centroids }
    }
}

impl Classifier for NearestCentroid {
    fn n_features(&self) -> usize {
        self.centroids.first().map_or(0, Vec::len)
    }

    fn predict(&self, row: &[f64]) -> usize {
        self.centroids
            .iter()
            .map(|c| squared_distance(c, row))
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map_or(0, |(i, _)| i)
    }
}

/// Linear model with logistic (binary) or softmax (multiclass) output.
///
/// One weight row means binary classification where the row scores the
/// positive class.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

impl LogisticRegression {
    pub fn new(weights: Vec<Vec<f64>>, intercepts: Vec<f64>) -> Self {
        Self { weights, intercepts }
    }

    fn decision(&self, row: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| w.iter().zip(row).map(|(wi, xi)| wi * xi).sum::<f64>() + b)
            .collect()
    }
}

impl Classifier for LogisticRegression {
    fn n_features(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn predict(&self, row: &[f64]) -> usize {
        argmax(&self.predict_proba(row))
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        let scores = self.decision(row);
        if scores.len() == 1 {
            let p = sigmoid(scores[0]);
            return vec![1.0 - p, p];
        }

        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        exps.into_iter().map(|e| e / total).collect()
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// First index of the largest value; ties resolve to the lower class.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_centroid_picks_closest() {
        let model = NearestCentroid::new(vec![vec![0.0, 0.0], vec![10.0, 10.0]]);
        assert_eq!(model.predict(&[1.0, 2.0]), 0);
        assert_eq!(model.predict(&[9.0, 8.0]), 1);
        assert_eq!(model.n_features(), 2);
    }

    #[test]
    fn test_binary_logistic_probabilities() {
        let model = LogisticRegression::new(vec![vec![1.0]], vec![0.0]);

        let p = model.predict_proba(&[0.0]);
        assert!((p[0] - 0.5).abs() < 1e-12);
        assert!((p[1] - 0.5).abs() < 1e-12);
        // Tie goes to class 0
        assert_eq!(model.predict(&[0.0]), 0);

        assert_eq!(model.predict(&[3.0]), 1);
        assert_eq!(model.predict(&[-3.0]), 0);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let model = LogisticRegression::new(
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, -1.0]],
            vec![0.0, 0.5, 0.0],
        );
        let p = model.predict_proba(&[0.2, 2.0]);
        assert_eq!(p.len(), 3);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert_eq!(model.predict(&[0.2, 2.0]), 1);
    }
}
