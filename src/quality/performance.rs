//! Binary classification metrics and the deployment gate
//!
//! Label `1` is the positive class. A metric whose denominator is zero
//! evaluates to `0.0`. ROC AUC is skipped when the model gives no
//! positive-class scores. With scores but a single class in the labels
//! it is undefined, and the gate fails.

use serde::{Deserialize, Serialize};

/// Minimum values a model must reach to be deployed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceThresholds {
    pub min_accuracy: f64,
    pub min_precision: f64,
    pub min_recall: f64,
    pub min_f1: f64,
    pub min_roc_auc: f64,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            min_accuracy: 0.70,
            min_precision: 0.65,
            min_recall: 0.65,
            min_f1: 0.65,
            min_roc_auc: 0.70,
        }
    }
}

/// ROC AUC outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RocAuc {
    /// No positive-class scores
    Skipped,
    /// Scores present but the labels hold a single class
    Undefined,
    Value(f64),
}

impl RocAuc {
    pub fn value(&self) -> Option<f64> {
        match self {
            RocAuc::Value(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub samples: usize,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub roc_auc: RocAuc,
}

impl PerformanceMetrics {
    /// Computes metrics from true labels, predicted labels and optional
    /// positive-class scores. Slices must have equal length.
    pub fn compute(y_true: &[usize], y_pred: &[usize], scores: Option<&[f64]>) -> Self {
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        let mut correct = 0usize;

        for (&t, &p) in y_true.iter().zip(y_pred) {
            if t == p {
                correct += 1;
            }
            match (t == 1, p == 1) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        Self {
            samples: y_true.len(),
            accuracy: ratio(correct, y_true.len()),
            precision,
            recall,
            f1,
            roc_auc: match scores {
                None => RocAuc::Skipped,
                Some(s) => roc_auc(y_true, s).map_or(RocAuc::Undefined, RocAuc::Value),
            },
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Area under the ROC curve via the rank-sum statistic, ties averaged.
pub fn roc_auc(y_true: &[usize], scores: &[f64]) -> Option<f64> {
    let n = y_true.len().min(scores.len());
    let positives = y_true[..n].iter().filter(|&&t| t == 1).count();
    let negatives = n - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // Average 1-based ranks over runs of tied scores
    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg;
        }
        i = j + 1;
    }

    let rank_sum: f64 = (0..n).filter(|&k| y_true[k] == 1).map(|k| ranks[k]).sum();
    let p = positives as f64;
    let u = rank_sum - p * (p + 1.0) / 2.0;
    Some(u / (p * negatives as f64))
}

/// Gate outcome: metrics plus one message per threshold missed
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub metrics: PerformanceMetrics,
    pub failures: Vec<String>,
    pub roc_auc_skipped: bool,
}

impl PerformanceReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compares metrics against thresholds.
pub fn gate(metrics: PerformanceMetrics, thresholds: &PerformanceThresholds) -> PerformanceReport {
    let mut failures = Vec::new();

    check(&mut failures, "Accuracy", metrics.accuracy, thresholds.min_accuracy);
    check(&mut failures, "Precision", metrics.precision, thresholds.min_precision);
    check(&mut failures, "Recall", metrics.recall, thresholds.min_recall);
    check(&mut failures, "F1", metrics.f1, thresholds.min_f1);
    match metrics.roc_auc {
        RocAuc::Value(auc) => check(&mut failures, "ROC AUC", auc, thresholds.min_roc_auc),
        RocAuc::Undefined => failures.push("ROC AUC undefined: only one class present".into()),
        RocAuc::Skipped => {}
    }

    PerformanceReport {
        roc_auc_skipped: metrics.roc_auc == RocAuc::Skipped,
        metrics,
        failures,
    }
}

fn check(failures: &mut Vec<String>, name: &str, value: f64, min: f64) {
    if value < min {
        failures.push(format!("{} {:.4} < {}", name, value, min));
    }
}
