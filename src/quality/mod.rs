//! Pre-deployment gates
//!
//! - Data quality: missing values, duplicates, row count, outliers
//! - Model performance: accuracy, precision, recall, F1, ROC AUC

mod performance;
mod report;

pub use performance::{
    gate, roc_auc, PerformanceMetrics, PerformanceReport, PerformanceThresholds, RocAuc,
};
pub use report::{assess, ColumnOutliers, QualityReport, QualityThresholds};
