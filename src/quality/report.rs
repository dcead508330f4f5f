//! Data quality report over a raw dataset
//!
//! Findings:
//! - missing values (warning)
//! - duplicate rows (warning)
//! - fewer rows than the minimum (error)
//! - per numeric column, values beyond `Q1 - k*IQR` or `Q3 + k*IQR` (warning)

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::batch::Batch;

/// Limits applied by [`assess`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityThresholds {
    #[serde(default = "default_min_rows")]
    pub min_rows: usize,
    #[serde(default = "default_iqr_multiplier")]
    pub iqr_multiplier: f64,
}

fn default_min_rows() -> usize {
    100
}

fn default_iqr_multiplier() -> f64 {
    3.0
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_rows: default_min_rows(),
            iqr_multiplier: default_iqr_multiplier(),
        }
    }
}

/// Outlier count for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnOutliers {
    pub column: String,
    pub count: usize,
    pub lower_fence: f64,
    pub upper_fence: f64,
}

/// Outcome of a data quality assessment
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub rows: usize,
    pub columns: usize,
    pub missing_values: usize,
    pub duplicate_rows: usize,
    pub outliers: Vec<ColumnOutliers>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl QualityReport {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Assesses a batch against the thresholds.
pub fn assess(batch: &Batch, thresholds: &QualityThresholds) -> QualityReport {
    let rows = batch.len();
    let columns = batch.columns().len();
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    let missing_values = (0..rows)
        .flat_map(|row| batch.row_values(row))
        .filter(|v| v.is_null())
        .count();
    if missing_values > 0 {
        warnings.push(format!("{} missing values found", missing_values));
    }

    let duplicate_rows = count_duplicates(batch);
    if duplicate_rows > 0 {
        warnings.push(format!("{} duplicate rows found", duplicate_rows));
    }

    if rows < thresholds.min_rows {
        errors.push(format!(
            "Insufficient data: {} rows (min {})",
            rows, thresholds.min_rows
        ));
    }

    let mut outliers = Vec::new();
    for column in batch.columns() {
        if let Some(found) = column_outliers(batch, column, thresholds.iqr_multiplier) {
            if found.count > 0 {
                warnings.push(format!("{} outliers in {}", found.count, found.column));
                outliers.push(found);
            }
        }
    }

    QualityReport {
        rows,
        columns,
        missing_values,
        duplicate_rows,
        outliers,
        warnings,
        errors,
    }
}

/// Hashable cell for duplicate detection. Numbers compare by value, so
/// `1` and `1.0` are equal.
#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey {
    Null,
    Number(u64),
    Other(String),
}

impl CellKey {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => CellKey::Null,
            Value::Number(n) => match n.as_f64() {
                // -0.0 and 0.0 share a key
                Some(f) if f == 0.0 => CellKey::Number(0.0f64.to_bits()),
                Some(f) => CellKey::Number(f.to_bits()),
                None => CellKey::Other(n.to_string()),
            },
            other => CellKey::Other(other.to_string()),
        }
    }
}

/// Rows equal to an earlier row across every column.
fn count_duplicates(batch: &Batch) -> usize {
    let mut seen = HashSet::new();
    (0..batch.len())
        .filter(|&row| {
            let key: Vec<CellKey> = batch.row_values(row).into_iter().map(CellKey::of).collect();
            !seen.insert(key)
        })
        .count()
}

/// Outliers of a numeric column; `None` for non-numeric or all-null columns.
fn column_outliers(batch: &Batch, column: &str, k: f64) -> Option<ColumnOutliers> {
    let values: Vec<&Value> = batch.column_values(column).filter(|v| !v.is_null()).collect();
    if values.is_empty() || !values.iter().all(|v| v.is_number()) {
        return None;
    }

    let mut numbers: Vec<f64> = values.iter().filter_map(|v| v.as_f64()).collect();
    numbers.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile(&numbers, 0.25);
    let q3 = quantile(&numbers, 0.75);
    let iqr = q3 - q1;
    let lower_fence = q1 - k * iqr;
    let upper_fence = q3 + k * iqr;

    let count = numbers
        .iter()
        .filter(|&&x| x < lower_fence || x > upper_fence)
        .count();

    Some(ColumnOutliers {
        column: column.to_string(),
        count,
        lower_fence,
        upper_fence,
    })
}

/// Linear-interpolated quantile of sorted, non-empty data.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
