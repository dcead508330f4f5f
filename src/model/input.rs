//! Model input contract
//!
//! Before a frame reaches the estimator it must:
//! - have exactly the expected number of feature columns
//! - hold only numeric (or null) values
//! - contain every expected column

use crate::batch::{json_type_name, Batch};
use crate::schema::DIABETES_FEATURES;

use super::errors::{ModelError, ModelResult};

/// Checks a feature frame against the shape the model was trained on.
#[derive(Debug, Clone)]
pub struct ModelInputValidator {
    expected_features: usize,
    expected_columns: Vec<String>,
}

impl Default for ModelInputValidator {
    fn default() -> Self {
        Self::new(DIABETES_FEATURES.iter().map(|s| s.to_string()).collect())
    }
}

impl ModelInputValidator {
    pub fn new(expected_columns: Vec<String>) -> Self {
        Self {
            expected_features: expected_columns.len(),
            expected_columns,
        }
    }

    pub fn expected_columns(&self) -> &[String] {
        &self.expected_columns
    }

    /// Fails unless the frame has exactly the expected feature count.
    pub fn validate_input_shape(&self, frame: &Batch) -> ModelResult<()> {
        let got = frame.columns().len();
        if got != self.expected_features {
            return Err(ModelError::input_rejected(format!(
                "Expected {} features, got {}",
                self.expected_features, got
            )));
        }
        Ok(())
    }

    /// Fails on the first column holding a non-numeric value.
    pub fn validate_input_types(&self, frame: &Batch) -> ModelResult<()> {
        for column in frame.columns() {
            if let Some(bad) = frame
                .column_values(column)
                .find(|v| !v.is_null() && !v.is_number())
            {
                return Err(ModelError::input_rejected(format!(
                    "Column {} must be numeric, found {}",
                    column,
                    json_type_name(bad)
                )));
            }
        }
        Ok(())
    }

    /// Fails naming every expected column absent from the frame.
    pub fn validate_input_columns(&self, frame: &Batch) -> ModelResult<()> {
        let missing: Vec<&str> = self
            .expected_columns
            .iter()
            .filter(|c| !frame.has_column(c))
            .map(String::as_str)
            .collect();

        if !missing.is_empty() {
            return Err(ModelError::input_rejected(format!(
                "Missing columns: {:?}",
                missing
            )));
        }
        Ok(())
    }

    /// Shape, then types, then columns.
    pub fn validate_model_input(&self, frame: &Batch) -> ModelResult<()> {
        self.validate_input_shape(frame)?;
        self.validate_input_types(frame)?;
        self.validate_input_columns(frame)
    }
}
