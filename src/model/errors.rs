//! Model error types
//!
//! Error codes:
//! - DIAB_MODEL_NOT_FOUND
//! - DIAB_MODEL_MALFORMED
//! - DIAB_MODEL_INPUT_REJECTED
//! - DIAB_MODEL_INFERENCE_FAILED

use std::fmt;

/// Model-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelErrorCode {
    /// No artifact at any candidate location
    DiabModelNotFound,
    /// Artifact unreadable or inconsistent
    DiabModelMalformed,
    /// Frame does not fit the model's input contract
    DiabModelInputRejected,
    /// Prediction could not be computed
    DiabModelInferenceFailed,
}

impl ModelErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ModelErrorCode::DiabModelNotFound => "DIAB_MODEL_NOT_FOUND",
            ModelErrorCode::DiabModelMalformed => "DIAB_MODEL_MALFORMED",
            ModelErrorCode::DiabModelInputRejected => "DIAB_MODEL_INPUT_REJECTED",
            ModelErrorCode::DiabModelInferenceFailed => "DIAB_MODEL_INFERENCE_FAILED",
        }
    }
}

impl fmt::Display for ModelErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Model error
#[derive(Debug)]
pub struct ModelError {
    code: ModelErrorCode,
    message: String,
}

impl ModelError {
    pub fn new(code: ModelErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(location: impl Into<String>) -> Self {
        Self::new(
            ModelErrorCode::DiabModelNotFound,
            format!("Model artifact not found: {}", location.into()),
        )
    }

    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            ModelErrorCode::DiabModelMalformed,
            format!("Malformed model artifact '{}': {}", location.into(), reason.into()),
        )
    }

    pub fn input_rejected(reason: impl Into<String>) -> Self {
        Self::new(ModelErrorCode::DiabModelInputRejected, reason)
    }

    pub fn inference_failed(reason: impl Into<String>) -> Self {
        Self::new(ModelErrorCode::DiabModelInferenceFailed, reason)
    }

    pub fn code(&self) -> ModelErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ModelError {}

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;
