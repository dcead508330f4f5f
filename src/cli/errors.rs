//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit.

use std::fmt;
use std::io;

use crate::batch::BatchError;
use crate::model::ModelError;
use crate::schema::SchemaError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// Input file unreadable or not tabular
    DataError,
    /// A file failed record or model-input validation
    ValidationFailed,
    /// Data quality report has errors
    QualityFailed,
    /// No model artifact could be loaded
    ModelUnavailable,
    /// Model missed a performance threshold
    GateFailed,
    /// Server could not start
    BootFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "DIAB_CLI_CONFIG_ERROR",
            Self::IoError => "DIAB_CLI_IO_ERROR",
            Self::DataError => "DIAB_CLI_DATA_ERROR",
            Self::ValidationFailed => "DIAB_CLI_VALIDATION_FAILED",
            Self::QualityFailed => "DIAB_CLI_QUALITY_FAILED",
            Self::ModelUnavailable => "DIAB_CLI_MODEL_UNAVAILABLE",
            Self::GateFailed => "DIAB_CLI_GATE_FAILED",
            Self::BootFailed => "DIAB_CLI_BOOT_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn data_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::DataError, msg)
    }

    pub fn validation_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ValidationFailed, msg)
    }

    pub fn quality_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::QualityFailed, msg)
    }

    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ModelUnavailable, msg)
    }

    pub fn gate_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::GateFailed, msg)
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<BatchError> for CliError {
    fn from(e: BatchError) -> Self {
        Self::data_error(e.to_string())
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        if e.is_fatal() {
            Self::config_error(e.to_string())
        } else {
            Self::validation_failed(e.message())
        }
    }
}

impl From<ModelError> for CliError {
    fn from(e: ModelError) -> Self {
        Self::model_unavailable(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Violation;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::gate_failed("Recall 0.5000 < 0.65");
        assert_eq!(err.to_string(), "DIAB_CLI_GATE_FAILED: Recall 0.5000 < 0.65");
    }

    #[test]
    fn test_schema_errors_map_by_severity() {
        let rejected = SchemaError::validation_failed("diabetes", vec![Violation::missing_column("Age")]);
        assert_eq!(CliError::from(rejected).code(), &CliErrorCode::ValidationFailed);

        let malformed = SchemaError::malformed_schema("schema.json", "no fields");
        assert_eq!(CliError::from(malformed).code(), &CliErrorCode::ConfigError);
    }
}
