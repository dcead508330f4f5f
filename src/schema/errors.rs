//! Schema error types
//!
//! Error codes:
//! - DIAB_SCHEMA_VALIDATION_FAILED (REJECT)
//! - DIAB_SCHEMA_MALFORMED (FATAL)
//!
//! A validation failure carries the violations of the first check that
//! failed. Rules: `missing_column`, `wrong_type`, `null_value`,
//! `out_of_range`.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Input rejected
    Reject,
    /// Process cannot start (bad schema file)
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Batch violates schema
    DiabSchemaValidationFailed,
    /// Schema file unreadable or structurally invalid
    DiabSchemaMalformed,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::DiabSchemaValidationFailed => "DIAB_SCHEMA_VALIDATION_FAILED",
            SchemaErrorCode::DiabSchemaMalformed => "DIAB_SCHEMA_MALFORMED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::DiabSchemaValidationFailed => Severity::Reject,
            SchemaErrorCode::DiabSchemaMalformed => Severity::Fatal,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The rule a violation broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationRule {
    MissingColumn,
    WrongType,
    NullValue,
    OutOfRange,
}

impl ViolationRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationRule::MissingColumn => "missing_column",
            ViolationRule::WrongType => "wrong_type",
            ViolationRule::NullValue => "null_value",
            ViolationRule::OutOfRange => "out_of_range",
        }
    }
}

impl fmt::Display for ViolationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Schema field the check applied to
    pub field: String,
    /// Rule that failed
    pub rule: ViolationRule,
    /// Offending value, if the violation concerns a cell
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Zero-based row index, if the violation concerns a cell
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// What the check expected
    pub expected: String,
}

impl Violation {
    pub fn missing_column(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: ViolationRule::MissingColumn,
            value: None,
            row: None,
            expected: "column to be present".into(),
        }
    }

    pub fn wrong_type(field: impl Into<String>, row: usize, value: Value, expected: &str) -> Self {
        Self {
            field: field.into(),
            rule: ViolationRule::WrongType,
            value: Some(value),
            row: Some(row),
            expected: expected.into(),
        }
    }

    pub fn null_value(field: impl Into<String>, row: usize) -> Self {
        Self {
            field: field.into(),
            rule: ViolationRule::NullValue,
            value: None,
            row: Some(row),
            expected: "non-null value".into(),
        }
    }

    pub fn out_of_range(field: impl Into<String>, row: usize, value: Value, range: String) -> Self {
        Self {
            field: field.into(),
            rule: ViolationRule::OutOfRange,
            value: Some(value),
            row: Some(row),
            expected: format!("value within {}", range),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on '{}'", self.rule, self.field)?;
        if let Some(row) = self.row {
            write!(f, " (row {})", row)?;
        }
        write!(f, ": expected {}", self.expected)?;
        if let Some(ref value) = self.value {
            write!(f, ", got {}", value)?;
        }
        Ok(())
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    schema_id: Option<String>,
    violations: Vec<Violation>,
}

impl SchemaError {
    /// Create a validation failed error from a non-empty violation list
    pub fn validation_failed(schema_id: impl Into<String>, violations: Vec<Violation>) -> Self {
        let message = match violations.first() {
            Some(first) if violations.len() == 1 => format!("Batch validation failed: {}", first),
            Some(first) => format!(
                "Batch validation failed: {} (and {} more)",
                first,
                violations.len() - 1
            ),
            None => "Batch validation failed".to_string(),
        };
        Self {
            code: SchemaErrorCode::DiabSchemaValidationFailed,
            message,
            schema_id: Some(schema_id.into()),
            violations,
        }
    }

    /// Create an error for a malformed schema file
    pub fn malformed_schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::DiabSchemaMalformed,
            message: format!("Malformed schema '{}': {}", path.into(), reason.into()),
            schema_id: None,
            violations: Vec::new(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the schema ID if applicable
    pub fn schema_id(&self) -> Option<&str> {
        self.schema_id.as_deref()
    }

    /// Violations of the failing check, empty for non-validation errors
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes the error, returning its violations
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Rule of the failing check, if this is a validation failure
    pub fn rule(&self) -> Option<ViolationRule> {
        self.violations.first().map(|v| v.rule)
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SchemaErrorCode::DiabSchemaValidationFailed.code(),
            "DIAB_SCHEMA_VALIDATION_FAILED"
        );
        assert_eq!(SchemaErrorCode::DiabSchemaMalformed.code(), "DIAB_SCHEMA_MALFORMED");
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(SchemaErrorCode::DiabSchemaValidationFailed.severity(), Severity::Reject);
        assert_eq!(SchemaErrorCode::DiabSchemaMalformed.severity(), Severity::Fatal);
    }

    #[test]
    fn test_violation_serializes_rule_in_snake_case() {
        let v = Violation::out_of_range("Age", 0, json!(150), "[0, 120]".into());
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["rule"], "out_of_range");
        assert_eq!(json["field"], "Age");
        assert_eq!(json["value"], 150);
        assert_eq!(json["row"], 0);
    }

    #[test]
    fn test_missing_column_omits_value_and_row() {
        let json = serde_json::to_value(Violation::missing_column("Glucose")).unwrap();
        assert!(json.get("value").is_none());
        assert!(json.get("row").is_none());
    }

    #[test]
    fn test_validation_error_message_counts_extra_violations() {
        let err = SchemaError::validation_failed(
            "diabetes",
            vec![
                Violation::missing_column("Glucose"),
                Violation::missing_column("BMI"),
            ],
        );
        assert!(err.message().contains("Glucose"));
        assert!(err.message().contains("1 more"));
        assert_eq!(err.rule(), Some(ViolationRule::MissingColumn));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_display_includes_code() {
        let err = SchemaError::malformed_schema("schema.json", "Invalid JSON");
        let display = format!("{}", err);
        assert!(display.contains("FATAL"));
        assert!(display.contains("DIAB_SCHEMA_MALFORMED"));
        assert!(err.is_fatal());
    }
}
