//! Schema subsystem: input validation for tabular records
//!
//! A schema names the required fields, their numeric type and their
//! inclusive range. The [`RecordValidator`] applies it to batches.
//!
//! # Rules
//!
//! - Missing schema fields are rejected (`missing_column`)
//! - Non-numeric values are rejected, no coercion (`wrong_type`)
//! - Nulls are rejected or median-filled (`null_value`)
//! - Values outside `[min, max]` are rejected (`out_of_range`)
//! - Extra columns are ignored
//! - Deterministic validation

mod errors;
mod loader;
mod types;
mod validator;

pub use errors::{Severity, SchemaError, SchemaErrorCode, SchemaResult, Violation, ViolationRule};
pub use loader::SchemaLoader;
pub use types::{FieldDef, FieldType, Schema, DIABETES_FEATURES};
pub use validator::RecordValidator;
