//! Record validator: applies a fixed schema to batches
//!
//! Checks run in a fixed order and stop at the first failing check:
//! 1. columns: every schema field is a batch column
//! 2. types: every non-null cell of a schema field is numeric
//! 3. missing: nulls are rejected, or filled with the column median
//! 4. ranges: every cell lies within its field's `[min, max]`
//!
//! Within one check every offending column or cell is reported.
//! Columns outside the schema are ignored and passed through untouched.
//! The validator holds no mutable state and performs no I/O.

use serde_json::Value;

use crate::batch::{median, number, Batch, Record};

use super::errors::{SchemaError, SchemaResult, Violation};
use super::types::{FieldDef, Schema};

/// Validator bound to one immutable schema.
///
/// Fill values for the missing-value policy are computed from the batch
/// under validation and never cached between calls.
#[derive(Debug, Clone)]
pub struct RecordValidator {
    schema: Schema,
}

impl RecordValidator {
    /// Creates a validator, rejecting structurally invalid schemas.
    pub fn new(schema: Schema) -> SchemaResult<Self> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(schema.schema_id.clone(), e))?;
        Ok(Self { schema })
    }

    /// Validator for the built-in diabetes feature schema.
    pub fn diabetes() -> Self {
        Self {
            schema: Schema::diabetes(),
        }
    }

    /// The schema this validator enforces.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Fails with `missing_column` naming every schema field absent from
    /// the batch's columns.
    pub fn validate_columns(&self, batch: &Batch) -> SchemaResult<()> {
        let violations: Vec<Violation> = self
            .schema
            .field_names()
            .filter(|name| !batch.has_column(name))
            .map(Violation::missing_column)
            .collect();

        self.finish(violations)
    }

    /// Fails with `wrong_type` for every non-null cell of a schema field
    /// that is not representable as the field's numeric type.
    pub fn validate_types(&self, batch: &Batch) -> SchemaResult<()> {
        let mut violations = Vec::new();

        for field in self.present_fields(batch) {
            for (row, value) in batch.column_values(&field.name).enumerate() {
                if !value.is_null() && !field.field_type.accepts(value) {
                    violations.push(Violation::wrong_type(
                        &field.name,
                        row,
                        value.clone(),
                        field.field_type.type_name(),
                    ));
                }
            }
        }

        self.finish(violations)
    }

    /// Applies the missing-value policy.
    ///
    /// Without `fill_missing`, every null in a schema field is a
    /// `null_value` violation. With it, each null is replaced by the
    /// median of the non-null values of its column, and the completed
    /// batch is returned. A column with no non-null value cannot be
    /// filled and its nulls are reported.
    pub fn validate_missing(&self, mut batch: Batch, fill_missing: bool) -> SchemaResult<Batch> {
        let mut violations = Vec::new();
        let mut fills: Vec<(usize, String, Value)> = Vec::new();

        for field in self.present_fields(&batch) {
            let null_rows: Vec<usize> = batch
                .column_values(&field.name)
                .enumerate()
                .filter(|(_, v)| v.is_null())
                .map(|(row, _)| row)
                .collect();

            if null_rows.is_empty() {
                continue;
            }

            let fill = if fill_missing {
                median(&batch.numeric_values(&field.name)).map(number)
            } else {
                None
            };

            match fill {
                Some(value) => fills.extend(
                    null_rows
                        .into_iter()
                        .map(|row| (row, field.name.clone(), value.clone())),
                ),
                None => {
                    violations.extend(
                        null_rows
                            .into_iter()
                            .map(|row| Violation::null_value(&field.name, row)),
                    );
                }
            }
        }

        self.finish(violations)?;

        for (row, column, value) in fills {
            batch.set_cell(row, &column, value);
        }
        Ok(batch)
    }

    /// Fails with `out_of_range` for every cell outside its field's
    /// inclusive range.
    pub fn validate_ranges(&self, batch: &Batch) -> SchemaResult<()> {
        let mut violations = Vec::new();

        for field in self.present_fields(batch) {
            for (row, value) in batch.column_values(&field.name).enumerate() {
                if let Some(v) = value.as_f64() {
                    if !field.in_range(v) {
                        violations.push(Violation::out_of_range(
                            &field.name,
                            row,
                            value.clone(),
                            field.range_label(),
                        ));
                    }
                }
            }
        }

        self.finish(violations)
    }

    /// Runs columns -> types -> missing -> ranges, stopping at the first
    /// failing check. Returns the (possibly completed) batch.
    pub fn validate(&self, batch: Batch, fill_missing: bool) -> SchemaResult<Batch> {
        self.validate_columns(&batch)?;
        self.validate_types(&batch)?;
        let batch = self.validate_missing(batch, fill_missing)?;
        self.validate_ranges(&batch)?;
        Ok(batch)
    }

    /// Validates a single record as a one-row batch.
    ///
    /// With `fill_missing` a lone null has no other values to take a
    /// median from, so it is always reported.
    pub fn validate_record(&self, record: Record, fill_missing: bool) -> SchemaResult<Record> {
        let batch = self.validate(Batch::from_record(record), fill_missing)?;
        Ok(batch.into_rows().into_iter().next().unwrap_or_default())
    }

    fn present_fields<'a>(
        &'a self,
        batch: &'a Batch,
    ) -> impl Iterator<Item = &'a FieldDef> + 'a {
        self.schema
            .fields
            .iter()
            .filter(move |f| batch.has_column(&f.name))
    }

    fn finish(&self, violations: Vec<Violation>) -> SchemaResult<()> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::validation_failed(&self.schema.schema_id, violations))
        }
    }
}
