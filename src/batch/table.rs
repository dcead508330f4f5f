//! In-memory table of JSON records

use serde::Serialize;
use serde_json::{Map, Number, Value};

use super::errors::{BatchError, BatchResult};

/// One tabular input instance: field name -> value.
pub type Record = Map<String, Value>;

static NULL: Value = Value::Null;

/// Ordered collection of records with an ordered column list.
///
/// Columns are the union of record keys in first-seen order, unless given
/// explicitly (CSV header). A record without a key for some column holds
/// a null in that cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Batch {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Batch {
    /// Creates an empty batch with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty batch with a fixed column list.
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut batch = Self::new();
        for column in columns {
            batch.add_column(column.into());
        }
        batch
    }

    /// Builds a batch from records, deriving columns from their keys.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut batch = Self::new();
        for record in records {
            batch.push(record);
        }
        batch
    }

    /// Builds a one-row batch.
    pub fn from_record(record: Record) -> Self {
        Self::from_records(std::iter::once(record))
    }

    /// Builds a batch from a JSON object (one row) or an array of objects.
    pub fn from_json(value: &Value) -> BatchResult<Self> {
        match value {
            Value::Object(obj) => Ok(Self::from_record(obj.clone())),
            Value::Array(items) => {
                let mut batch = Self::new();
                for (i, item) in items.iter().enumerate() {
                    let obj = item.as_object().ok_or(BatchError::RowNotObject(i))?;
                    batch.push(obj.clone());
                }
                Ok(batch)
            }
            other => Err(BatchError::NotTabular(json_type_name(other))),
        }
    }

    fn add_column(&mut self, column: String) {
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
    }

    /// Appends a record, registering any new keys as columns.
    pub fn push(&mut self, record: Record) {
        for key in record.keys() {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(record);
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the batch declares the given column.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Rows in order.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a cell, reading absent keys as null.
    pub fn cell(&self, row: usize, column: &str) -> &Value {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL)
    }

    /// Iterates a column top to bottom, absent keys reading as null.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows.iter().map(move |r| r.get(column).unwrap_or(&NULL))
    }

    /// Non-null numeric values of a column.
    pub fn numeric_values(&self, column: &str) -> Vec<f64> {
        self.column_values(column).filter_map(Value::as_f64).collect()
    }

    /// Overwrites one cell. Out-of-range rows are ignored.
    pub fn set_cell(&mut self, row: usize, column: &str, value: Value) {
        if let Some(record) = self.rows.get_mut(row) {
            record.insert(column.to_string(), value);
        }
    }

    /// Removes a column from the batch and from every row.
    pub fn drop_column(&mut self, column: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| c != column);
        for row in &mut self.rows {
            row.remove(column);
        }
        self.columns.len() != before
    }

    /// Row values in column order, absent keys read as null.
    pub fn row_values(&self, row: usize) -> Vec<&Value> {
        self.columns.iter().map(|c| self.cell(row, c)).collect()
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }
}

/// Median of a non-empty slice. Returns `None` for an empty slice.
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Converts a finite float to a JSON number.
pub(crate) fn number(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

/// Returns the JSON type name for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
