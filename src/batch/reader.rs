//! CSV input for offline validation
//!
//! The header row names the columns. Each cell is parsed as:
//! - empty, `NA`, `NaN`, `null` -> null
//! - integer literal -> int
//! - finite float literal -> float
//! - anything else, including `inf` and overflowing literals such as
//!   `1e999` -> string (left for the type check to reject)

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::{Number, Value};

use super::errors::{BatchError, BatchResult};
use super::table::{Batch, Record};

const NULL_TOKENS: [&str; 6] = ["", "NA", "N/A", "NaN", "nan", "null"];

/// Reads a CSV file with a header row into a batch.
pub fn read_csv(path: &Path) -> BatchResult<Batch> {
    let file = File::open(path).map_err(|e| BatchError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    read_csv_from(file, &path.display().to_string())
}

/// Reads CSV from any reader. `label` names the source in errors.
pub fn read_csv_from<R: Read>(reader: R, label: &str) -> BatchResult<Batch> {
    let csv_error = |e: csv::Error| BatchError::Csv {
        path: label.to_string(),
        message: e.to_string(),
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut batch = Batch::with_columns(headers.iter().cloned());
    for result in rdr.records() {
        let row = result.map_err(csv_error)?;
        let mut record = Record::new();
        for (column, raw) in headers.iter().zip(row.iter()) {
            record.insert(column.clone(), parse_cell(raw));
        }
        batch.push(record);
    }

    Ok(batch)
}

/// Parses one CSV cell into a JSON value.
pub fn parse_cell(raw: &str) -> Value {
    let raw = raw.trim();
    if NULL_TOKENS.contains(&raw) {
        return Value::Null;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Number(i.into());
    }
    // Number::from_f64 refuses non-finite values; those stay as text
    if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(raw.to_string())
}
