//! Tabular batches for validation and inference
//!
//! A batch is an ordered list of records sharing an ordered column list.
//! Cells are JSON values so that HTTP bodies and CSV files flow through
//! the same validator:
//! - numbers stay numbers
//! - absent keys read as null
//! - nothing is coerced

mod errors;
mod reader;
mod table;

pub use errors::{BatchError, BatchResult};
pub use reader::{parse_cell, read_csv, read_csv_from};
pub use table::{Batch, Record};

pub(crate) use table::{json_type_name, median, number};
