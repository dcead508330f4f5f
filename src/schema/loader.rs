//! Schema files on disk
//!
//! A schema file is one JSON document holding a [`Schema`]. When no file
//! is configured the built-in diabetes schema applies. Unreadable or
//! structurally invalid files are FATAL: the process must not serve with
//! a schema it cannot trust.

use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// Resolves the schema a validator is built from.
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader {
    path: Option<PathBuf>,
}

impl SchemaLoader {
    /// Loader reading from `path`, or falling back to the built-in schema.
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
        }
    }

    /// Configured schema file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads the configured schema file or returns the built-in schema.
    pub fn load(&self) -> SchemaResult<Schema> {
        match &self.path {
            Some(path) => Self::load_file(path),
            None => Ok(Schema::diabetes()),
        }
    }

    /// Loads and structurally validates a single schema file.
    pub fn load_file(path: &Path) -> SchemaResult<Schema> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        let schema: Schema = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(path.display().to_string(), e))?;

        Ok(schema)
    }
}
