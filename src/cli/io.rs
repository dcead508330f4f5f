//! Output and input-file handling for CLI
//!
//! - Human output: one line per result on stdout
//! - `--json` output: single JSON object `{"status": "ok", "data": ...}`
//! - UTF-8 only

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Write a success response as one JSON line
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

/// Write one line of human-readable output
pub fn write_line<W: Write>(out: &mut W, line: &str) -> CliResult<()> {
    writeln!(out, "{}", line)?;
    Ok(())
}

/// Expands directories to their `*.csv` entries, sorted by name.
///
/// Files are taken as given. A path that does not exist is an error.
pub fn collect_csv_files(paths: &[PathBuf]) -> CliResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let entries = fs::read_dir(path).map_err(|e| {
                CliError::io_error(format!("Failed to read directory {}: {}", path.display(), e))
            })?;

            let mut found = Vec::new();
            for entry in entries {
                let entry_path = entry?.path();
                let is_csv = entry_path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false);
                if is_csv && entry_path.is_file() {
                    found.push(entry_path);
                }
            }
            found.sort();
            files.extend(found);
        } else if path.exists() {
            files.push(path.clone());
        } else {
            return Err(CliError::io_error(format!(
                "No such file or directory: {}",
                path.display()
            )));
        }
    }

    Ok(files)
}

/// File name used in per-file result lines
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
