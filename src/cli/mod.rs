//! CLI module
//!
//! Provides command-line interface for:
//! - serve: Start the prediction HTTP server
//! - validate-data: Record validation of CSV files
//! - data-quality: Data quality report of a raw dataset
//! - validate-model-input: Model input contract of processed files
//! - evaluate: Performance gate of the configured model

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    build_state, data_quality, evaluate, run, run_command, serve, validate_data,
    validate_model_input,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{collect_csv_files, write_response};
