//! CLI argument definitions using clap
//!
//! Commands:
//! - diabetes-serve serve --config <path> [--port <port>]
//! - diabetes-serve validate-data <paths...> [--schema <path>] [--fill-missing]
//! - diabetes-serve data-quality <csv> [--min-rows <n>]
//! - diabetes-serve validate-model-input <paths...> [--target-column <name>]
//! - diabetes-serve evaluate --config <path> --data <csv> [--label-column <name>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Diabetes classifier serving and pre-deployment checks
#[derive(Parser, Debug)]
#[command(name = "diabetes-serve")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the prediction HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./diabetes-serve.json")]
        config: PathBuf,

        /// Override the configured HTTP port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate CSV files (or directories of CSV files) against the schema
    ValidateData {
        /// Files or directories to validate
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Schema file; the built-in diabetes schema when omitted
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Replace nulls with the column median instead of rejecting them
        #[arg(long)]
        fill_missing: bool,
    },

    /// Report missing values, duplicates, row count and outliers of a CSV file
    DataQuality {
        /// CSV file to assess
        path: PathBuf,

        /// Fewer rows than this is an error
        #[arg(long, default_value_t = 100)]
        min_rows: usize,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check processed CSV files have the shape the model expects
    ValidateModelInput {
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Only files with this column are checked; it is dropped first
        #[arg(long, default_value = "Cluster")]
        target_column: String,
    },

    /// Score the configured model on labelled data and apply the performance gate
    Evaluate {
        /// Path to configuration file
        #[arg(long, default_value = "./diabetes-serve.json")]
        config: PathBuf,

        /// Labelled CSV file
        #[arg(long)]
        data: PathBuf,

        /// Label column; the last column when absent from the file
        #[arg(long, default_value = "Outcome")]
        label_column: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate_data() {
        let cli = Cli::try_parse_from([
            "diabetes-serve",
            "validate-data",
            "data/raw",
            "extra.csv",
            "--fill-missing",
        ])
        .unwrap();

        match cli.command {
            Command::ValidateData {
                paths,
                schema,
                fill_missing,
            } => {
                assert_eq!(paths.len(), 2);
                assert!(schema.is_none());
                assert!(fill_missing);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["diabetes-serve", "serve"]).unwrap();
        match cli.command {
            Command::Serve { config, port } => {
                assert_eq!(config, PathBuf::from("./diabetes-serve.json"));
                assert!(port.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["diabetes-serve", "validate-model-input", "p.csv"]).unwrap();
        match cli.command {
            Command::ValidateModelInput { target_column, .. } => assert_eq!(target_column, "Cluster"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_validate_data_requires_a_path() {
        assert!(Cli::try_parse_from(["diabetes-serve", "validate-data"]).is_err());
    }
}
