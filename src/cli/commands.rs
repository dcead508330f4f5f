//! CLI command implementations
//!
//! `serve` boots in a fixed order: configuration, schema, model, HTTP.
//! A missing model does not stop the boot; the server answers 503 until
//! restarted with an artifact in place.
//!
//! The offline commands print one line per result and fail the process
//! on the first rejected input.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::batch::{read_csv, Batch};
use crate::http_server::{AppState, HttpServer};
use crate::model::{Model, ModelInputValidator};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::quality::{
    assess, gate, PerformanceMetrics, PerformanceReport, PerformanceThresholds, QualityReport,
    QualityThresholds, RocAuc,
};
use crate::schema::{RecordValidator, SchemaLoader};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{collect_csv_files, file_label, write_line, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        // Server threads log to stdout, so it is never locked while serving
        Command::Serve { config, port } => serve(&config, port),
        Command::ValidateData {
            paths,
            schema,
            fill_missing,
        } => with_stdout(|out| validate_data(out, &paths, schema.as_deref(), fill_missing).map(|_| ())),
        Command::DataQuality {
            path,
            min_rows,
            json,
        } => with_stdout(|out| data_quality(out, &path, min_rows, json).map(|_| ())),
        Command::ValidateModelInput {
            paths,
            target_column,
        } => with_stdout(|out| validate_model_input(out, &paths, &target_column).map(|_| ())),
        Command::Evaluate {
            config,
            data,
            label_column,
            json,
        } => with_stdout(|out| evaluate(out, &config, &data, &label_column, json).map(|_| ())),
    }
}

/// Runs an offline command with stdout reserved for its results.
fn with_stdout<F>(command: F) -> CliResult<()>
where
    F: FnOnce(&mut io::StdoutLock<'static>) -> CliResult<()>,
{
    Logger::route_all_to_stderr();
    let mut out = io::stdout().lock();
    command(&mut out)
}

/// Start the prediction HTTP server
///
/// 1. Configuration load
/// 2. Schema load (fatal on a malformed file)
/// 3. Model load with stage fallback (non-fatal)
/// 4. HTTP bind and serve until ctrl-c
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    init_tracing();

    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("config", config_path.display().to_string().as_str()),
            ("model_dir", config.model_dir.as_str()),
        ],
    );

    let state = build_state(&config)?;

    let server = HttpServer::new(config.http.clone(), Arc::new(state));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Resolves schema and model into handler state.
pub fn build_state(config: &Config) -> CliResult<AppState> {
    let schema = config.schema_loader().load()?;
    let (schema_id, schema_version) = schema.key();
    log_event_with_fields(
        Event::SchemaLoaded,
        &[("schema_id", schema_id), ("schema_version", schema_version)],
    );
    let validator = RecordValidator::new(schema)?;

    let model = match config
        .model_loader()
        .load(&config.model_name, &config.model_stage)
    {
        Ok(model) => Some(model),
        Err(e) => {
            log_event_with_fields(
                Event::ModelUnavailable,
                &[("model", config.model_name.as_str()), ("error", e.message())],
            );
            None
        }
    };

    Ok(AppState::new(validator, model).with_fill_missing(config.fill_missing))
}

/// HTTP request spans from tower-http; `RUST_LOG` overrides the filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    // Already initialised when serve runs twice in one process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init();
}

/// Validate CSV files against the schema
///
/// Prints `<file>: OK` per passing file and `<file>: FAILED - <reason>` for
/// the first failing one, then stops. Returns the number of files checked.
pub fn validate_data<W: Write>(
    out: &mut W,
    paths: &[PathBuf],
    schema: Option<&Path>,
    fill_missing: bool,
) -> CliResult<usize> {
    let schema = SchemaLoader::new(schema).load()?;
    let validator = RecordValidator::new(schema)?;

    let files = collect_csv_files(paths)?;
    if files.is_empty() {
        return Err(CliError::data_error("No CSV files found"));
    }

    for file in &files {
        let label = file_label(file);
        let outcome = read_csv(file)
            .map_err(CliError::from)
            .and_then(|batch| validator.validate(batch, fill_missing).map_err(CliError::from));

        match outcome {
            Ok(batch) => {
                write_line(out, &format!("{}: OK", label))?;
                log_event_with_fields(
                    Event::BatchValidated,
                    &[("file", label.as_str()), ("rows", batch.len().to_string().as_str())],
                );
            }
            Err(e) => {
                write_line(out, &format!("{}: FAILED - {}", label, e.message()))?;
                log_event_with_fields(
                    Event::BatchRejected,
                    &[("file", label.as_str()), ("error", e.message())],
                );
                return Err(CliError::validation_failed(format!(
                    "{}: {}",
                    label,
                    e.message()
                )));
            }
        }
    }

    write_line(
        out,
        &format!("Data validation complete: {} files passed", files.len()),
    )?;
    Ok(files.len())
}

/// Data quality report for one CSV file
pub fn data_quality<W: Write>(
    out: &mut W,
    path: &Path,
    min_rows: usize,
    json: bool,
) -> CliResult<QualityReport> {
    let batch = read_csv(path)?;
    let thresholds = QualityThresholds {
        min_rows,
        ..Default::default()
    };
    let report = assess(&batch, &thresholds);

    log_event_with_fields(
        Event::QualityReport,
        &[
            ("file", file_label(path).as_str()),
            ("rows", report.rows.to_string().as_str()),
            ("warnings", report.warnings.len().to_string().as_str()),
            ("errors", report.errors.len().to_string().as_str()),
        ],
    );

    if json {
        write_response(out, serde_json::to_value(&report)?)?;
    } else {
        write_line(
            out,
            &format!(
                "{}: {} rows, {} columns",
                file_label(path),
                report.rows,
                report.columns
            ),
        )?;
        if !report.warnings.is_empty() {
            write_line(out, "WARNINGS:")?;
            for warning in &report.warnings {
                write_line(out, &format!("  {}", warning))?;
            }
        }
        if report.passed() {
            write_line(out, "DATA QUALITY VALIDATION PASSED")?;
        } else {
            write_line(out, "DATA QUALITY VALIDATION FAILED")?;
            for error in &report.errors {
                write_line(out, &format!("  {}", error))?;
            }
        }
    }

    if !report.passed() {
        return Err(CliError::quality_failed(report.errors.join("; ")));
    }
    Ok(report)
}

/// Check processed files against the model input contract
///
/// Files without `target_column` are skipped; the column is dropped from
/// the others before checking. Returns the number of files checked.
pub fn validate_model_input<W: Write>(
    out: &mut W,
    paths: &[PathBuf],
    target_column: &str,
) -> CliResult<usize> {
    let validator = ModelInputValidator::default();

    let mut targets: Vec<(PathBuf, Batch)> = Vec::new();
    for file in collect_csv_files(paths)? {
        // Unreadable files cannot carry the target column
        if let Ok(batch) = read_csv(&file) {
            if batch.has_column(target_column) {
                targets.push((file, batch));
            }
        }
    }

    if targets.is_empty() {
        return Err(CliError::data_error(format!(
            "No files with {} column found",
            target_column
        )));
    }

    let count = targets.len();
    for (file, mut frame) in targets {
        let label = file_label(&file);
        frame.drop_column(target_column);

        match validator.validate_model_input(&frame) {
            Ok(()) => write_line(out, &format!("{}: OK", label))?,
            Err(e) => {
                write_line(out, &format!("{}: FAILED - {}", label, e.message()))?;
                return Err(CliError::validation_failed(format!(
                    "{}: {}",
                    label,
                    e.message()
                )));
            }
        }
    }

    write_line(
        out,
        &format!("Model validation complete: {} files passed", count),
    )?;
    Ok(count)
}

/// Score the configured model on labelled data and apply the gate
pub fn evaluate<W: Write>(
    out: &mut W,
    config_path: &Path,
    data: &Path,
    label_column: &str,
    json: bool,
) -> CliResult<PerformanceReport> {
    let config = Config::load(config_path)?;
    let model = config
        .model_loader()
        .load(&config.model_name, &config.model_stage)?;

    let batch = read_csv(data)?;
    let metrics = score(&model, &batch, label_column)?;
    let report = gate(metrics, &PerformanceThresholds::default());

    log_event_with_fields(
        Event::PerformanceGate,
        &[
            ("model", model.info().name.as_str()),
            ("samples", report.metrics.samples.to_string().as_str()),
            ("passed", if report.passed() { "true" } else { "false" }),
        ],
    );

    if json {
        write_response(out, serde_json::to_value(&report)?)?;
    } else {
        write_performance(out, &report)?;
    }

    if !report.passed() {
        return Err(CliError::gate_failed(report.failures.join("; ")));
    }
    Ok(report)
}

fn write_performance<W: Write>(out: &mut W, report: &PerformanceReport) -> CliResult<()> {
    let m = &report.metrics;
    let t = PerformanceThresholds::default();

    write_line(out, &format!("Samples:   {}", m.samples))?;
    write_line(out, &format!("Accuracy:  {:.4} (min: {})", m.accuracy, t.min_accuracy))?;
    write_line(out, &format!("Precision: {:.4} (min: {})", m.precision, t.min_precision))?;
    write_line(out, &format!("Recall:    {:.4} (min: {})", m.recall, t.min_recall))?;
    write_line(out, &format!("F1 Score:  {:.4} (min: {})", m.f1, t.min_f1))?;
    match m.roc_auc {
        RocAuc::Value(auc) => {
            write_line(out, &format!("ROC AUC:   {:.4} (min: {})", auc, t.min_roc_auc))?
        }
        RocAuc::Undefined => write_line(out, "ROC AUC:   undefined (only one class present)")?,
        RocAuc::Skipped => write_line(out, "ROC AUC:   skipped (no probabilities)")?,
    }

    if report.passed() {
        write_line(out, "MODEL PERFORMANCE VALIDATION PASSED")
    } else {
        write_line(out, "MODEL PERFORMANCE VALIDATION FAILED")?;
        for failure in &report.failures {
            write_line(out, &format!("  {}", failure))?;
        }
        Ok(())
    }
}

/// Runs the model over every row. The label column is `label_column` when
/// present, otherwise the last column.
fn score(model: &Model, batch: &Batch, label_column: &str) -> CliResult<PerformanceMetrics> {
    let label_column = if batch.has_column(label_column) {
        label_column.to_string()
    } else {
        batch
            .columns()
            .last()
            .cloned()
            .ok_or_else(|| CliError::data_error("Data file has no columns"))?
    };

    if batch.is_empty() {
        return Err(CliError::data_error("Data file has no rows"));
    }

    let mut y_true = Vec::with_capacity(batch.len());
    let mut y_pred = Vec::with_capacity(batch.len());
    let mut scores = Vec::with_capacity(batch.len());

    for (row, record) in batch.rows().iter().enumerate() {
        let label = record.get(&label_column).and_then(as_label).ok_or_else(|| {
            CliError::data_error(format!(
                "Row {}: label column {} must hold non-negative integers",
                row, label_column
            ))
        })?;
        let prediction = model
            .predict(record)
            .map_err(|e| CliError::data_error(format!("Row {}: {}", row, e.message())))?;

        y_true.push(label);
        scores.push(Model::positive_score(&prediction));
        y_pred.push(prediction.label);
    }

    let scores: Option<Vec<f64>> = scores.into_iter().collect();
    Ok(PerformanceMetrics::compute(&y_true, &y_pred, scores.as_deref()))
}

fn as_label(value: &Value) -> Option<usize> {
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|f| *f >= 0.0 && f.fract() == 0.0)
        .map(|f| f as usize)
}
