//! CLI Output Tests
//!
//! Runs the built binary:
//! - `--json` stdout holds exactly one JSON document
//! - Log events go to stderr for offline commands

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_diabetes-serve"))
        .args(args)
        .output()
        .unwrap()
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Parses stdout as one JSON document; trailing data fails the parse.
fn single_document(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

fn stderr_events(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stderr)
        .lines()
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .filter_map(|v| v["event"].as_str().map(str::to_string))
        .collect()
}

// =============================================================================
// JSON output
// =============================================================================

#[test]
fn test_data_quality_json_is_one_document() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "q.csv", "a,b\n1,2\n3,4\n5,6\n");

    let output = run(&["data-quality", path.to_str().unwrap(), "--min-rows", "3", "--json"]);

    assert!(output.status.success());
    let value = single_document(&output);
    assert_eq!(value["status"], "ok");
    assert_eq!(value["data"]["rows"], 3);
    assert!(stderr_events(&output).contains(&"QUALITY_REPORT".to_string()));
}

#[test]
fn test_evaluate_json_is_one_document() {
    let dir = TempDir::new().unwrap();
    let stage_dir = dir.path().join("models").join("toy");
    fs::create_dir_all(&stage_dir).unwrap();
    let artifact = json!({
        "name": "toy",
        "version": "1",
        "features": ["x"],
        "estimator": {"kind": "logistic", "weights": [[4.0]], "intercepts": [-2.0]}
    });
    fs::write(stage_dir.join("latest.json"), artifact.to_string()).unwrap();
    let config = write_file(
        &dir,
        "config.json",
        &json!({
            "model_dir": dir.path().join("models").to_string_lossy(),
            "model_name": "toy"
        })
        .to_string(),
    );
    let data = write_file(&dir, "eval.csv", "x,Outcome\n0,0\n0.1,0\n0.9,1\n1,1\n");

    let output = run(&[
        "evaluate",
        "--config",
        config.to_str().unwrap(),
        "--data",
        data.to_str().unwrap(),
        "--json",
    ]);

    assert!(output.status.success());
    let value = single_document(&output);
    assert_eq!(value["data"]["metrics"]["samples"], 4);
    assert_eq!(value["data"]["metrics"]["roc_auc"]["value"], 1.0);

    let events = stderr_events(&output);
    assert!(events.contains(&"MODEL_LOADED".to_string()));
    assert!(events.contains(&"PERFORMANCE_GATE".to_string()));
}

// =============================================================================
// Human output
// =============================================================================

#[test]
fn test_validate_data_stdout_has_only_results() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "a.csv",
        "Pregnancies,Glucose,BloodPressure,SkinThickness,Insulin,BMI,DiabetesPedigreeFunction,Age\n\
         1,85,66,29,0,26.6,0.351,31\n",
    );

    let output = run(&["validate-data", path.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec!["a.csv: OK", "Data validation complete: 1 files passed"]
    );
}
