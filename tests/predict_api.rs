//! Prediction API Tests
//!
//! Router-level tests through `tower::ServiceExt::oneshot`:
//! - No model: 503 for valid input, 422 still wins for invalid input
//! - Validation failures: 422 with violations
//! - Success: prediction, cluster, input_data, probabilities when available
//! - Counters move with each outcome

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use diabetes_serve::http_server::{AppState, HttpServer, HttpServerConfig};
use diabetes_serve::model::{Model, ModelArtifact};
use diabetes_serve::observability::MetricsRegistry;
use diabetes_serve::schema::RecordValidator;
use serde_json::{json, Value};
use tower::ServiceExt;

// =============================================================================
// Helper Functions
// =============================================================================

const FEATURES: [&str; 8] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

fn artifact_from_json(value: Value) -> ModelArtifact {
    ModelArtifact::parse(&value.to_string(), "inline").unwrap()
}

fn centroid_model() -> Model {
    let artifact = artifact_from_json(json!({
        "name": "DiabetesClusterClassifier",
        "version": "3",
        "features": FEATURES,
        "estimator": {
            "kind": "nearest_centroid",
            "centroids": [
                [1, 90, 65, 20, 60, 25, 0.3, 25],
                [6, 160, 80, 35, 0, 38, 0.9, 50]
            ]
        }
    }));
    Model::from_artifact(artifact, "Production").unwrap()
}

fn logistic_model() -> Model {
    let artifact = artifact_from_json(json!({
        "name": "DiabetesRisk",
        "version": "1",
        "features": FEATURES,
        "scaler": {
            "mean": [3, 120, 70, 20, 80, 32, 0.5, 33],
            "scale": [3, 30, 12, 15, 100, 7, 0.3, 12]
        },
        "estimator": {
            "kind": "logistic",
            "weights": [[0.1, 1.2, 0.0, 0.0, 0.0, 0.7, 0.3, 0.2]],
            "intercepts": [-0.5]
        }
    }));
    Model::from_artifact(artifact, "Production").unwrap()
}

fn app(model: Option<Model>, metrics: Arc<MetricsRegistry>) -> Router {
    let state = AppState::new(RecordValidator::diabetes(), model)
        .with_metrics(metrics)
        .with_fill_missing(true);
    HttpServer::new(HttpServerConfig::default(), Arc::new(state)).router()
}

fn patient() -> Value {
    json!({
        "Pregnancies": 6, "Glucose": 148, "BloodPressure": 72,
        "SkinThickness": 35, "Insulin": 0, "BMI": 33.6,
        "DiabetesPedigreeFunction": 0.627, "Age": 50
    })
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// =============================================================================
// Model availability
// =============================================================================

/// Valid input without a loaded model is 503.
#[tokio::test]
async fn test_predict_without_model_is_503() {
    let metrics = Arc::new(MetricsRegistry::new());
    let (status, body) = post(app(None, metrics.clone()), "/predict", patient()).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 503);
    assert!(body["error"].as_str().unwrap().contains("Model not loaded"));
    assert_eq!(metrics.snapshot().model_unavailable, 1);
}

/// Invalid input is rejected before the model is consulted.
#[tokio::test]
async fn test_invalid_input_without_model_is_422() {
    let metrics = Arc::new(MetricsRegistry::new());
    let mut body = patient();
    body["Glucose"] = json!(-10);

    let (status, _) = post(app(None, metrics.clone()), "/predict", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(metrics.snapshot().model_unavailable, 0);
    assert_eq!(metrics.snapshot().requests_rejected, 1);
}

// =============================================================================
// Validation
// =============================================================================

/// Negative input is 422 with an out_of_range violation.
#[tokio::test]
async fn test_negative_input_is_422() {
    let metrics = Arc::new(MetricsRegistry::new());
    let mut body = patient();
    body["BMI"] = json!(-1.0);

    let (status, body) = post(app(Some(centroid_model()), metrics.clone()), "/predict", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 422);
    let violations = body["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["field"], "BMI");
    assert_eq!(violations[0]["rule"], "out_of_range");
    assert_eq!(violations[0]["value"], json!(-1.0));

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.requests_rejected, 1);
    assert_eq!(snapshot.violations_reported, 1);
    assert_eq!(snapshot.predictions_served, 0);
}

/// Missing fields are listed together.
#[tokio::test]
async fn test_missing_fields_are_422() {
    let metrics = Arc::new(MetricsRegistry::new());
    let (status, body) = post(
        app(Some(centroid_model()), metrics),
        "/predict",
        json!({"Glucose": 100, "BMI": 30}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let violations = body["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 6);
    assert!(violations.iter().all(|v| v["rule"] == "missing_column"));
}

/// A single record's null is never median-filled.
#[tokio::test]
async fn test_null_in_single_record_is_422() {
    let metrics = Arc::new(MetricsRegistry::new());
    let mut body = patient();
    body["Insulin"] = Value::Null;

    let (status, body) = post(app(Some(centroid_model()), metrics), "/predict", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["violations"][0]["rule"], "null_value");
}

/// A JSON array sent to the single-record route is a bad request.
#[tokio::test]
async fn test_non_object_body_is_400() {
    let metrics = Arc::new(MetricsRegistry::new());
    let (status, _) = post(
        app(Some(centroid_model()), metrics),
        "/predict",
        json!([patient()]),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Prediction
// =============================================================================

/// A labels-only model answers without probabilities.
#[tokio::test]
async fn test_predict_with_centroid_model() {
    let metrics = Arc::new(MetricsRegistry::new());
    let mut body = patient();
    body["Outcome"] = json!(1);

    let (status, body) = post(app(Some(centroid_model()), metrics.clone()), "/predict", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], 1);
    assert_eq!(body["cluster"], 1);
    assert!(body.get("probabilities").is_none());
    assert_eq!(body["input_data"]["Glucose"], 148);
    // Columns outside the schema are not echoed
    assert!(body["input_data"].get("Outcome").is_none());
    assert_eq!(metrics.snapshot().predictions_served, 1);
}

/// A probabilistic model adds probabilities summing to one.
#[tokio::test]
async fn test_predict_with_logistic_model_has_probabilities() {
    let metrics = Arc::new(MetricsRegistry::new());
    let (status, body) = post(app(Some(logistic_model()), metrics), "/predict", patient()).await;

    assert_eq!(status, StatusCode::OK);
    let probabilities = body["probabilities"].as_array().unwrap();
    assert_eq!(probabilities.len(), 2);
    let total: f64 = probabilities.iter().map(|p| p.as_f64().unwrap()).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(body["prediction"], 1);
}

/// Batch predictions fill nulls with the batch median when configured.
#[tokio::test]
async fn test_batch_predict_fills_missing() {
    let metrics = Arc::new(MetricsRegistry::new());
    let mut second = patient();
    second["Insulin"] = Value::Null;
    let mut third = patient();
    third["Insulin"] = json!(100);

    let (status, body) = post(
        app(Some(centroid_model()), metrics.clone()),
        "/predict/batch",
        json!([patient(), second, third]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["predictions"][1]["input_data"]["Insulin"], json!(50.0));

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.predictions_served, 3);
    assert_eq!(snapshot.batches_validated, 1);
    assert_eq!(snapshot.values_filled, 1);
}

/// A failing batch is rejected as a whole.
#[tokio::test]
async fn test_batch_predict_rejects_whole_batch() {
    let metrics = Arc::new(MetricsRegistry::new());
    let mut bad = patient();
    bad["Age"] = json!(150);

    let (status, body) = post(
        app(Some(centroid_model()), metrics.clone()),
        "/predict/batch",
        json!([patient(), bad]),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["violations"][0]["field"], "Age");
    assert_eq!(body["violations"][0]["row"], 1);
    assert_eq!(metrics.snapshot().batches_rejected, 1);
    assert_eq!(metrics.snapshot().predictions_served, 0);
}

// =============================================================================
// Service routes
// =============================================================================

#[tokio::test]
async fn test_root_describes_service() {
    let metrics = Arc::new(MetricsRegistry::new());
    let (status, body) = get(app(Some(centroid_model()), metrics), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"]["predict"], "/predict");
    assert_eq!(body["model"]["name"], "DiabetesClusterClassifier");
    assert_eq!(body["model"]["supports_probabilities"], false);
}

#[tokio::test]
async fn test_health_routes() {
    let metrics = Arc::new(MetricsRegistry::new());
    let (status, body) = get(app(None, metrics.clone()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model_loaded"], false);

    let (status, _) = get(app(None, metrics), "/observability/health").await;
    assert_eq!(status, StatusCode::OK);
}

/// The metrics endpoint serves the shared registry.
#[tokio::test]
async fn test_metrics_route_reflects_requests() {
    let metrics = Arc::new(MetricsRegistry::new());
    post(app(Some(centroid_model()), metrics.clone()), "/predict", patient()).await;

    let (status, body) = get(app(None, metrics), "/observability/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predictions_served"], 1);
    assert_eq!(body["requests_rejected"], 0);
}
