//! Prediction HTTP Routes
//!
//! - `GET /` - service description and loaded model
//! - `POST /predict` - one record
//! - `POST /predict/batch` - array of records, validated as one batch
//!
//! Input is validated before the model is consulted, so malformed input
//! answers 422 even while no model is loaded.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;

use crate::batch::{Batch, Record};
use crate::model::{Model, ModelInfo};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{SchemaError, Schema};

use super::errors::{ApiError, ApiResult};
use super::state::AppState;

/// Response of a single prediction
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: usize,
    /// Same as `prediction`; the deployed model assigns clusters
    pub cluster: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<Vec<f64>>,
    pub input_data: Record,
}

/// Response of a batch prediction
#[derive(Debug, Serialize)]
pub struct BatchPredictResponse {
    pub count: usize,
    pub predictions: Vec<PredictResponse>,
}

/// Service description
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: Value,
    pub model: Option<ModelInfo>,
}

/// Create prediction routes
pub fn predict_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/predict", post(predict_handler))
        .route("/predict/batch", post(predict_batch_handler))
        .with_state(state)
}

async fn root_handler(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "Diabetes prediction API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: serde_json::json!({
            "predict": "/predict",
            "predict_batch": "/predict/batch",
            "health": "/health",
            "metrics": "/observability/metrics"
        }),
        model: state.model().map(|m| m.info().clone()),
    })
}

#[tracing::instrument(skip_all)]
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<PredictResponse>> {
    let record = match body {
        Value::Object(obj) => obj,
        other => {
            return Err(ApiError::InvalidBody(format!(
                "expected a JSON object, got {}",
                crate::batch::json_type_name(&other)
            )))
        }
    };

    let record = state
        .validator()
        .validate_record(record, false)
        .map_err(|e| reject(&state, e))?;

    let model = require_model(&state)?;
    let response = predict_one(&state, model, record)?;
    state.metrics().increment_predictions_served();
    log_event_with_fields(
        Event::PredictionServed,
        &[("prediction", response.prediction.to_string().as_str())],
    );

    Ok(Json(response))
}

#[tracing::instrument(skip_all)]
async fn predict_batch_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<BatchPredictResponse>> {
    if !body.is_array() {
        return Err(ApiError::InvalidBody("expected a JSON array of objects".into()));
    }
    let batch = Batch::from_json(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;

    let fill = state.fill_missing();
    let pending_fills = if fill {
        count_schema_nulls(state.validator().schema(), &batch)
    } else {
        0
    };

    let batch = state
        .validator()
        .validate(batch, fill)
        .map_err(|e| reject_batch(&state, e))?;
    state.metrics().increment_batches_validated();
    state.metrics().add_values_filled(pending_fills);

    let model = require_model(&state)?;
    let predictions = batch
        .into_rows()
        .into_iter()
        .map(|record| predict_one(&state, model, record))
        .collect::<ApiResult<Vec<_>>>()?;

    for _ in &predictions {
        state.metrics().increment_predictions_served();
    }
    log_event_with_fields(
        Event::PredictionServed,
        &[("count", predictions.len().to_string().as_str())],
    );

    Ok(Json(BatchPredictResponse {
        count: predictions.len(),
        predictions,
    }))
}

fn require_model(state: &AppState) -> ApiResult<&Model> {
    match state.model() {
        Some(model) => Ok(model.as_ref()),
        None => {
            state.metrics().increment_model_unavailable();
            log_event_with_fields(Event::ModelUnavailable, &[("route", "predict")]);
            Err(ApiError::ModelNotLoaded)
        }
    }
}

fn predict_one(state: &AppState, model: &Model, record: Record) -> ApiResult<PredictResponse> {
    let prediction = model.predict(&record).map_err(|e| {
        state.metrics().increment_predictions_failed();
        log_event_with_fields(Event::PredictionFailed, &[("error", e.message())]);
        ApiError::from(e)
    })?;

    let schema = state.validator().schema();
    let input_data: Record = record
        .into_iter()
        .filter(|(k, _)| schema.field(k).is_some())
        .collect();

    Ok(PredictResponse {
        prediction: prediction.label,
        cluster: prediction.label,
        probabilities: prediction.probabilities,
        input_data,
    })
}

fn reject(state: &AppState, err: SchemaError) -> ApiError {
    state.metrics().record_rejection(err.violations().len());
    let rule = err.rule().map(|r| r.as_str()).unwrap_or("unknown");
    log_event_with_fields(Event::PredictionRejected, &[("rule", rule)]);
    ApiError::from(err)
}

fn reject_batch(state: &AppState, err: SchemaError) -> ApiError {
    state.metrics().record_batch_rejection(err.violations().len());
    log_event_with_fields(
        Event::BatchRejected,
        &[("violations", err.violations().len().to_string().as_str())],
    );
    ApiError::from(err)
}

fn count_schema_nulls(schema: &Schema, batch: &Batch) -> u64 {
    schema
        .field_names()
        .filter(|name| batch.has_column(name))
        .map(|name| batch.column_values(name).filter(|v| v.is_null()).count() as u64)
        .sum()
}
