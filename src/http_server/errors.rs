//! # HTTP API Errors
//!
//! Subsystem failures translated into HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::model::ModelError;
use crate::schema::{SchemaError, Violation};

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors a handler can answer with
#[derive(Debug, Error)]
pub enum ApiError {
    /// No model was loaded at startup
    #[error("Model not loaded; the service cannot predict until an artifact is available")]
    ModelNotLoaded,

    /// Request body is not a single JSON object
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Input violates the schema
    #[error("{message}")]
    Validation {
        message: String,
        violations: Vec<Violation>,
    },

    /// Model failed on validated input
    #[error("Prediction failed: {0}")]
    Inference(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ModelNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        let message = err.message().to_string();
        ApiError::Validation {
            message,
            violations: err.into_violations(),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        ApiError::Inference(err.to_string())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        let code = err.status_code().as_u16();
        let error = err.to_string();
        let violations = match err {
            ApiError::Validation { violations, .. } => violations,
            _ => Vec::new(),
        };
        Self {
            error,
            code,
            violations,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelErrorCode;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::ModelNotLoaded.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ApiError::InvalidBody("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Inference("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_schema_error_becomes_422_with_violations() {
        let schema_err =
            SchemaError::validation_failed("diabetes", vec![Violation::missing_column("Glucose")]);
        let api_err = ApiError::from(schema_err);
        assert_eq!(api_err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = ErrorResponse::from(api_err);
        assert_eq!(body.code, 422);
        assert_eq!(body.violations.len(), 1);
        assert!(body.error.contains("Glucose"));
    }

    #[test]
    fn test_model_error_becomes_500() {
        let err = ApiError::from(ModelError::new(ModelErrorCode::DiabModelInferenceFailed, "boom"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("boom"));
    }
}
