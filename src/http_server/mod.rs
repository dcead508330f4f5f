//! # HTTP Server Module
//!
//! Axum server exposing the diabetes classifier.
//!
//! # Endpoints
//!
//! - `/` - Service description
//! - `/predict`, `/predict/batch` - Predictions
//! - `/health` - Health check
//! - `/observability/*` - Health and metrics

pub mod config;
pub mod errors;
pub mod observability_routes;
pub mod predict_routes;
pub mod server;
pub mod state;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use predict_routes::{BatchPredictResponse, PredictResponse};
pub use server::HttpServer;
pub use state::AppState;
