//! diabetes-serve - Validated serving of a diabetes classifier
//!
//! - `schema`: declarative record schema and the batch validator
//! - `model`: artifacts, estimators and the loader
//! - `http_server`: axum prediction API
//! - `quality`: data quality and performance gates
//! - `cli`: command-line entry points

pub mod batch;
pub mod cli;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod quality;
pub mod schema;
