//! Model artifacts on disk
//!
//! Artifacts live at `<model_dir>/<name>/<stage>.json`. Loading tries the
//! requested stage first and falls back to `latest`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::observability::{log_event_with_fields, Event};

use super::artifact::ModelArtifact;
use super::errors::{ModelError, ModelResult};
use super::predictor::Model;

/// Stage tried when the requested stage has no usable artifact.
pub const FALLBACK_STAGE: &str = "latest";

/// Reads model artifacts from a directory tree.
#[derive(Debug, Clone)]
pub struct ModelLoader {
    model_dir: PathBuf,
}

impl ModelLoader {
    pub fn new(model_dir: &Path) -> Self {
        Self {
            model_dir: model_dir.to_path_buf(),
        }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Location of an artifact for a model name and stage.
    pub fn artifact_path(&self, name: &str, stage: &str) -> PathBuf {
        self.model_dir.join(name).join(format!("{}.json", stage))
    }

    /// Loads `name` at `stage`, falling back to `latest`.
    ///
    /// Both failures are logged; the error returned is the fallback's.
    pub fn load(&self, name: &str, stage: &str) -> ModelResult<Model> {
        match self.load_stage(name, stage) {
            Ok(model) => Ok(model),
            Err(primary) if stage != FALLBACK_STAGE => {
                log_event_with_fields(
                    Event::ModelFallback,
                    &[("model", name), ("stage", stage), ("error", primary.message())],
                );
                self.load_stage(name, FALLBACK_STAGE)
            }
            Err(e) => Err(e),
        }
    }

    /// Loads exactly one stage, without fallback.
    pub fn load_stage(&self, name: &str, stage: &str) -> ModelResult<Model> {
        let path = self.artifact_path(name, stage);
        let artifact = Self::read_artifact(&path)?;
        let model = Model::from_artifact(artifact, stage)?;

        log_event_with_fields(
            Event::ModelLoaded,
            &[
                ("model", name),
                ("stage", stage),
                ("version", model.info().version.as_str()),
                ("estimator", model.info().estimator),
            ],
        );
        Ok(model)
    }

    /// Reads and parses one artifact file.
    pub fn read_artifact(path: &Path) -> ModelResult<ModelArtifact> {
        if !path.exists() {
            return Err(ModelError::not_found(path.display().to_string()));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ModelError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        ModelArtifact::parse(&content, &path.display().to_string())
    }
}
