//! Configuration file
//!
//! One JSON document. Every field has a default, so `{}` is a valid
//! configuration serving the built-in schema from `./models`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;
use crate::model::ModelLoader;
use crate::schema::SchemaLoader;

use super::errors::{CliError, CliResult};

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the model artifact tree (default "./models")
    #[serde(default = "default_model_dir")]
    pub model_dir: String,

    /// Registered model name (default "DiabetesClusterClassifier")
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Stage loaded first; `latest` is the fallback (default "Production")
    #[serde(default = "default_model_stage")]
    pub model_stage: String,

    /// Schema file; the built-in diabetes schema when absent
    #[serde(default)]
    pub schema_path: Option<String>,

    /// Median-fill nulls in batch predictions (default false)
    #[serde(default)]
    pub fill_missing: bool,

    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_model_dir() -> String {
    "./models".to_string()
}
fn default_model_name() -> String {
    "DiabetesClusterClassifier".to_string()
}
fn default_model_stage() -> String {
    "Production".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            model_name: default_model_name(),
            model_stage: default_model_stage(),
            schema_path: None,
            fill_missing: false,
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.model_name.trim().is_empty() {
            return Err(CliError::config_error("model_name must not be empty"));
        }

        // Stage names become file names
        if self.model_stage.trim().is_empty()
            || self.model_stage.contains(&['/', '\\'][..])
            || self.model_stage.starts_with('.')
        {
            return Err(CliError::config_error(format!(
                "Invalid model_stage: '{}'",
                self.model_stage
            )));
        }

        if self.http.host.trim().is_empty() {
            return Err(CliError::config_error("http.host must not be empty"));
        }

        Ok(())
    }

    pub fn model_path(&self) -> &Path {
        Path::new(&self.model_dir)
    }

    pub fn model_loader(&self) -> ModelLoader {
        ModelLoader::new(self.model_path())
    }

    pub fn schema_loader(&self) -> SchemaLoader {
        let path = self.schema_path.as_ref().map(PathBuf::from);
        SchemaLoader::new(path.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, value: serde_json::Value) -> PathBuf {
        let path = dir.path().join("config.json");
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&write_config(&dir, json!({}))).unwrap();

        assert_eq!(config.model_dir, "./models");
        assert_eq!(config.model_name, "DiabetesClusterClassifier");
        assert_eq!(config.model_stage, "Production");
        assert!(config.schema_path.is_none());
        assert!(!config.fill_missing);
        assert_eq!(config.http.port, 8000);
        assert!(config.schema_loader().path().is_none());
    }

    #[test]
    fn test_config_nested_http() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            json!({"model_stage": "Staging", "http": {"port": 9000}, "fill_missing": true}),
        );
        let config = Config::load(&path).unwrap();

        assert_eq!(config.model_stage, "Staging");
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.host, "0.0.0.0");
        assert!(config.fill_missing);
    }

    #[test]
    fn test_config_rejects_path_like_stage() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, json!({"model_stage": "../secrets"}));

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
