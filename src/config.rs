//! Run configuration.
//!
//! Directories come from the command line (or `DATA_DIR` / `RESULTS_DIR`);
//! model settings default to the values below and may be overridden by a
//! JSON file:
//! ```json
//! {
//!   "gbdt": { "eta": 0.1, "max_depth": 4, "rounds": 100 },
//!   "clusters": 3,
//!   "test_fraction": 0.2
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::GbdtParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub gbdt: GbdtParams,
    pub test_fraction: f64,
    pub split_seed: u64,
    pub clusters: usize,
    pub cluster_seed: u64,
    pub cluster_restarts: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            gbdt: GbdtParams::default(),
            test_fraction: 0.2,
            split_seed: 42,
            clusters: 3,
            cluster_seed: 42,
            cluster_restarts: 10,
        }
    }
}

impl ModelConfig {
    /// Loads overrides from a JSON file; absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid model config {}", path.display()))?;
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub data_dir: PathBuf,
    pub results_dir: PathBuf,
    pub model: ModelConfig,
}

impl ReportConfig {
    pub fn new(data_dir: impl Into<PathBuf>, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            results_dir: results_dir.into(),
            model: ModelConfig::default(),
        }
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, r#"{ "gbdt": { "rounds": 10 }, "clusters": 4 }"#).unwrap();

        let config = ModelConfig::load(&path).unwrap();
        assert_eq!(config.gbdt.rounds, 10);
        assert_eq!(config.gbdt.max_depth, 4);
        assert_eq!(config.clusters, 4);
        assert_eq!(config.test_fraction, 0.2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = ModelConfig::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read model config"));
    }
}
