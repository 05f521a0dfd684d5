//! Writing report artifacts and the run summary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

pub const SUMMARY_FILE: &str = "run_summary.json";

#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub test_accuracy: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub trees: usize,
    pub importance: Vec<(String, f64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub data_dir: PathBuf,
    pub results_dir: PathBuf,
    pub submission_files: usize,
    pub submissions: usize,
    pub students: usize,
    pub titles: usize,
    pub roster_present: bool,
    pub feature_rows: usize,
    pub clusters: usize,
    pub model: ModelSummary,
    pub artifacts: Vec<PathBuf>,
}

/// Writes one HTML artifact and checks that it landed on disk.
pub fn write_artifact(results_dir: &Path, name: &str, html: &str) -> Result<PathBuf> {
    let path = results_dir.join(name);
    fs::write(&path, html).with_context(|| format!("failed to write {}", path.display()))?;

    if !path.exists() {
        bail!("{} was not generated", path.display());
    }
    debug!(path = %path.display(), bytes = html.len(), "Artifact written");
    Ok(path)
}

/// Writes the summary as pretty-printed JSON next to the artifacts.
pub fn write_summary(results_dir: &Path, summary: &RunSummary) -> Result<PathBuf> {
    let path = results_dir.join(SUMMARY_FILE);
    fs::write(&path, serde_json::to_string_pretty(summary)?)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Logs the summary as pretty-printed JSON.
pub fn print_json(summary: &RunSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
