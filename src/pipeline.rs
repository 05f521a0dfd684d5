//! End-to-end report generation.

use std::fs;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::analyzers::{cluster, explainer, features, heatmap, network, radar, timeline};
use crate::charts;
use crate::config::ReportConfig;
use crate::loader::{DataSet, load_dataset};
use crate::output::{ModelSummary, RunSummary, write_artifact, write_summary};

/// Loads the data directory once and writes all six charts plus
/// `run_summary.json` into the results directory.
#[tracing::instrument(skip_all, fields(
    data_dir = %config.data_dir.display(),
    results_dir = %config.results_dir.display(),
))]
pub fn generate_all(config: &ReportConfig) -> Result<RunSummary> {
    let data = load_dataset(&config.data_dir).context("failed to load input data")?;

    fs::create_dir_all(&config.results_dir).with_context(|| {
        format!("failed to create results dir {}", config.results_dir.display())
    })?;

    generate_from(&data, config)
}

/// Same as [`generate_all`] for an already-loaded dataset.
pub fn generate_from(data: &DataSet, config: &ReportConfig) -> Result<RunSummary> {
    let out = config.results_dir.as_path();
    let mut artifacts = Vec::with_capacity(charts::ARTIFACTS.len());

    let knowledge = heatmap::knowledge_heatmap(data);
    info!(cells = knowledge.cells.len(), "Knowledge heatmap aggregated");
    artifacts.push(write_artifact(
        out,
        charts::HEATMAP_FILE,
        &charts::heatmap::render(&knowledge),
    )?);

    let class_radar = radar::class_radar(&data.submissions);
    info!(classes = class_radar.profiles.len(), "Class radar aggregated");
    artifacts.push(write_artifact(
        out,
        charts::RADAR_FILE,
        &charts::radar::render(&class_radar),
    )?);

    let clusters = cluster::behavior_clusters(data, &config.model)
        .context("behaviour clustering failed")?;
    artifacts.push(write_artifact(
        out,
        charts::CLUSTERS_FILE,
        &charts::scatter3d::render(&clusters),
    )?);

    let feature_rows = features::student_features(&data.submissions);
    let model = explainer::train_mastery_model(&feature_rows, &config.model)
        .context("mastery model training failed")?;
    artifacts.push(write_artifact(
        out,
        charts::MODEL_FILE,
        &charts::explainer::render(&model),
    )?);

    let graph = network::knowledge_graph(data);
    info!(nodes = graph.nodes.len(), edges = graph.edges.len(), "Knowledge graph built");
    artifacts.push(write_artifact(
        out,
        charts::NETWORK_FILE,
        &charts::network::render(&graph),
    )?);

    let activity = timeline::submission_timeline(&data.submissions);
    info!(days = activity.frames.len(), "Submission timeline aggregated");
    artifacts.push(write_artifact(
        out,
        charts::TIMELINE_FILE,
        &charts::timeline::render(&activity),
    )?);

    let summary = RunSummary {
        generated_at: Utc::now(),
        data_dir: config.data_dir.clone(),
        results_dir: config.results_dir.clone(),
        submission_files: data.submission_files.len(),
        submissions: data.submissions.len(),
        students: data.students.len(),
        titles: data.titles.len(),
        roster_present: data.roster_present,
        feature_rows: feature_rows.len(),
        clusters: clusters.k,
        model: ModelSummary {
            test_accuracy: model.test_accuracy,
            train_rows: model.train_rows,
            test_rows: model.test_rows,
            trees: model.booster.trees().len(),
            importance: model.importance.clone(),
        },
        artifacts,
    };
    let summary_path = write_summary(out, &summary)?;
    info!(path = %summary_path.display(), "Report generation complete");

    Ok(summary)
}
