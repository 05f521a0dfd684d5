//! Aggregates produced by the analyzers and consumed by the chart builders.

use chrono::NaiveDate;
use serde::Serialize;

/// Per-student feature row used by the mastery model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentFeatures {
    pub student_id: String,
    pub submission_count: usize,
    /// Fraction of fully correct submissions.
    pub accuracy: f64,
    pub avg_log_time: f64,
    pub active_days: usize,
    pub avg_submissions_per_day: f64,
    pub avg_score: f64,
    /// 1 when `avg_score` is above the cohort median.
    pub knowledge_mastery: u8,
}

/// Mean score for one (class, major, knowledge point) combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub class: String,
    pub major: String,
    pub knowledge_main: String,
    pub knowledge_detail: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeHeatmap {
    pub cells: Vec<HeatmapCell>,
    /// Facet rows, in natural class order.
    pub classes: Vec<String>,
    /// Facet columns, alphabetical.
    pub majors: Vec<String>,
    /// Upper end of the colour scale.
    pub max_score: f64,
}

/// Raw behaviour metrics for one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassProfile {
    pub class: String,
    pub total_submissions: usize,
    pub avg_score: f64,
    pub accuracy: f64,
    pub avg_time_sec: f64,
    pub unique_students: usize,
    pub avg_submissions: f64,
}

impl ClassProfile {
    /// Radar axes in display order.
    pub fn radar_values(&self) -> [f64; 5] {
        [
            self.avg_score,
            self.accuracy,
            self.avg_time_sec,
            self.avg_submissions,
            self.total_submissions as f64,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRadar {
    pub profiles: Vec<ClassProfile>,
    /// `radar_values` of each profile divided by the per-axis maximum.
    pub normalized: Vec<[f64; 5]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentCluster {
    pub student_id: String,
    pub submission_count: usize,
    pub avg_score: f64,
    pub accuracy: f64,
    pub cluster: usize,
    /// From the roster, when one was loaded.
    pub major: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BehaviorClusters {
    pub students: Vec<StudentCluster>,
    pub k: usize,
    pub inertia: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeCategory {
    Problem = 0,
    Knowledge = 1,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub category: NodeCategory,
    pub symbol_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Submission counts for one day, aligned with [`SubmissionTimeline::classes`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineFrame {
    pub date: NaiveDate,
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionTimeline {
    pub classes: Vec<String>,
    pub frames: Vec<TimelineFrame>,
}
