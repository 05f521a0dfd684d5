//! HTML rendering of the analyzer outputs as ECharts pages.

pub mod explainer;
pub mod heatmap;
pub mod html;
pub mod network;
pub mod radar;
pub mod scatter3d;
pub mod timeline;

pub const HEATMAP_FILE: &str = "knowledge_heatmap.html";
pub const RADAR_FILE: &str = "class_radar_5dims_normalized.html";
pub const CLUSTERS_FILE: &str = "student_behavior_3d_clusters.html";
pub const MODEL_FILE: &str = "xgb_model_visualization.html";
pub const NETWORK_FILE: &str = "network_graph.html";
pub const TIMELINE_FILE: &str = "all_classes_timeline_tab.html";

/// Every artifact a full run writes, in dashboard order.
pub const ARTIFACTS: [&str; 6] = [
    HEATMAP_FILE,
    RADAR_FILE,
    CLUSTERS_FILE,
    MODEL_FILE,
    NETWORK_FILE,
    TIMELINE_FILE,
];
