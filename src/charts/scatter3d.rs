use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::analyzers::types::BehaviorClusters;
use crate::charts::html::{self, Chart, Page};

const CLUSTER_COLORS: [&str; 5] = ["#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF"];

/// One `scatter3D` series per cluster; points are
/// `[submission_count, avg_score, accuracy, student_id]`.
pub fn option(clusters: &BehaviorClusters) -> Value {
    let mut grouped: BTreeMap<usize, Vec<Value>> = BTreeMap::new();
    for s in &clusters.students {
        grouped.entry(s.cluster).or_default().push(json!([
            s.submission_count,
            s.avg_score,
            s.accuracy,
            s.student_id
        ]));
    }

    let series: Vec<Value> = grouped
        .into_iter()
        .map(|(cluster, data)| {
            json!({
                "type": "scatter3D",
                "name": format!("Cluster {cluster}"),
                "data": data,
                "itemStyle": { "color": CLUSTER_COLORS[cluster % CLUSTER_COLORS.len()] },
            })
        })
        .collect();

    json!({
        "backgroundColor": "white",
        "title": { "text": "3D clustering of student behaviour" },
        "tooltip": {},
        "legend": { "top": "5%" },
        "grid3D": {},
        "xAxis3D": { "type": "value", "name": "Submissions" },
        "yAxis3D": { "type": "value", "name": "Average score" },
        "zAxis3D": { "type": "value", "name": "Accuracy" },
        "series": series,
    })
}

pub fn render(clusters: &BehaviorClusters) -> String {
    html::render(
        &Page {
            title: "Student behaviour clusters",
            preamble: None,
            gl: true,
        },
        &[Chart::new(option(clusters), 700)],
    )
}
