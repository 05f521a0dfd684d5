use serde_json::{Value, json};

use crate::analyzers::types::SubmissionTimeline;
use crate::charts::html::{self, Chart, Page};

const PLAY_INTERVAL_MS: u32 = 1000;

/// An auto-playing timeline with one bar chart per day.
pub fn option(timeline: &SubmissionTimeline) -> Value {
    let dates: Vec<String> = timeline
        .frames
        .iter()
        .map(|f| f.date.format("%Y-%m-%d").to_string())
        .collect();

    let frames: Vec<Value> = timeline
        .frames
        .iter()
        .zip(&dates)
        .map(|(frame, date)| {
            json!({
                "title": {
                    "text": format!("{date} submissions per class"),
                    "subtext": "Submission activity",
                },
                "series": [{
                    "type": "bar",
                    "name": "Submissions",
                    "data": frame.counts,
                    "label": { "show": false },
                }],
            })
        })
        .collect();

    json!({
        "baseOption": {
            "timeline": {
                "axisType": "category",
                "data": dates,
                "autoPlay": true,
                "loop": true,
                "playInterval": PLAY_INTERVAL_MS,
                "bottom": -5,
            },
            "tooltip": {},
            "legend": { "show": false },
            "xAxis": {
                "type": "category",
                "name": "Class",
                "data": timeline.classes,
                "axisLabel": { "rotate": 45 },
            },
            "yAxis": { "type": "value", "name": "Submissions" },
        },
        "options": frames,
    })
}

pub fn render(timeline: &SubmissionTimeline) -> String {
    html::render(
        &Page {
            title: "Submission timeline",
            ..Page::default()
        },
        &[Chart::new(option(timeline), 500)],
    )
}
