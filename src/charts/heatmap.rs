use std::collections::{BTreeSet, HashMap};

use serde_json::{Value, json};

use crate::analyzers::types::KnowledgeHeatmap;
use crate::charts::html::{self, Chart, Page};

const TITLE_HEIGHT_PX: u32 = 60;
/// One row of panels: the grid plus room for rotated axis labels.
const ROW_HEIGHT_PX: u32 = 260;
const GRID_HEIGHT_PX: u32 = 170;
/// Majors beyond this wrap onto another row of panels.
const PANELS_PER_ROW: usize = 4;

/// Number of panel rows needed for `majors` panels.
pub fn panel_rows(majors: usize) -> usize {
    majors.max(1).div_ceil(PANELS_PER_ROW)
}

/// Chart height that fits every row of panels.
pub fn chart_height_px(majors: usize) -> u32 {
    TITLE_HEIGHT_PX + ROW_HEIGHT_PX * panel_rows(majors) as u32
}

/// Red-yellow-green, low scores in red.
const SCALE: [&str; 5] = ["#d73027", "#fc8d59", "#ffffbf", "#91cf60", "#1a9850"];

/// One heatmap chart per class with one panel per major; x is the
/// knowledge-point detail, y the main knowledge point.
pub fn class_options(heatmap: &KnowledgeHeatmap) -> Vec<Value> {
    let details: Vec<&str> = heatmap
        .cells
        .iter()
        .map(|c| c.knowledge_detail.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let mains: Vec<&str> = heatmap
        .cells
        .iter()
        .map(|c| c.knowledge_main.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let detail_idx: HashMap<&str, usize> = details.iter().enumerate().map(|(i, d)| (*d, i)).collect();
    let main_idx: HashMap<&str, usize> = mains.iter().enumerate().map(|(i, m)| (*m, i)).collect();

    let columns = heatmap.majors.len().clamp(1, PANELS_PER_ROW);
    let width = 100.0 / columns as f64;

    heatmap
        .classes
        .iter()
        .map(|class| {
            let mut grids = Vec::new();
            let mut x_axes = Vec::new();
            let mut y_axes = Vec::new();
            let mut series = Vec::new();

            for (m, major) in heatmap.majors.iter().enumerate() {
                let (row, col) = (m / PANELS_PER_ROW, m % PANELS_PER_ROW);
                grids.push(json!({
                    "left": format!("{:.2}%", col as f64 * width + 4.0),
                    "width": format!("{:.2}%", width - 6.0),
                    "top": TITLE_HEIGHT_PX + ROW_HEIGHT_PX * row as u32,
                    "height": GRID_HEIGHT_PX,
                }));
                x_axes.push(json!({
                    "type": "category",
                    "gridIndex": m,
                    "name": major,
                    "nameLocation": "middle",
                    "nameGap": 70,
                    "data": details,
                    "axisLabel": { "rotate": 45 },
                }));
                y_axes.push(json!({
                    "type": "category",
                    "gridIndex": m,
                    "data": mains,
                    "axisLabel": { "show": col == 0 },
                }));

                let data: Vec<Value> = heatmap
                    .cells
                    .iter()
                    .filter(|c| &c.class == class && &c.major == major)
                    .map(|c| {
                        json!([
                            detail_idx[c.knowledge_detail.as_str()],
                            main_idx[c.knowledge_main.as_str()],
                            c.score
                        ])
                    })
                    .collect();

                series.push(json!({
                    "type": "heatmap",
                    "name": major,
                    "xAxisIndex": m,
                    "yAxisIndex": m,
                    "data": data,
                }));
            }

            json!({
                "title": { "text": class },
                "tooltip": { "position": "top" },
                "grid": grids,
                "xAxis": x_axes,
                "yAxis": y_axes,
                "visualMap": {
                    "min": 0,
                    "max": heatmap.max_score,
                    "calculable": true,
                    "orient": "vertical",
                    "right": 0,
                    "top": "middle",
                    "text": ["Mean score", ""],
                    "inRange": { "color": SCALE },
                },
                "series": series,
            })
        })
        .collect()
}

pub fn render(heatmap: &KnowledgeHeatmap) -> String {
    let charts: Vec<Chart> = class_options(heatmap)
        .into_iter()
        .map(|option| Chart::new(option, chart_height_px(heatmap.majors.len())))
        .collect();

    let preamble = if charts.is_empty() {
        "<h1>Knowledge mastery by class and major</h1><p>No scored submissions matched the roster and problem metadata.</p>".to_string()
    } else {
        "<h1>Knowledge mastery by class and major</h1>".to_string()
    };

    html::render(
        &Page {
            title: "Knowledge mastery heatmap",
            preamble: Some(preamble),
            gl: false,
        },
        &charts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::HeatmapCell;

    fn cell(class: &str, major: &str, main: &str, detail: &str, score: f64) -> HeatmapCell {
        HeatmapCell {
            class: class.into(),
            major: major.into(),
            knowledge_main: main.into(),
            knowledge_detail: detail.into(),
            score,
        }
    }

    #[test]
    fn test_one_chart_per_class_one_panel_per_major() {
        let heatmap = KnowledgeHeatmap {
            cells: vec![
                cell("Class1", "J1", "m1", "d2", 2.0),
                cell("Class1", "J2", "m2", "d1", 1.0),
                cell("Class2", "J1", "m1", "d1", 3.0),
            ],
            classes: vec!["Class1".into(), "Class2".into()],
            majors: vec!["J1".into(), "J2".into()],
            max_score: 3.0,
        };

        let options = class_options(&heatmap);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0]["series"].as_array().unwrap().len(), 2);
        assert_eq!(options[0]["series"][0]["data"], json!([[1, 0, 2.0]]));
        assert_eq!(options[1]["series"][1]["data"], json!([]));
        assert_eq!(options[0]["visualMap"]["max"], json!(3.0));
    }

    #[test]
    fn test_many_majors_wrap_onto_rows() {
        let majors: Vec<String> = (0..17).map(|i| format!("J{i:05}")).collect();
        let heatmap = KnowledgeHeatmap {
            cells: vec![cell("Class1", "J00016", "m1", "d1", 2.0)],
            classes: vec!["Class1".into()],
            majors,
            max_score: 2.0,
        };

        let option = &class_options(&heatmap)[0];
        let grids = option["grid"].as_array().unwrap();
        assert_eq!(grids.len(), 17);
        for grid in grids {
            let width: f64 = grid["width"].as_str().unwrap().trim_end_matches('%').parse().unwrap();
            assert!(width > 0.0);
        }
        assert_eq!(grids[16]["left"], "4.00%");
        assert_eq!(grids[16]["top"], json!(60 + 260 * 4));
        assert_eq!(panel_rows(17), 5);
        assert_eq!(chart_height_px(17), 60 + 260 * 5);
        assert_eq!(chart_height_px(1), 320);
    }

    #[test]
    fn test_empty_heatmap_still_renders_page() {
        let heatmap = KnowledgeHeatmap {
            cells: vec![],
            classes: vec![],
            majors: vec![],
            max_score: 0.0,
        };
        let page = render(&heatmap);
        assert!(page.contains("No scored submissions"));
        assert!(!page.contains("echarts.init"));
    }
}
