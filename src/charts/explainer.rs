use serde_json::{Value, json};

use crate::analyzers::explainer::MasteryModel;
use crate::charts::html::{self, Chart, Page};
use crate::model::{Node, Tree};

const BAR_COLORS: [&str; 7] = [
    "#c23531", "#2f4554", "#61a0a8", "#d48265", "#91c7ae", "#749f83", "#ca8622",
];

/// Gain importance as a bar per feature, each in its own colour.
pub fn importance_option(importance: &[(String, f64)]) -> Value {
    let names: Vec<&str> = importance.iter().map(|(n, _)| n.as_str()).collect();
    let bars: Vec<Value> = importance
        .iter()
        .enumerate()
        .map(|(i, (name, value))| {
            json!({
                "name": name,
                "value": value,
                "itemStyle": { "color": BAR_COLORS[i % BAR_COLORS.len()] },
            })
        })
        .collect();

    json!({
        "title": { "text": "Feature importance (gain)" },
        "tooltip": {},
        "xAxis": { "type": "category", "data": names, "axisLabel": { "rotate": 20 } },
        "yAxis": { "type": "value", "name": "Importance" },
        "series": [{ "type": "bar", "name": "Feature Importance", "data": bars }],
    })
}

/// Nested `{name, children}` form of a tree for the ECharts tree series.
pub fn tree_to_nested(tree: &Tree, feature_names: &[String]) -> Value {
    fn walk(tree: &Tree, id: usize, names: &[String]) -> Value {
        match tree.node(id) {
            Node::Leaf { value, cover } => json!({
                "name": format!("leaf={value:.4}"),
                "value": cover,
            }),
            Node::Split {
                feature,
                threshold,
                cover,
                left,
                right,
                ..
            } => {
                let feature = names.get(*feature).map_or("?", String::as_str);
                json!({
                    "name": format!("{feature}<{threshold:.4}"),
                    "value": cover,
                    "children": [walk(tree, *left, names), walk(tree, *right, names)],
                })
            }
        }
    }
    walk(tree, 0, feature_names)
}

pub fn tree_option(tree: &Tree, feature_names: &[String]) -> Value {
    json!({
        "title": { "text": "Tree 0 (left branch: yes)" },
        "tooltip": { "trigger": "item" },
        "series": [{
            "type": "tree",
            "data": [tree_to_nested(tree, feature_names)],
            "orient": "TB",
            "initialTreeDepth": -1,
            "symbolSize": 8,
            "label": { "position": "top", "fontSize": 11 },
            "leaves": { "label": { "position": "bottom" } },
        }],
    })
}

pub fn render(model: &MasteryModel) -> String {
    let mut charts = vec![Chart::new(importance_option(&model.importance), 400)];
    if let Some(tree) = model.booster.tree(0) {
        charts.push(Chart::new(tree_option(tree, model.booster.feature_names()), 600));
    }

    let preamble = format!(
        "<h1>Mastery model</h1><p>Held-out accuracy: {:.2}% ({} train / {} test students, {} trees)</p>",
        model.test_accuracy * 100.0,
        model.train_rows,
        model.test_rows,
        model.booster.trees().len()
    );

    html::render(
        &Page {
            title: "Mastery model",
            preamble: Some(preamble),
            gl: false,
        },
        &charts,
    )
}
