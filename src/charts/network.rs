use serde_json::{Value, json};

use crate::analyzers::types::KnowledgeGraph;
use crate::charts::html::{self, Chart, Page};

pub fn option(graph: &KnowledgeGraph) -> Value {
    let nodes: Vec<Value> = graph
        .nodes
        .iter()
        .map(|n| {
            json!({
                "id": n.id,
                "name": n.name,
                "category": n.category as usize,
                "symbolSize": n.symbol_size,
            })
        })
        .collect();

    let links: Vec<Value> = graph
        .edges
        .iter()
        .map(|e| json!({ "source": e.source, "target": e.target, "value": e.value }))
        .collect();

    json!({
        "title": { "text": "Problem and knowledge point network" },
        "tooltip": {},
        "legend": { "data": ["Problem", "Knowledge point"] },
        "series": [{
            "type": "graph",
            "layout": "force",
            "roam": true,
            "draggable": true,
            "categories": [{ "name": "Problem" }, { "name": "Knowledge point" }],
            "data": nodes,
            "links": links,
            "force": { "repulsion": 800, "edgeLength": [10, 50] },
            "label": { "show": true, "position": "right" },
        }],
    })
}

pub fn render(graph: &KnowledgeGraph) -> String {
    html::render(
        &Page {
            title: "Knowledge network",
            ..Page::default()
        },
        &[Chart::new(option(graph), 800)],
    )
}
