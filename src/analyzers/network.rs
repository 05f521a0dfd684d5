use std::collections::{HashMap, HashSet};

use crate::analyzers::types::{GraphEdge, GraphNode, KnowledgeGraph, NodeCategory};
use crate::loader::DataSet;

const KNOWLEDGE_NODE_SIZE: f64 = 20.0;

/// Problem nodes grow with their submission count: 10 for unattempted
/// problems, otherwise `10 + count / 10` capped at 30.
pub fn problem_node_size(submissions: usize) -> f64 {
    if submissions == 0 {
        10.0
    } else {
        (10.0 + submissions as f64 / 10.0).min(30.0)
    }
}

/// Bipartite graph linking each problem to the knowledge points it covers.
///
/// Nodes keep first-seen order; each problem/knowledge pair produces an edge
/// weighted by the problem's submission count.
pub fn knowledge_graph(data: &DataSet) -> KnowledgeGraph {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in &data.submissions {
        *counts.entry(record.title_id.as_str()).or_default() += 1;
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for title in &data.titles {
        let count = counts.get(title.title_id.as_str()).copied().unwrap_or(0);

        if seen.insert(title.title_id.clone()) {
            nodes.push(GraphNode {
                id: title.title_id.clone(),
                name: format!("Problem {}", title.title_id),
                category: NodeCategory::Problem,
                symbol_size: problem_node_size(count),
            });
        }

        for point in title.knowledge_points() {
            if seen.insert(point.to_string()) {
                nodes.push(GraphNode {
                    id: point.to_string(),
                    name: format!("Knowledge {point}"),
                    category: NodeCategory::Knowledge,
                    symbol_size: KNOWLEDGE_NODE_SIZE,
                });
            }
            edges.push(GraphEdge {
                source: title.title_id.clone(),
                target: point.to_string(),
                value: count,
            });
        }
    }

    KnowledgeGraph { nodes, edges }
}
