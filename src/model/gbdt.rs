//! Gradient-boosted decision trees for binary classification.
//!
//! Trees are grown depth-first with exact greedy split search over
//! second-order gradient statistics of the logistic loss. For a node with
//! gradient sum `G` and hessian sum `H` the structure score is
//! `G² / (H + λ)`; a split is kept when
//! `score(L) + score(R) - score(parent)` exceeds `γ`. Leaf weights are
//! `-G / (H + λ)` shrunk by `eta`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ModelError;

/// Minimum loss reduction for a split to count as an improvement.
const RT_EPS: f64 = 1e-6;
const MIN_HESSIAN: f64 = 1e-16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GbdtParams {
    /// Shrinkage applied to every leaf weight.
    pub eta: f64,
    pub max_depth: usize,
    pub rounds: usize,
    /// L2 regularisation on leaf weights.
    pub lambda: f64,
    /// Minimum loss reduction required to split.
    pub gamma: f64,
    pub min_child_weight: f64,
    /// Initial probability shared by every row.
    pub base_score: f64,
}

impl Default for GbdtParams {
    fn default() -> Self {
        Self {
            eta: 0.1,
            max_depth: 4,
            rounds: 100,
            lambda: 1.0,
            gamma: 0.0,
            min_child_weight: 1.0,
            base_score: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Rows with `x[feature] < threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        gain: f64,
        cover: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
        cover: f64,
    },
}

/// A single regression tree; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { value, .. } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    id = if row[*feature] < *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(tree: &Tree, id: usize) -> usize {
            match tree.node(id) {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(tree, *left).max(walk(tree, *right)),
            }
        }
        walk(self, 0)
    }
}

/// How [`Booster::feature_importance`] scores a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportanceType {
    /// Average loss reduction of the splits using the feature.
    Gain,
    /// Number of splits using the feature.
    Weight,
    /// Average hessian cover of the splits using the feature.
    Cover,
}

/// A trained ensemble.
#[derive(Debug, Clone, Serialize)]
pub struct Booster {
    feature_names: Vec<String>,
    base_margin: f64,
    trees: Vec<Tree>,
}

impl Booster {
    /// Fits `params.rounds` trees to binary labels (`0` or `1`).
    pub fn train(
        rows: &[Vec<f64>],
        labels: &[u8],
        feature_names: &[&str],
        params: &GbdtParams,
    ) -> Result<Self, ModelError> {
        if rows.len() < 2 {
            return Err(ModelError::TooFewRows(rows.len()));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != feature_names.len() {
                return Err(ModelError::RaggedFeatures {
                    row: i,
                    got: row.len(),
                    expected: feature_names.len(),
                });
            }
        }
        let positives = labels.iter().filter(|&&y| y == 1).count();
        if positives == 0 || positives == labels.len() {
            return Err(ModelError::SingleClass(labels.first().copied().unwrap_or(0)));
        }

        let base_margin = logit(params.base_score);
        let mut margins = vec![base_margin; rows.len()];
        let mut trees = Vec::with_capacity(params.rounds);

        for round in 0..params.rounds {
            let (grad, hess): (Vec<f64>, Vec<f64>) = margins
                .iter()
                .zip(labels)
                .map(|(m, y)| {
                    let p = sigmoid(*m);
                    (p - f64::from(*y), (p * (1.0 - p)).max(MIN_HESSIAN))
                })
                .unzip();

            let tree = TreeBuilder {
                rows,
                grad: &grad,
                hess: &hess,
                params,
                nodes: Vec::new(),
            }
            .build();

            for (margin, row) in margins.iter_mut().zip(rows) {
                *margin += tree.predict(row);
            }

            debug!(
                round,
                nodes = tree.nodes.len(),
                depth = tree.depth(),
                "Boosting round complete"
            );
            trees.push(tree);
        }

        Ok(Self {
            feature_names: feature_names.iter().map(|s| s.to_string()).collect(),
            base_margin,
            trees,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn tree(&self, index: usize) -> Option<&Tree> {
        self.trees.get(index)
    }

    pub fn predict_margin(&self, row: &[f64]) -> f64 {
        self.base_margin + self.trees.iter().map(|t| t.predict(row)).sum::<f64>()
    }

    /// Probability of the positive class.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        sigmoid(self.predict_margin(row))
    }

    /// Class prediction at the 0.5 threshold.
    pub fn predict(&self, row: &[f64]) -> u8 {
        u8::from(self.predict_proba(row) > 0.5)
    }

    /// Per-feature importance, sorted descending. Features that are never
    /// split on are omitted.
    pub fn feature_importance(&self, kind: ImportanceType) -> Vec<(String, f64)> {
        let mut totals: BTreeMap<usize, (f64, f64, usize)> = BTreeMap::new();

        for tree in &self.trees {
            for node in tree.nodes() {
                if let Node::Split {
                    feature,
                    gain,
                    cover,
                    ..
                } = node
                {
                    let entry = totals.entry(*feature).or_insert((0.0, 0.0, 0));
                    entry.0 += gain;
                    entry.1 += cover;
                    entry.2 += 1;
                }
            }
        }

        let mut scores: Vec<(String, f64)> = totals
            .into_iter()
            .map(|(feature, (gain, cover, count))| {
                let score = match kind {
                    ImportanceType::Gain => gain / count as f64,
                    ImportanceType::Cover => cover / count as f64,
                    ImportanceType::Weight => count as f64,
                };
                (self.feature_names[feature].clone(), score)
            })
            .collect();

        scores.sort_by(|a, b| b.1.total_cmp(&a.1));
        scores
    }
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn logit(p: f64) -> f64 {
    let p = p.clamp(1e-7, 1.0 - 1e-7);
    (p / (1.0 - p)).ln()
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct TreeBuilder<'a> {
    rows: &'a [Vec<f64>],
    grad: &'a [f64],
    hess: &'a [f64],
    params: &'a GbdtParams,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn build(mut self) -> Tree {
        let all: Vec<usize> = (0..self.rows.len()).collect();
        self.grow(all, 0);
        Tree { nodes: self.nodes }
    }

    fn score(&self, g: f64, h: f64) -> f64 {
        g * g / (h + self.params.lambda)
    }

    fn grow(&mut self, members: Vec<usize>, depth: usize) -> usize {
        let g: f64 = members.iter().map(|&i| self.grad[i]).sum();
        let h: f64 = members.iter().map(|&i| self.hess[i]).sum();

        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: -g / (h + self.params.lambda) * self.params.eta,
            cover: h,
        });

        if depth >= self.params.max_depth {
            return id;
        }
        let Some(best) = self.best_split(&members, g, h) else {
            return id;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = members
            .into_iter()
            .partition(|&i| self.rows[i][best.feature] < best.threshold);

        let left = self.grow(left_rows, depth + 1);
        let right = self.grow(right_rows, depth + 1);
        self.nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            gain: best.gain,
            cover: h,
            left,
            right,
        };
        id
    }

    fn best_split(&self, members: &[usize], g: f64, h: f64) -> Option<BestSplit> {
        let parent = self.score(g, h);
        let width = self.rows.first().map_or(0, Vec::len);
        let mut best: Option<BestSplit> = None;

        for feature in 0..width {
            let mut order = members.to_vec();
            order.sort_by(|&a, &b| self.rows[a][feature].total_cmp(&self.rows[b][feature]));

            let (mut gl, mut hl) = (0.0, 0.0);
            for pair in order.windows(2) {
                let (cur, next) = (pair[0], pair[1]);
                gl += self.grad[cur];
                hl += self.hess[cur];

                let (v, v_next) = (self.rows[cur][feature], self.rows[next][feature]);
                if v == v_next {
                    continue;
                }
                let (gr, hr) = (g - gl, h - hl);
                if hl < self.params.min_child_weight || hr < self.params.min_child_weight {
                    continue;
                }

                let gain = self.score(gl, hl) + self.score(gr, hr) - parent;
                if gain <= self.params.gamma || gain < RT_EPS {
                    continue;
                }
                if best.as_ref().is_none_or(|b| gain > b.gain) {
                    best = Some(BestSplit {
                        feature,
                        threshold: (v + v_next) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }
}
