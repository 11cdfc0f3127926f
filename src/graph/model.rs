use anyhow::Result;
use indexmap::IndexMap;
use nalgebra::DMatrix;
use petgraph::{graph::Graph, prelude::NodeIndex, visit::EdgeRef};
use serde::{Deserialize, Serialize};

use crate::matrix::{SymmetricMatrix, SymmetryPolicy};

pub type GraphId = String;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct NodeAttributes {
    pub label: Option<String>,
    pub weight: Option<f64>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EdgeAttributes {
    pub weight: Option<f64>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl EdgeAttributes {
    pub fn weighted(weight: f64) -> Self {
        Self {
            weight: Some(weight),
            extra: IndexMap::new(),
        }
    }

    /// Missing weights count as 1; negative weights are clamped to 0.
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(1.0).max(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGraph {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
    #[serde(default)]
    pub graph_attributes: IndexMap<String, serde_json::Value>,
    #[serde(default)]
    pub directed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub id: GraphId,
    #[serde(default)]
    pub attributes: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEdge {
    pub source: GraphId,
    pub target: GraphId,
    #[serde(default)]
    pub attributes: IndexMap<String, serde_json::Value>,
}

pub type LabeledGraph = Graph<NodeAttributes, EdgeAttributes>;

/// In-memory graph. Undirected graphs store every edge in both directions.
#[derive(Debug, Clone)]
pub struct GraphInstance {
    pub graph: LabeledGraph,
    pub node_lookup: IndexMap<GraphId, NodeIndex>,
    pub reverse_lookup: IndexMap<NodeIndex, GraphId>,
    pub graph_attributes: IndexMap<String, serde_json::Value>,
    pub directed: bool,
}

impl GraphInstance {
    /// Undirected graph with one node per row and an edge for every positive
    /// upper-triangle weight. `labels` provides node ids; missing ids fall back
    /// to the row index.
    pub fn from_adjacency(adjacency: &SymmetricMatrix, labels: &[String]) -> Self {
        let n = adjacency.size();
        let mut graph = LabeledGraph::with_capacity(n, n * n);
        let mut node_lookup = IndexMap::new();
        let mut reverse_lookup = IndexMap::new();

        for i in 0..n {
            let id = labels.get(i).cloned().unwrap_or_else(|| i.to_string());
            let idx = graph.add_node(NodeAttributes {
                label: Some(id.clone()),
                weight: None,
                extra: IndexMap::new(),
            });
            node_lookup.insert(id.clone(), idx);
            reverse_lookup.insert(idx, id);
        }

        let indices: Vec<NodeIndex> = graph.node_indices().collect();
        for i in 0..n {
            for j in (i + 1)..n {
                let weight = adjacency[(i, j)];
                if weight > 0.0 {
                    let edge = EdgeAttributes::weighted(weight);
                    graph.add_edge(indices[i], indices[j], edge.clone());
                    graph.add_edge(indices[j], indices[i], edge);
                }
            }
        }

        Self {
            graph,
            node_lookup,
            reverse_lookup,
            graph_attributes: IndexMap::new(),
            directed: false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node ids in row order of [`GraphInstance::adjacency_matrix`].
    pub fn node_ids(&self) -> Vec<GraphId> {
        self.graph
            .node_indices()
            .map(|idx| {
                self.reverse_lookup
                    .get(&idx)
                    .cloned()
                    .unwrap_or_else(|| idx.index().to_string())
            })
            .collect()
    }

    /// Weighted adjacency matrix; parallel edges add up and self-loops are kept
    /// on the diagonal. Directed graphs are symmetrised by averaging `A` and `Aᵗ`.
    pub fn adjacency_matrix(&self) -> Result<SymmetricMatrix> {
        let n = self.node_count();
        let mut index_map = IndexMap::new();
        for (row, node) in self.graph.node_indices().enumerate() {
            index_map.insert(node, row);
        }

        let mut adjacency = DMatrix::zeros(n, n);
        for edge in self.graph.edge_references() {
            let (Some(&row), Some(&col)) =
                (index_map.get(&edge.source()), index_map.get(&edge.target()))
            else {
                continue;
            };
            adjacency[(row, col)] += edge.weight().effective_weight();
        }

        let policy = if self.directed {
            SymmetryPolicy::Symmetrize
        } else {
            SymmetryPolicy::default()
        };
        Ok(SymmetricMatrix::with_policy(adjacency, policy)?)
    }
}
