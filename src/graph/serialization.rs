use petgraph::visit::EdgeRef;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use indexmap::IndexMap;
use serde_json::Value;

use crate::graph::model::{
    EdgeAttributes, GraphInstance, NodeAttributes, RawEdge, RawGraph, RawNode,
};

/// Writes graphs back out in the format [`GraphLoader`](crate::graph::GraphLoader) reads.
pub struct GraphWriter;

impl GraphWriter {
    pub fn to_raw_graph(graph: &GraphInstance) -> RawGraph {
        let mut nodes = Vec::with_capacity(graph.node_count());
        for (id, idx) in &graph.node_lookup {
            let Some(node) = graph.graph.node_weight(*idx) else {
                continue;
            };
            nodes.push(RawNode {
                id: id.clone(),
                attributes: build_node_attributes(node),
            });
        }

        let mut edges = Vec::new();
        for edge_ref in graph.graph.edge_references() {
            let (Some(source), Some(target)) = (
                graph.reverse_lookup.get(&edge_ref.source()).cloned(),
                graph.reverse_lookup.get(&edge_ref.target()).cloned(),
            ) else {
                continue;
            };
            // Undirected edges are stored twice; emit only the copy whose
            // source precedes its target in node order.
            if !graph.directed && edge_ref.source().index() > edge_ref.target().index() {
                continue;
            }
            edges.push(RawEdge {
                source,
                target,
                attributes: build_edge_attributes(edge_ref.weight()),
            });
        }

        RawGraph {
            nodes,
            edges,
            graph_attributes: graph.graph_attributes.clone(),
            directed: graph.directed,
        }
    }

    pub fn to_json_string(graph: &GraphInstance) -> Result<String> {
        let raw = Self::to_raw_graph(graph);
        Ok(serde_json::to_string_pretty(&raw)?)
    }

    pub fn write_to_path(graph: &GraphInstance, path: &Path) -> Result<()> {
        let json = Self::to_json_string(graph)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

fn build_node_attributes(node: &NodeAttributes) -> IndexMap<String, Value> {
    let mut map = IndexMap::new();
    if let Some(label) = &node.label {
        map.insert("label".to_string(), Value::String(label.clone()));
    }
    if let Some(weight) = node.weight {
        if let Some(number) = serde_json::Number::from_f64(weight) {
            map.insert("weight".to_string(), Value::Number(number));
        }
    }
    for (key, value) in &node.extra {
        map.insert(key.clone(), value.clone());
    }
    map
}

fn build_edge_attributes(edge: &EdgeAttributes) -> IndexMap<String, Value> {
    let mut map = IndexMap::new();
    if let Some(weight) = edge.weight {
        if let Some(number) = serde_json::Number::from_f64(weight) {
            map.insert("weight".to_string(), Value::Number(number));
        }
    }
    for (key, value) in &edge.extra {
        map.insert(key.clone(), value.clone());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphLoader;
    use crate::matrix::SymmetricMatrix;

    #[test]
    fn written_graph_loads_back_with_same_adjacency() {
        let adjacency = SymmetricMatrix::from_rows(&[
            vec![0.0, 2.0, 0.0],
            vec![2.0, 0.0, 0.5],
            vec![0.0, 0.5, 0.0],
        ])
        .expect("adjacency");
        let labels = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        let graph = GraphInstance::from_adjacency(&adjacency, &labels);

        let raw = GraphWriter::to_raw_graph(&graph);
        assert_eq!(raw.nodes.len(), 3);
        assert_eq!(raw.edges.len(), 2, "undirected edges are written once");

        let json = GraphWriter::to_json_string(&graph).expect("serialize");
        let reloaded = GraphLoader::from_json_str(&json).expect("reload");
        assert_eq!(reloaded.adjacency_matrix().expect("adjacency"), adjacency);
        assert_eq!(reloaded.node_ids(), labels);
    }
}
