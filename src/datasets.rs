use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nalgebra::DMatrix;

use crate::graph::{GraphInstance, GraphLoader};
use crate::matrix::SymmetricMatrix;

const DEFAULT_ROOT: &str = "datasets";

pub const GENE_LABELS: [&str; 8] = ["TP53", "BRCA1", "MYC", "EGFR", "KRAS", "PTEN", "RB1", "AKT1"];

const GENE_EDGES: [(usize, usize); 13] = [
    (0, 1),
    (0, 2),
    (0, 7),
    (1, 2),
    (1, 3),
    (2, 3),
    (2, 4),
    (3, 4),
    (4, 5),
    (4, 6),
    (5, 6),
    (5, 7),
    (6, 7),
];

/// Resolves JSON graph files relative to a dataset root.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    root: PathBuf,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl DatasetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load(&self, relative: impl AsRef<Path>) -> Result<GraphInstance> {
        let path = self.root.join(relative);
        GraphLoader::from_path(&path).with_context(|| format!("load dataset from {:?}", path))
    }
}

fn from_edges(n: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> SymmetricMatrix {
    let mut adjacency = DMatrix::zeros(n, n);
    for (i, j) in edges {
        adjacency[(i, j)] = 1.0;
        adjacency[(j, i)] = 1.0;
    }
    SymmetricMatrix::from_symmetric_unchecked(adjacency)
}

/// Eight-gene interaction network (two loosely joined clusters).
pub fn gene_network() -> SymmetricMatrix {
    from_edges(GENE_LABELS.len(), GENE_EDGES)
}

pub fn gene_labels() -> Vec<String> {
    GENE_LABELS.iter().map(|label| label.to_string()).collect()
}

/// Cycle `0 - 1 - … - (n-1) - 0`. Orders below 3 give a path or a single node.
pub fn cycle(n: usize) -> SymmetricMatrix {
    let edges: Vec<(usize, usize)> = match n {
        0 | 1 => Vec::new(),
        2 => vec![(0, 1)],
        _ => (0..n).map(|i| (i, (i + 1) % n)).collect(),
    };
    from_edges(n, edges)
}

/// `count` disjoint complete graphs of `size` nodes each.
pub fn disjoint_cliques(count: usize, size: usize) -> SymmetricMatrix {
    let edges = (0..count).flat_map(|block| {
        let offset = block * size;
        (0..size).flat_map(move |i| ((i + 1)..size).map(move |j| (offset + i, offset + j)))
    });
    from_edges(count * size, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::edge_count;

    #[test]
    fn gene_network_shape() {
        let adjacency = gene_network();
        assert_eq!(adjacency.size(), 8);
        assert_eq!(edge_count(&adjacency), 13);
        assert_eq!(adjacency[(7, 0)], 1.0);
        assert_eq!(gene_labels()[4], "KRAS");
    }

    #[test]
    fn cycle_degrees_are_two() {
        let adjacency = cycle(8);
        assert!(adjacency.row_sums().iter().all(|d| *d == 2.0));
        assert_eq!(edge_count(&cycle(2)), 1);
        assert_eq!(cycle(0).size(), 0);
    }

    #[test]
    fn disjoint_cliques_have_no_cross_edges() {
        let adjacency = disjoint_cliques(2, 3);
        assert_eq!(edge_count(&adjacency), 6);
        assert_eq!(adjacency[(2, 3)], 0.0);
        assert_eq!(adjacency[(3, 5)], 1.0);
    }

    #[test]
    fn loader_reports_missing_files() {
        let loader = DatasetLoader::new("definitely/not/here");
        let err = loader.load("graph.json").unwrap_err();
        assert!(format!("{err:#}").contains("graph.json"));
    }
}
