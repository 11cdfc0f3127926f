use anyhow::{anyhow, Result};
use indexmap::IndexSet;
use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::graph::GraphInstance;
use crate::matrix::SymmetricMatrix;

/// Planted-partition parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub community_sizes: Vec<usize>,
    pub p_intra: f64,
    pub p_inter: f64,
    pub seed: Option<u64>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            community_sizes: vec![8, 8, 8],
            p_intra: 0.55,
            p_inter: 0.06,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Member,
    /// Has neighbours in more than one community.
    Bridge,
}

#[derive(Debug, Clone)]
pub struct CommunityGraph {
    pub adjacency: SymmetricMatrix,
    pub communities: Vec<usize>,
    pub roles: Vec<NodeRole>,
    pub seed: u64,
}

impl CommunityGraph {
    pub fn node_count(&self) -> usize {
        self.adjacency.size()
    }

    pub fn node_ids(&self) -> Vec<String> {
        (0..self.node_count()).map(|i| format!("n{i}")).collect()
    }

    /// Graph form with `community` and `role` node attributes, ready for
    /// [`GraphWriter`](crate::graph::GraphWriter).
    pub fn to_graph_instance(&self) -> GraphInstance {
        let mut instance = GraphInstance::from_adjacency(&self.adjacency, &self.node_ids());
        let indices: Vec<_> = instance.graph.node_indices().collect();
        for (row, idx) in indices.into_iter().enumerate() {
            if let Some(node) = instance.graph.node_weight_mut(idx) {
                node.extra
                    .insert("community".to_string(), self.communities[row].into());
                let role = match self.roles[row] {
                    NodeRole::Member => "member",
                    NodeRole::Bridge => "bridge",
                };
                node.extra.insert("role".to_string(), role.into());
            }
        }
        instance
            .graph_attributes
            .insert("seed".to_string(), self.seed.into());
        instance
    }
}

pub struct CommunitySampler;

impl CommunitySampler {
    pub fn sample(config: &SampleConfig) -> Result<CommunityGraph> {
        if config.community_sizes.is_empty() || config.community_sizes.iter().all(|s| *s == 0) {
            return Err(anyhow!("At least one non-empty community is required"));
        }
        for (name, p) in [("p_intra", config.p_intra), ("p_inter", config.p_inter)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(anyhow!("{} must lie in [0, 1], got {}", name, p));
            }
        }

        let communities: Vec<usize> = config
            .community_sizes
            .iter()
            .enumerate()
            .flat_map(|(community, size)| std::iter::repeat(community).take(*size))
            .collect();
        let n = communities.len();
        let seed = config.seed.unwrap_or_else(random_seed);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

        let mut adjacency = DMatrix::zeros(n, n);
        for i in 0..n {
            for j in (i + 1)..n {
                let p = if communities[i] == communities[j] {
                    config.p_intra
                } else {
                    config.p_inter
                };
                if rng.gen::<f64>() < p {
                    adjacency[(i, j)] = 1.0;
                    adjacency[(j, i)] = 1.0;
                }
            }
        }

        // Link every isolated node to the first other member of its community.
        for i in 0..n {
            let degree: f64 = adjacency.row(i).iter().sum();
            if degree > 0.0 {
                continue;
            }
            if let Some(j) = (0..n).find(|&j| j != i && communities[j] == communities[i]) {
                adjacency[(i, j)] = 1.0;
                adjacency[(j, i)] = 1.0;
            }
        }

        let roles = (0..n)
            .map(|i| {
                let neighbour_communities: IndexSet<usize> = (0..n)
                    .filter(|&j| adjacency[(i, j)] > 0.0)
                    .map(|j| communities[j])
                    .collect();
                if neighbour_communities.len() > 1 {
                    NodeRole::Bridge
                } else {
                    NodeRole::Member
                }
            })
            .collect();

        Ok(CommunityGraph {
            adjacency: SymmetricMatrix::from_symmetric_unchecked(adjacency),
            communities,
            roles,
            seed,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleConfig {
    /// Removals are refused while the graph has this many edges or fewer.
    pub min_edges: usize,
    pub seed: Option<u64>,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            min_edges: 8,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Added { source: usize, target: usize },
    Removed { source: usize, target: usize },
    SameNode { node: usize },
    AtMinimum { source: usize, target: usize },
    /// An endpoint is not a node of the graph.
    OutOfRange { source: usize, target: usize },
    /// The graph has fewer than two nodes.
    TooSmall,
}

impl ToggleOutcome {
    pub fn changed(&self) -> bool {
        matches!(
            self,
            ToggleOutcome::Added { .. } | ToggleOutcome::Removed { .. }
        )
    }
}

/// Seeded source of single-edge mutations. Each call returns a new adjacency
/// matrix; the input is never modified.
pub struct EdgeToggler {
    rng: Xoshiro256PlusPlus,
    min_edges: usize,
}

impl EdgeToggler {
    pub fn new(config: ToggleConfig) -> Self {
        let seed = config.seed.unwrap_or_else(random_seed);
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            min_edges: config.min_edges,
        }
    }

    pub fn toggle_random(
        &mut self,
        adjacency: &SymmetricMatrix,
    ) -> (SymmetricMatrix, ToggleOutcome) {
        let n = adjacency.size();
        if n < 2 {
            return (adjacency.clone(), ToggleOutcome::TooSmall);
        }
        let source = self.rng.gen_range(0..n);
        let target = self.rng.gen_range(0..n);
        toggle_edge(adjacency, source, target, self.min_edges)
    }
}

/// Flip the undirected edge `(source, target)` between absent and weight 1.
pub fn toggle_edge(
    adjacency: &SymmetricMatrix,
    source: usize,
    target: usize,
    min_edges: usize,
) -> (SymmetricMatrix, ToggleOutcome) {
    let n = adjacency.size();
    if source >= n || target >= n {
        return (
            adjacency.clone(),
            ToggleOutcome::OutOfRange { source, target },
        );
    }
    if source == target {
        return (adjacency.clone(), ToggleOutcome::SameNode { node: source });
    }

    let present = adjacency[(source, target)] != 0.0;
    if present && edge_count(adjacency) <= min_edges {
        return (
            adjacency.clone(),
            ToggleOutcome::AtMinimum { source, target },
        );
    }

    let mut next = adjacency.as_matrix().clone();
    let weight = if present { 0.0 } else { 1.0 };
    next[(source, target)] = weight;
    next[(target, source)] = weight;
    let outcome = if present {
        ToggleOutcome::Removed { source, target }
    } else {
        ToggleOutcome::Added { source, target }
    };
    (SymmetricMatrix::from_symmetric_unchecked(next), outcome)
}

/// Number of non-zero strict upper-triangle entries.
pub fn edge_count(adjacency: &SymmetricMatrix) -> usize {
    let n = adjacency.size();
    (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .filter(|&(i, j)| adjacency[(i, j)] != 0.0)
        .count()
}

fn random_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
