use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;

use crate::graph::{GraphId, GraphInstance};
use crate::matrix::SymmetricMatrix;
use crate::pipeline::embedding::{EmbeddingConfig, EmbeddingResult, SpectralEmbedding};
use crate::spectral::{spectral_distance, EigenResult, SpectralProfile};

/// Caller-owned handle that computes each stage of the pipeline at most once.
///
/// Stages are shared as `Arc`s so a renderer can keep the previous result
/// while a mutated graph is analysed through a fresh handle.
pub struct SpectralGraph {
    node_ids: Vec<GraphId>,
    adjacency: Arc<SymmetricMatrix>,
    embedding: SpectralEmbedding,
    laplacian: OnceCell<Arc<SymmetricMatrix>>,
    eigen: OnceCell<Arc<EigenResult>>,
    profile: OnceCell<Arc<SpectralProfile>>,
    coordinates: OnceCell<Arc<EmbeddingResult>>,
}

impl SpectralGraph {
    pub fn new(adjacency: SymmetricMatrix, config: EmbeddingConfig) -> Self {
        let node_ids = (0..adjacency.size()).map(|i| i.to_string()).collect();
        Self::with_node_ids(adjacency, node_ids, config)
    }

    pub fn from_graph(graph: &GraphInstance, config: EmbeddingConfig) -> Result<Self> {
        let adjacency = graph
            .adjacency_matrix()
            .context("derive adjacency matrix from graph")?;
        Ok(Self::with_node_ids(adjacency, graph.node_ids(), config))
    }

    fn with_node_ids(
        adjacency: SymmetricMatrix,
        node_ids: Vec<GraphId>,
        config: EmbeddingConfig,
    ) -> Self {
        Self {
            node_ids,
            adjacency: Arc::new(adjacency),
            embedding: SpectralEmbedding::new(config),
            laplacian: OnceCell::new(),
            eigen: OnceCell::new(),
            profile: OnceCell::new(),
            coordinates: OnceCell::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.size()
    }

    pub fn node_ids(&self) -> &[GraphId] {
        &self.node_ids
    }

    /// Row of `id` in the adjacency matrix and in the embedding.
    pub fn node_row(&self, id: &str) -> Option<usize> {
        self.node_ids.iter().position(|node| node == id)
    }

    /// Embedded coordinates of node `id`, or `None` for an unknown id.
    pub fn point_of(&self, id: &str) -> Result<Option<Vec<f64>>> {
        let Some(row) = self.node_row(id) else {
            return Ok(None);
        };
        let embedding = self.embedding()?;
        Ok(Some(embedding.point(row).to_vec()))
    }

    /// RMS eigenvalue shift from `self` to `other`, e.g. across one edge toggle.
    pub fn spectral_drift(&self, other: &SpectralGraph) -> Result<f64> {
        let before = self.profile()?;
        let after = other.profile().context("profile compared graph")?;
        Ok(spectral_distance(&before, &after))
    }

    pub fn adjacency(&self) -> Arc<SymmetricMatrix> {
        Arc::clone(&self.adjacency)
    }

    pub fn config(&self) -> &EmbeddingConfig {
        self.embedding.config()
    }

    pub fn laplacian(&self) -> Result<Arc<SymmetricMatrix>> {
        self.laplacian
            .get_or_try_init(|| {
                self.embedding
                    .laplacian(&self.adjacency)
                    .map(Arc::new)
                    .context("build graph laplacian")
            })
            .map(Arc::clone)
    }

    pub fn eigen(&self) -> Result<Arc<EigenResult>> {
        self.eigen
            .get_or_try_init(|| {
                let laplacian = self.laplacian()?;
                Ok(Arc::new(self.embedding.decompose(&laplacian)))
            })
            .map(Arc::clone)
    }

    pub fn profile(&self) -> Result<Arc<SpectralProfile>> {
        self.profile
            .get_or_try_init(|| {
                let eigen = self.eigen()?;
                Ok(Arc::new(SpectralProfile::from_eigen(&eigen)))
            })
            .map(Arc::clone)
    }

    pub fn embedding(&self) -> Result<Arc<EmbeddingResult>> {
        self.coordinates
            .get_or_try_init(|| {
                let eigen = self.eigen()?;
                Ok(Arc::new(self.embedding.project(&eigen)))
            })
            .map(Arc::clone)
    }
}

impl fmt::Debug for SpectralGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralGraph")
            .field("nodes", &self.node_count())
            .field("laplacian_ready", &self.laplacian.get().is_some())
            .field("eigen_ready", &self.eigen.get().is_some())
            .field("embedding_ready", &self.coordinates.get().is_some())
            .finish()
    }
}
