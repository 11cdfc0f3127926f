use log::{debug, warn};
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matrix::SymmetricMatrix;
use crate::spectral::{
    EigenResult, JacobiConfig, JacobiSolver, LaplacianBuilder, LaplacianKind, SpectralProfile,
    DEFAULT_ZERO_TOLERANCE,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub dims: usize,
    /// Start at eigenvector 1 instead of 0, dropping the constant vector of a connected graph.
    pub skip_trivial: bool,
    pub scale: f64,
    pub laplacian: LaplacianKind,
    pub jacobi: JacobiConfig,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dims: 3,
            skip_trivial: true,
            scale: 1.0,
            laplacian: LaplacianKind::Combinatorial,
            jacobi: JacobiConfig::default(),
        }
    }
}

/// Per-node coordinates drawn from Laplacian eigenvectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResult {
    /// Row `i` holds the coordinates of node `i`; one column per axis.
    pub coordinates: Array2<f64>,
    /// Eigenvector index backing each axis.
    pub axes: Vec<usize>,
    pub axis_eigenvalues: Vec<f64>,
    pub profile: SpectralProfile,
    pub converged: bool,
    pub residual: f64,
}

impl EmbeddingResult {
    pub fn node_count(&self) -> usize {
        self.coordinates.nrows()
    }

    pub fn dims(&self) -> usize {
        self.coordinates.ncols()
    }

    pub fn point(&self, node: usize) -> ArrayView1<'_, f64> {
        self.coordinates.row(node)
    }

    pub fn points(&self) -> Vec<Vec<f64>> {
        self.coordinates
            .rows()
            .into_iter()
            .map(|row| row.to_vec())
            .collect()
    }
}

pub struct SpectralEmbedding {
    config: EmbeddingConfig,
}

impl SpectralEmbedding {
    pub fn new(config: EmbeddingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    pub fn laplacian(&self, adjacency: &SymmetricMatrix) -> Result<SymmetricMatrix> {
        LaplacianBuilder::build(adjacency, self.config.laplacian)
    }

    pub fn decompose(&self, laplacian: &SymmetricMatrix) -> EigenResult {
        JacobiSolver::new(self.config.jacobi).decompose(laplacian)
    }

    pub fn embed(&self, adjacency: &SymmetricMatrix) -> Result<EmbeddingResult> {
        let laplacian = self.laplacian(adjacency)?;
        let eigen = self.decompose(&laplacian);
        Ok(self.project(&eigen))
    }

    /// Select the configured eigenvectors of an existing decomposition.
    pub fn project(&self, eigen: &EigenResult) -> EmbeddingResult {
        let n = eigen.len();
        let start = usize::from(self.config.skip_trivial).min(n);
        let end = start.saturating_add(self.config.dims).min(n);
        let axes: Vec<usize> = (start..end).collect();

        let profile = SpectralProfile::from_eigen(eigen);
        let components = profile.zero_multiplicity(DEFAULT_ZERO_TOLERANCE);
        if self.config.skip_trivial && components > 1 {
            warn!(
                "Graph has {} near-zero Laplacian eigenvalues; skipping one leaves {} trivial axes",
                components,
                (components - 1).min(axes.len())
            );
        }

        let scale = self.config.scale;
        let coordinates = Array2::from_shape_fn((n, axes.len()), |(node, axis)| {
            scale * eigen.vectors[axes[axis]][node]
        });
        debug!(
            "Embedded {} nodes on axes {:?} (requested {})",
            n, axes, self.config.dims
        );

        EmbeddingResult {
            axis_eigenvalues: axes.iter().map(|&k| eigen.values[k]).collect(),
            coordinates,
            axes,
            profile,
            converged: eigen.converged,
            residual: eigen.residual,
        }
    }
}

/// Combinatorial-Laplacian embedding with unit scale.
pub fn embed(
    adjacency: &SymmetricMatrix,
    dims: usize,
    skip_trivial: bool,
) -> Result<EmbeddingResult> {
    SpectralEmbedding::new(EmbeddingConfig {
        dims,
        skip_trivial,
        ..EmbeddingConfig::default()
    })
    .embed(adjacency)
}

/// Embed independent graphs in parallel; results keep the input order.
pub fn embed_batch(
    adjacencies: &[SymmetricMatrix],
    config: &EmbeddingConfig,
) -> Vec<Result<EmbeddingResult>> {
    let embedding = SpectralEmbedding::new(*config);
    adjacencies
        .par_iter()
        .map(|adjacency| embedding.embed(adjacency))
        .collect()
}
