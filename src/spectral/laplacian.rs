use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectralError};
use crate::matrix::SymmetricMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LaplacianKind {
    /// `L = D - A`.
    #[default]
    Combinatorial,
    /// `L̂ = I - D^{-1/2} A D^{-1/2}`, with zero rows for isolated nodes.
    SymmetricNormalized,
}

/// Derives graph Laplacians from weighted adjacency matrices.
///
/// Diagonal adjacency entries (self-loops) are ignored, so every row of the
/// combinatorial Laplacian sums to zero.
pub struct LaplacianBuilder;

impl LaplacianBuilder {
    pub fn build(adjacency: &SymmetricMatrix, kind: LaplacianKind) -> Result<SymmetricMatrix> {
        match kind {
            LaplacianKind::Combinatorial => Self::combinatorial(adjacency),
            LaplacianKind::SymmetricNormalized => Self::normalized(adjacency),
        }
    }

    pub fn combinatorial(adjacency: &SymmetricMatrix) -> Result<SymmetricMatrix> {
        let n = adjacency.size();
        let degrees = weighted_degrees(adjacency)?;

        let mut laplacian = DMatrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let weight = adjacency[(i, j)];
                if weight > 0.0 {
                    laplacian[(i, j)] = -weight;
                }
            }
            laplacian[(i, i)] = degrees[i];
        }

        Ok(SymmetricMatrix::from_symmetric_unchecked(laplacian))
    }

    pub fn normalized(adjacency: &SymmetricMatrix) -> Result<SymmetricMatrix> {
        let n = adjacency.size();
        let degrees = weighted_degrees(adjacency)?;
        let inv_sqrt: Vec<f64> = degrees
            .iter()
            .map(|d| if *d > 0.0 { 1.0 / d.sqrt() } else { 0.0 })
            .collect();

        let mut normalized = DMatrix::zeros(n, n);
        for i in 0..n {
            let scale_i = inv_sqrt[i];
            if scale_i == 0.0 {
                continue;
            }
            for j in 0..n {
                let scale_j = inv_sqrt[j];
                if i == j || scale_j == 0.0 {
                    continue;
                }
                let weight = adjacency[(i, j)];
                if weight > 0.0 {
                    normalized[(i, j)] = -weight * scale_i * scale_j;
                }
            }
            normalized[(i, i)] = 1.0;
        }

        Ok(SymmetricMatrix::from_symmetric_unchecked(normalized))
    }
}

/// Combinatorial Laplacian of `adjacency`.
pub fn build_laplacian(adjacency: &SymmetricMatrix) -> Result<SymmetricMatrix> {
    LaplacianBuilder::combinatorial(adjacency)
}

/// Off-diagonal row sums, rejecting negative weights.
pub fn weighted_degrees(adjacency: &SymmetricMatrix) -> Result<Vec<f64>> {
    let n = adjacency.size();
    let mut degrees = vec![0.0f64; n];
    for (i, degree) in degrees.iter_mut().enumerate() {
        for j in 0..n {
            if i == j {
                continue;
            }
            let weight = adjacency[(i, j)];
            if weight < 0.0 {
                return Err(SpectralError::NegativeWeight {
                    row: i,
                    col: j,
                    weight,
                });
            }
            *degree += weight;
        }
    }
    Ok(degrees)
}
