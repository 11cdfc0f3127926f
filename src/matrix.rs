use std::ops::Index;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectralError};

pub const DEFAULT_SYMMETRY_TOLERANCE: f64 = 1e-9;

/// What to do with an input whose mirrored entries disagree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SymmetryPolicy {
    /// Fail with [`SpectralError::AsymmetricInput`] when `|M[i][j] - M[j][i]| > tolerance`.
    Reject { tolerance: f64 },
    /// Replace the input by `(M + Mᵗ) / 2`.
    Symmetrize,
}

impl Default for SymmetryPolicy {
    fn default() -> Self {
        SymmetryPolicy::Reject {
            tolerance: DEFAULT_SYMMETRY_TOLERANCE,
        }
    }
}

/// Square, symmetric matrix of finite reals.
///
/// Every constructor validates shape, finiteness and symmetry, so the
/// eigensolver and Laplacian builder can rely on `M[i][j] == M[j][i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DMatrix<f64>", into = "DMatrix<f64>")]
pub struct SymmetricMatrix {
    inner: DMatrix<f64>,
}

impl SymmetricMatrix {
    /// Validate `matrix` under the default policy (reject asymmetry beyond 1e-9).
    pub fn new(matrix: DMatrix<f64>) -> Result<Self> {
        Self::with_policy(matrix, SymmetryPolicy::default())
    }

    pub fn with_policy(matrix: DMatrix<f64>, policy: SymmetryPolicy) -> Result<Self> {
        if matrix.nrows() != matrix.ncols() {
            return Err(SpectralError::InvalidShape {
                rows: matrix.nrows(),
                cols: matrix.ncols(),
            });
        }
        let n = matrix.nrows();
        for row in 0..n {
            for col in 0..n {
                if !matrix[(row, col)].is_finite() {
                    return Err(SpectralError::NonFinite { row, col });
                }
            }
        }

        match policy {
            SymmetryPolicy::Reject { tolerance } => {
                for row in 0..n {
                    for col in (row + 1)..n {
                        let delta = (matrix[(row, col)] - matrix[(col, row)]).abs();
                        if delta > tolerance {
                            return Err(SpectralError::AsymmetricInput { row, col, delta });
                        }
                    }
                }
                // Mirror the upper triangle so that later reads are exactly symmetric.
                let mut inner = matrix;
                for row in 0..n {
                    for col in (row + 1)..n {
                        inner[(col, row)] = inner[(row, col)];
                    }
                }
                Ok(Self { inner })
            }
            SymmetryPolicy::Symmetrize => {
                let transposed = matrix.transpose();
                Ok(Self {
                    inner: 0.5 * (matrix + transposed),
                })
            }
        }
    }

    /// Build from nested rows; every row must have as many entries as there are rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != n) {
            return Err(SpectralError::InvalidShape {
                rows: n,
                cols: bad.len(),
            });
        }
        Self::new(DMatrix::from_fn(n, n, |i, j| rows[i][j]))
    }

    /// Build from a row-major buffer of `size * size` values.
    pub fn from_row_slice(size: usize, data: &[f64]) -> Result<Self> {
        if data.len() != size * size {
            let cols = if size == 0 { data.len() } else { data.len() / size };
            return Err(SpectralError::InvalidShape { rows: size, cols });
        }
        Self::new(DMatrix::from_row_slice(size, size, data))
    }

    pub fn zeros(size: usize) -> Self {
        Self {
            inner: DMatrix::zeros(size, size),
        }
    }

    pub fn identity(size: usize) -> Self {
        Self {
            inner: DMatrix::identity(size, size),
        }
    }

    /// Wrap a matrix the caller has constructed symmetric by design.
    pub(crate) fn from_symmetric_unchecked(inner: DMatrix<f64>) -> Self {
        debug_assert!(inner.nrows() == inner.ncols());
        Self { inner }
    }

    pub fn size(&self) -> usize {
        self.inner.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.inner[(row, col)]
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.inner
    }

    pub fn into_inner(self) -> DMatrix<f64> {
        self.inner
    }

    pub fn trace(&self) -> f64 {
        self.inner.trace()
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.inner
            .row_iter()
            .map(|row| row.iter().copied().sum::<f64>())
            .collect()
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.inner
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }
}

impl Index<(usize, usize)> for SymmetricMatrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.inner[index]
    }
}

impl TryFrom<DMatrix<f64>> for SymmetricMatrix {
    type Error = SpectralError;

    fn try_from(matrix: DMatrix<f64>) -> Result<Self> {
        Self::new(matrix)
    }
}

impl From<SymmetricMatrix> for DMatrix<f64> {
    fn from(matrix: SymmetricMatrix) -> Self {
        matrix.inner
    }
}
