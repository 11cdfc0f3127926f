use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::matrix::SymmetricMatrix;

pub const DEFAULT_MAX_SWEEPS: usize = 100;
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Termination settings for the cyclic-pivot Jacobi iteration.
///
/// One sweep is `n(n-1)/2` rotations, so an order-`n` matrix receives at most
/// `max_sweeps * n(n-1)/2` rotations. Iteration stops earlier as soon as the
/// largest off-diagonal magnitude drops below `tolerance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JacobiConfig {
    pub max_sweeps: usize,
    pub tolerance: f64,
}

impl Default for JacobiConfig {
    fn default() -> Self {
        Self {
            max_sweeps: DEFAULT_MAX_SWEEPS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl JacobiConfig {
    pub fn rotation_budget(&self, order: usize) -> usize {
        let pairs = order * order.saturating_sub(1) / 2;
        self.max_sweeps.saturating_mul(pairs)
    }
}

/// Eigenpairs of a symmetric matrix, sorted by ascending eigenvalue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenResult {
    pub values: Vec<f64>,
    /// `vectors[k]` is the unit eigenvector belonging to `values[k]`.
    pub vectors: Vec<DVector<f64>>,
    /// Largest off-diagonal magnitude left in the rotated working matrix.
    pub residual: f64,
    pub rotations: usize,
    pub converged: bool,
}

impl EigenResult {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn eigenpairs(&self) -> impl Iterator<Item = (f64, &DVector<f64>)> {
        self.values.iter().copied().zip(self.vectors.iter())
    }

    /// Eigenvectors laid out as the columns of `V`.
    pub fn eigenvector_matrix(&self) -> DMatrix<f64> {
        let n = self.len();
        DMatrix::from_fn(n, n, |row, col| self.vectors[col][row])
    }

    /// `V · diag(values) · Vᵗ`.
    pub fn reconstruct(&self) -> DMatrix<f64> {
        let v = self.eigenvector_matrix();
        let lambda = DMatrix::from_diagonal(&DVector::from_column_slice(&self.values));
        &v * lambda * v.transpose()
    }

    /// Largest entry of `|VᵗV - I|`.
    pub fn orthonormality_error(&self) -> f64 {
        let n = self.len();
        let v = self.eigenvector_matrix();
        let gram = v.transpose() * &v;
        max_abs(&(gram - DMatrix::<f64>::identity(n, n)))
    }

    /// Largest entry of `|V·Λ·Vᵗ - source|`.
    pub fn reconstruction_error(&self, source: &SymmetricMatrix) -> f64 {
        if source.size() != self.len() {
            return f64::INFINITY;
        }
        max_abs(&(self.reconstruct() - source.as_matrix()))
    }

    pub fn trace(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Classic Jacobi eigensolver with largest-element pivoting.
#[derive(Debug, Clone, Default)]
pub struct JacobiSolver {
    config: JacobiConfig,
}

impl JacobiSolver {
    pub fn new(config: JacobiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JacobiConfig {
        &self.config
    }

    pub fn decompose(&self, matrix: &SymmetricMatrix) -> EigenResult {
        let n = matrix.size();
        let mut working = matrix.as_matrix().clone();
        let mut accumulator = DMatrix::<f64>::identity(n, n);

        let budget = self.config.rotation_budget(n);
        let mut rotations = 0usize;
        while rotations < budget {
            let (p, q, magnitude) = select_pivot(&working);
            if magnitude < self.config.tolerance {
                break;
            }
            rotate(&mut working, &mut accumulator, p, q);
            rotations += 1;
        }

        let residual = max_off_diagonal(&working);
        let converged = residual < self.config.tolerance;
        if converged {
            debug!(
                "Jacobi decomposition of order {} converged after {} rotations (residual {:e})",
                n, rotations, residual
            );
        } else {
            warn!(
                "Jacobi decomposition of order {} stopped at rotation budget {} with residual {:e}",
                n, budget, residual
            );
        }

        let diagonal: Vec<f64> = (0..n).map(|i| working[(i, i)]).collect();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| diagonal[a].total_cmp(&diagonal[b]));

        EigenResult {
            values: order.iter().map(|&i| diagonal[i]).collect(),
            vectors: order
                .iter()
                .map(|&i| accumulator.column(i).into_owned())
                .collect(),
            residual,
            rotations,
            converged,
        }
    }
}

/// Decompose with the default configuration.
pub fn eigen_decompose(matrix: &SymmetricMatrix) -> EigenResult {
    JacobiSolver::default().decompose(matrix)
}

/// Largest strict-upper-triangle magnitude; ties keep the first in row-major order.
fn select_pivot(matrix: &DMatrix<f64>) -> (usize, usize, f64) {
    let n = matrix.nrows();
    let (mut p, mut q, mut max_value) = (0, 1, 0.0f64);
    for i in 0..n {
        for j in (i + 1)..n {
            let magnitude = matrix[(i, j)].abs();
            if magnitude > max_value {
                max_value = magnitude;
                p = i;
                q = j;
            }
        }
    }
    (p, q, max_value)
}

/// Zero `A[p][q]` with a plane rotation and fold the rotation into `V`.
fn rotate(a: &mut DMatrix<f64>, v: &mut DMatrix<f64>, p: usize, q: usize) {
    let n = a.nrows();
    let theta = 0.5 * (2.0 * a[(p, q)]).atan2(a[(p, p)] - a[(q, q)]);
    let (s, c) = theta.sin_cos();

    let app = a[(p, p)];
    let aqq = a[(q, q)];
    let apq = a[(p, q)];
    a[(p, p)] = c * c * app + 2.0 * s * c * apq + s * s * aqq;
    a[(q, q)] = s * s * app - 2.0 * s * c * apq + c * c * aqq;
    a[(p, q)] = 0.0;
    a[(q, p)] = 0.0;

    for i in 0..n {
        if i == p || i == q {
            continue;
        }
        let aip = a[(i, p)];
        let aiq = a[(i, q)];
        a[(i, p)] = c * aip + s * aiq;
        a[(p, i)] = a[(i, p)];
        a[(i, q)] = -s * aip + c * aiq;
        a[(q, i)] = a[(i, q)];
    }

    for i in 0..n {
        let vip = v[(i, p)];
        let viq = v[(i, q)];
        v[(i, p)] = c * vip + s * viq;
        v[(i, q)] = -s * vip + c * viq;
    }
}

fn max_off_diagonal(matrix: &DMatrix<f64>) -> f64 {
    let n = matrix.nrows();
    let mut max_value = 0.0f64;
    for i in 0..n {
        for j in (i + 1)..n {
            max_value = max_value.max(matrix[(i, j)].abs());
        }
    }
    max_value
}

fn max_abs(matrix: &DMatrix<f64>) -> f64 {
    matrix.iter().fold(0.0f64, |acc, v| acc.max(v.abs()))
}
