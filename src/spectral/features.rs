use std::cmp::Ordering;

use ndarray::{s, Array1};
use serde::{Deserialize, Serialize};

use crate::spectral::jacobi::EigenResult;

pub const DEFAULT_ZERO_TOLERANCE: f64 = 1e-6;

/// Eigenvalue summary of a decomposition, ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralProfile {
    pub eigenvalues: Array1<f64>,
    pub norm_l2: f64,
    pub trace: f64,
}

impl SpectralProfile {
    pub fn from_eigenvalues(mut eigenvalues: Vec<f64>) -> Self {
        eigenvalues.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let eigenvalues = Array1::from(eigenvalues);
        let norm_l2 = eigenvalues.mapv(|v| v * v).sum().sqrt();
        let trace = eigenvalues.sum();
        Self {
            eigenvalues,
            norm_l2,
            trace,
        }
    }

    pub fn from_eigen(eigen: &EigenResult) -> Self {
        Self::from_eigenvalues(eigen.values.clone())
    }

    pub fn len(&self) -> usize {
        self.eigenvalues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }

    /// Fiedler value: the second-smallest eigenvalue.
    pub fn algebraic_connectivity(&self) -> Option<f64> {
        self.eigenvalues.get(1).copied()
    }

    /// Number of eigenvalues within `tolerance` of zero. For a graph Laplacian
    /// this is the number of connected components.
    pub fn zero_multiplicity(&self, tolerance: f64) -> usize {
        self.eigenvalues
            .iter()
            .filter(|v| v.abs() < tolerance)
            .count()
    }

    /// Gap between the first non-zero eigenvalue and zero.
    pub fn spectral_gap(&self, tolerance: f64) -> Option<f64> {
        self.eigenvalues
            .iter()
            .copied()
            .find(|v| v.abs() >= tolerance)
    }
}

/// Root-mean-square eigenvalue shift between two spectra, compared over the
/// shorter one. Two empty spectra are at distance zero.
pub fn spectral_distance(a: &SpectralProfile, b: &SpectralProfile) -> f64 {
    let shared = a.len().min(b.len());
    let shift = &a.eigenvalues.slice(s![..shared]) - &b.eigenvalues.slice(s![..shared]);
    shift.mapv(|d| d * d).mean().map_or(0.0, f64::sqrt)
}
