use std::fmt::Write;

use crate::spectral::features::SpectralProfile;

/// Cauchy interlacing check for a single edge insertion.
///
/// Adding an edge of weight `w` to a graph is a rank-one positive update of
/// its Laplacian, so with both spectra ascending:
/// `λ_i(G) <= λ_i(G + e) <= λ_{i+1}(G)` and `λ_n(G + e) <= λ_n(G) + 2w`.
pub struct InterlacingVerifier;

pub struct InterlacingResult {
    pub is_valid: bool,
    pub explanation: String,
}

impl InterlacingVerifier {
    pub fn verify_edge_addition(
        sparser: &SpectralProfile,
        denser: &SpectralProfile,
        added_weight: f64,
        epsilon: f64,
    ) -> InterlacingResult {
        let mut explanation = String::new();
        let mut is_valid = true;

        let before = match sparser.eigenvalues.as_slice() {
            Some(slice) => slice,
            None => {
                return InterlacingResult {
                    is_valid: false,
                    explanation: "Original spectrum is not contiguous".to_string(),
                };
            }
        };
        let after = match denser.eigenvalues.as_slice() {
            Some(slice) => slice,
            None => {
                return InterlacingResult {
                    is_valid: false,
                    explanation: "Updated spectrum is not contiguous".to_string(),
                };
            }
        };

        if before.len() != after.len() {
            return InterlacingResult {
                is_valid: false,
                explanation: format!(
                    "Spectrum sizes differ: {} before, {} after",
                    before.len(),
                    after.len()
                ),
            };
        }

        if added_weight < 0.0 {
            return InterlacingResult {
                is_valid: false,
                explanation: format!("Added edge weight {} is negative", added_weight),
            };
        }

        let n = before.len();
        for i in 0..n {
            let lower = before[i];
            let upper = if i + 1 < n {
                before[i + 1]
            } else {
                before[i] + 2.0 * added_weight
            };
            let value = after[i];
            let satisfied = lower - epsilon <= value && value <= upper + epsilon;
            if !satisfied {
                is_valid = false;
            }
            let _ = writeln!(
                explanation,
                "i={}: {:.6} <= {:.6} <= {:.6}: {}",
                i, lower, value, upper, satisfied
            );
        }

        InterlacingResult {
            is_valid,
            explanation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::SymmetricMatrix;
    use crate::spectral::{build_laplacian, eigen_decompose};

    fn profile(rows: &[Vec<f64>]) -> SpectralProfile {
        let adjacency = SymmetricMatrix::from_rows(rows).expect("adjacency");
        let laplacian = build_laplacian(&adjacency).expect("laplacian");
        SpectralProfile::from_eigen(&eigen_decompose(&laplacian))
    }

    #[test]
    fn closing_a_path_into_a_triangle_interlaces() {
        let path = profile(&[
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 1.0],
            vec![0.0, 1.0, 0.0],
        ]);
        let triangle = profile(&[
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ]);
        let result = InterlacingVerifier::verify_edge_addition(&path, &triangle, 1.0, 1e-9);
        assert!(result.is_valid, "{}", result.explanation);
    }

    #[test]
    fn swapped_order_is_detected() {
        let path = profile(&[
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 1.0],
            vec![0.0, 1.0, 0.0],
        ]);
        let triangle = profile(&[
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ]);
        let result = InterlacingVerifier::verify_edge_addition(&triangle, &path, 1.0, 1e-9);
        assert!(!result.is_valid);
    }

    #[test]
    fn size_mismatch_is_invalid() {
        let small = SpectralProfile::from_eigenvalues(vec![0.0, 2.0]);
        let large = SpectralProfile::from_eigenvalues(vec![0.0, 1.0, 3.0]);
        let result = InterlacingVerifier::verify_edge_addition(&small, &large, 1.0, 1e-9);
        assert!(!result.is_valid);
    }
}
