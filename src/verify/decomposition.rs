use std::fmt::Write;

use crate::matrix::SymmetricMatrix;
use crate::spectral::EigenResult;

#[derive(Debug, Clone)]
pub struct DecompositionReport {
    pub is_valid: bool,
    pub orthonormality_error: f64,
    pub reconstruction_error: f64,
    pub trace_delta: f64,
    pub sorted: bool,
    pub explanation: String,
}

/// Checks an [`EigenResult`] against the matrix it was computed from.
pub struct DecompositionVerifier;

impl DecompositionVerifier {
    pub fn verify(
        source: &SymmetricMatrix,
        eigen: &EigenResult,
        epsilon: f64,
    ) -> DecompositionReport {
        let mut explanation = String::new();

        if eigen.len() != source.size() || eigen.vectors.iter().any(|v| v.len() != source.size()) {
            let _ = writeln!(
                explanation,
                "Order mismatch: matrix {} vs {} eigenpairs",
                source.size(),
                eigen.len()
            );
            return DecompositionReport {
                is_valid: false,
                orthonormality_error: f64::INFINITY,
                reconstruction_error: f64::INFINITY,
                trace_delta: f64::INFINITY,
                sorted: false,
                explanation,
            };
        }

        let orthonormality_error = eigen.orthonormality_error();
        let orthonormal = orthonormality_error <= epsilon;
        let _ = writeln!(
            explanation,
            "max|VᵗV - I| = {:.3e} <= {:.1e}: {}",
            orthonormality_error, epsilon, orthonormal
        );

        let reconstruction_error = eigen.reconstruction_error(source);
        let reconstructs = reconstruction_error <= epsilon;
        let _ = writeln!(
            explanation,
            "max|VΛVᵗ - M| = {:.3e} <= {:.1e}: {}",
            reconstruction_error, epsilon, reconstructs
        );

        let trace_delta = (eigen.trace() - source.trace()).abs();
        let trace_kept = trace_delta <= epsilon;
        let _ = writeln!(
            explanation,
            "|Σλ - tr(M)| = {:.3e} <= {:.1e}: {}",
            trace_delta, epsilon, trace_kept
        );

        let sorted = eigen.values.windows(2).all(|pair| pair[0] <= pair[1]);
        let _ = writeln!(explanation, "Eigenvalues ascending: {}", sorted);

        let is_valid = orthonormal && reconstructs && trace_kept && sorted;
        let _ = writeln!(
            explanation,
            "Converged: {} (residual {:.3e}, rotations {})",
            eigen.converged, eigen.residual, eigen.rotations
        );
        let _ = writeln!(explanation, "Valid: {}", is_valid);

        DecompositionReport {
            is_valid,
            orthonormality_error,
            reconstruction_error,
            trace_delta,
            sorted,
            explanation,
        }
    }
}
