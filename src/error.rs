//! Error taxonomy for the numeric core.

use thiserror::Error;

/// Result type alias for matrix, Laplacian and eigen-decomposition operations.
pub type Result<T> = std::result::Result<T, SpectralError>;

/// Input-validation failures. Numeric operations on validated input never fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectralError {
    /// The input grid is not square (or rows have differing lengths).
    #[error("Matrix must be square: got {rows} rows and {cols} columns")]
    InvalidShape {
        /// Number of rows
        rows: usize,
        /// Number of columns in the offending row
        cols: usize,
    },

    /// `M[row][col]` and `M[col][row]` differ by more than the allowed tolerance.
    #[error("Matrix is not symmetric at ({row}, {col}): |difference| = {delta:e}")]
    AsymmetricInput {
        /// Row of the upper-triangle entry
        row: usize,
        /// Column of the upper-triangle entry
        col: usize,
        /// Absolute difference between the mirrored entries
        delta: f64,
    },

    /// An entry is NaN or infinite.
    #[error("Matrix entry ({row}, {col}) is not finite")]
    NonFinite {
        /// Row of the entry
        row: usize,
        /// Column of the entry
        col: usize,
    },

    /// An adjacency weight is negative, so no valid Laplacian exists.
    #[error("Adjacency weight at ({row}, {col}) is negative: {weight}")]
    NegativeWeight {
        /// Row of the entry
        row: usize,
        /// Column of the entry
        col: usize,
        /// The offending weight
        weight: f64,
    },
}
