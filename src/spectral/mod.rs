pub mod features;
pub mod jacobi;
pub mod laplacian;

pub use features::{spectral_distance, SpectralProfile, DEFAULT_ZERO_TOLERANCE};
pub use jacobi::{eigen_decompose, EigenResult, JacobiConfig, JacobiSolver};
pub use laplacian::{build_laplacian, weighted_degrees, LaplacianBuilder, LaplacianKind};
