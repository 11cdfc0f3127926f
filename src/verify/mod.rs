pub mod decomposition;
pub mod interlacing;

pub use decomposition::{DecompositionReport, DecompositionVerifier};
pub use interlacing::{InterlacingResult, InterlacingVerifier};
