pub mod datasets;
pub mod error;
pub mod graph;
pub mod matrix;
pub mod pipeline;
pub mod sampling;
pub mod spectral;
pub mod verify;

pub use datasets::DatasetLoader;
pub use error::{Result, SpectralError};
pub use graph::{GraphId, GraphInstance, GraphLoader, GraphWriter};
pub use matrix::{SymmetricMatrix, SymmetryPolicy};
pub use pipeline::{
    embed, embed_batch, EmbeddingConfig, EmbeddingResult, SpectralEmbedding, SpectralGraph,
};
pub use sampling::{CommunityGraph, CommunitySampler, EdgeToggler, SampleConfig, ToggleConfig};
pub use spectral::{
    build_laplacian, eigen_decompose, EigenResult, JacobiConfig, JacobiSolver, LaplacianKind,
    SpectralProfile,
};
pub use verify::{DecompositionVerifier, InterlacingVerifier};
