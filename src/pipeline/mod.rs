pub mod analysis;
pub mod embedding;

pub use analysis::SpectralGraph;
pub use embedding::{embed, embed_batch, EmbeddingConfig, EmbeddingResult, SpectralEmbedding};
