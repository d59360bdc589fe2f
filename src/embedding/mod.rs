//! Text embedding.
//!
//! [`Embedder`] is the seam between the index and the embedding model. The same embedder
//! instance must serve both corpus passages and queries; vectors from different models
//! are not comparable.
//!
//! - [`sentence`] provides the default BERT sentence embedder (with a stub mode).

/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Sentence embedder (BERT + mean pooling).
pub mod sentence;

use std::sync::Arc;

pub use error::EmbeddingError;
pub use sentence::{SentenceConfig, SentenceEmbedder};

/// Produces fixed-length vectors for text.
pub trait Embedder: Send + Sync {
    /// Embeds a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds a batch of texts, preserving order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    /// Length of every vector this embedder returns.
    fn embedding_dim(&self) -> usize;

    /// Returns `true` for deterministic test embedders with no real model behind them.
    fn is_stub(&self) -> bool {
        false
    }
}

/// Shared, thread-safe embedder handle.
pub type SharedEmbedder = Arc<dyn Embedder>;

/// Cosine similarity of two vectors; `0.0` when lengths differ or either is all zeros.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}
