//! In-memory passage index with exact cosine nearest-neighbour search.
//!
//! The index is built once and is read-only afterwards. Each passage is stored together
//! with its vector in a single record, so the two can never drift apart. An index built
//! from an empty corpus is *uninitialized*: every search fails with
//! [`IndexError::NotReady`] instead of returning an empty result.

mod error;

#[cfg(test)]
mod tests;

pub use error::{IndexError, IndexResult};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::chunking::Passage;
use crate::constants::CONTEXT_SEPARATOR;
use crate::embedding::{SharedEmbedder, cosine_similarity};

/// A retrieved passage with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPassage {
    /// The matching passage.
    pub passage: Passage,
    /// Cosine similarity in `[-1, 1]`.
    pub score: f32,
}

#[derive(Debug, Clone)]
struct IndexedPassage {
    passage: Passage,
    vector: Vec<f32>,
}

/// Immutable corpus index: ordered passages paired with their embeddings.
pub struct CorpusIndex {
    entries: Vec<IndexedPassage>,
    embedder: SharedEmbedder,
}

impl std::fmt::Debug for CorpusIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusIndex")
            .field("passages", &self.entries.len())
            .field("embedding_dim", &self.embedder.embedding_dim())
            .field("embedder_stub", &self.embedder.is_stub())
            .finish()
    }
}

impl CorpusIndex {
    /// Creates an index with no passages; every search fails with `NotReady`.
    pub fn uninitialized(embedder: SharedEmbedder) -> Self {
        Self {
            entries: Vec::new(),
            embedder,
        }
    }

    /// Embeds every passage and stores it alongside its vector, preserving order.
    ///
    /// This is the only way to populate an index.
    #[instrument(skip_all, fields(passages = passages.len()))]
    pub fn build(passages: Vec<Passage>, embedder: SharedEmbedder) -> IndexResult<Self> {
        if passages.is_empty() {
            info!("No passages to index; corpus index is uninitialized");
            return Ok(Self::uninitialized(embedder));
        }

        let texts: Vec<&str> = passages.iter().map(Passage::text).collect();
        let vectors = embedder.embed_batch(&texts)?;

        if vectors.len() != passages.len() {
            return Err(IndexError::VectorCountMismatch {
                passages: passages.len(),
                vectors: vectors.len(),
            });
        }

        let expected = embedder.embedding_dim();
        let mut entries = Vec::with_capacity(passages.len());
        for (passage, vector) in passages.into_iter().zip(vectors) {
            if vector.len() != expected {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
            entries.push(IndexedPassage { passage, vector });
        }

        info!(
            passages = entries.len(),
            embedding_dim = expected,
            "Corpus index built"
        );

        Ok(Self { entries, embedder })
    }

    /// Returns `true` once at least one passage has been indexed.
    #[inline]
    pub fn is_ready(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of indexed passages.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the index holds no passages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the passage at `ordinal`, if any.
    pub fn passage(&self, ordinal: usize) -> Option<&Passage> {
        self.entries.get(ordinal).map(|e| &e.passage)
    }

    /// The embedder used for passages; queries must use the same one.
    pub fn embedder(&self) -> &SharedEmbedder {
        &self.embedder
    }

    /// Embeds `query` and returns its `k` nearest passages.
    #[instrument(skip(self, query), fields(query_len = query.len(), k = k))]
    pub fn search(&self, query: &str, k: usize) -> IndexResult<Vec<ScoredPassage>> {
        self.check_searchable(k)?;
        let query_vector = self.embedder.embed(query)?;
        self.search_vector(&query_vector, k)
    }

    /// Returns the `k` passages most similar to `query_vector`.
    ///
    /// Results are ordered by descending score; equal scores keep ordinal order. When `k`
    /// exceeds the corpus size every passage is returned.
    pub fn search_vector(&self, query_vector: &[f32], k: usize) -> IndexResult<Vec<ScoredPassage>> {
        self.check_searchable(k)?;

        let expected = self.embedder.embedding_dim();
        if query_vector.len() != expected {
            return Err(IndexError::DimensionMismatch {
                expected,
                actual: query_vector.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine_similarity(query_vector, &e.vector)))
            .collect();

        // Stable sort: ties stay in ordinal order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        debug!(
            returned = scored.len(),
            best_score = scored.first().map(|(_, s)| *s),
            "Index search complete"
        );

        Ok(scored
            .into_iter()
            .map(|(i, score)| ScoredPassage {
                passage: self.entries[i].passage.clone(),
                score,
            })
            .collect())
    }

    fn check_searchable(&self, k: usize) -> IndexResult<()> {
        if !self.is_ready() {
            return Err(IndexError::NotReady);
        }
        if k == 0 {
            return Err(IndexError::InvalidTopK);
        }
        Ok(())
    }
}

/// Joins retrieved passages into a generation context, in result (score) order.
pub fn build_context(results: &[ScoredPassage]) -> String {
    results
        .iter()
        .map(|r| r.passage.text())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}
