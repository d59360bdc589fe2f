use std::sync::Arc;

use super::*;
use crate::chunking::Chunker;
use crate::embedding::{Embedder, EmbeddingError, SentenceConfig, SentenceEmbedder};

/// One axis per vocabulary word; counts occurrences.
struct KeywordEmbedder {
    vocabulary: Vec<&'static str>,
}

impl KeywordEmbedder {
    fn shared(vocabulary: &[&'static str]) -> SharedEmbedder {
        Arc::new(Self {
            vocabulary: vocabulary.to_vec(),
        })
    }
}

impl Embedder for KeywordEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let lower = text.to_lowercase();
        Ok(self
            .vocabulary
            .iter()
            .map(|w| lower.matches(w).count() as f32)
            .collect())
    }

    fn embedding_dim(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Returns vectors of the wrong length.
struct BrokenEmbedder;

impl Embedder for BrokenEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![1.0; 3])
    }

    fn embedding_dim(&self) -> usize {
        4
    }
}

/// Always fails.
struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::InferenceFailed {
            reason: "model offline".to_string(),
        })
    }

    fn embedding_dim(&self) -> usize {
        4
    }
}

fn passages(texts: &[&str]) -> Vec<Passage> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| Passage::new(i, *t))
        .collect()
}

fn ordinals(results: &[ScoredPassage]) -> Vec<usize> {
    results.iter().map(|r| r.passage.ordinal()).collect()
}

fn fruit_index() -> CorpusIndex {
    let embedder = KeywordEmbedder::shared(&["apple", "pear", "plum"]);
    CorpusIndex::build(
        passages(&[
            "plum plum",
            "apple pear",
            "apple apple apple",
            "pear",
            "apple",
        ]),
        embedder,
    )
    .unwrap()
}

#[test]
fn test_build_preserves_order_and_count() {
    let index = fruit_index();
    assert!(index.is_ready());
    assert_eq!(index.len(), 5);
    assert_eq!(index.passage(0).unwrap().text(), "plum plum");
    assert_eq!(index.passage(4).unwrap().text(), "apple");
    assert!(index.passage(5).is_none());
}

#[test]
fn test_empty_build_is_uninitialized() {
    let index = CorpusIndex::build(Vec::new(), KeywordEmbedder::shared(&["a"])).unwrap();
    assert!(!index.is_ready());
    assert!(index.is_empty());
}

#[test]
fn test_search_on_uninitialized_index_is_not_ready() {
    let index = CorpusIndex::uninitialized(KeywordEmbedder::shared(&["a"]));
    assert!(matches!(index.search("a", 3), Err(IndexError::NotReady)));
    assert!(matches!(
        index.search_vector(&[1.0], 3),
        Err(IndexError::NotReady)
    ));
}

#[test]
fn test_search_rejects_zero_k() {
    let index = fruit_index();
    assert!(matches!(index.search("apple", 0), Err(IndexError::InvalidTopK)));
}

#[test]
fn test_search_orders_by_descending_score() {
    let index = fruit_index();
    let results = index.search("plum", 5).unwrap();

    assert_eq!(results[0].passage.ordinal(), 0);
    assert!((results[0].score - 1.0).abs() < 1e-6);
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_search_ties_keep_ordinal_order() {
    let index = fruit_index();
    let results = index.search("apple", 5).unwrap();

    // "apple apple apple" and "apple" both score 1.0; the earlier ordinal wins.
    assert_eq!(ordinals(&results)[..2], [2, 4]);
    assert_eq!(results[0].score, results[1].score);
}

#[test]
fn test_search_truncates_to_k() {
    let index = fruit_index();
    assert_eq!(index.search("apple", 2).unwrap().len(), 2);
}

#[test]
fn test_search_with_k_larger_than_corpus_returns_all() {
    let index = fruit_index();
    let results = index.search("pear", 50).unwrap();
    assert_eq!(results.len(), 5);

    let mut seen = ordinals(&results);
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_search_is_deterministic() {
    let index = fruit_index();
    let first = index.search("apple pear", 3).unwrap();
    let second = index.search("apple pear", 3).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_search_vector_dimension_mismatch() {
    let index = fruit_index();
    assert!(matches!(
        index.search_vector(&[1.0, 0.0], 1),
        Err(IndexError::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn test_build_rejects_wrong_vector_dimension() {
    let result = CorpusIndex::build(passages(&["x"]), Arc::new(BrokenEmbedder));
    assert!(matches!(
        result,
        Err(IndexError::DimensionMismatch {
            expected: 4,
            actual: 3
        })
    ));
}

#[test]
fn test_embedding_failure_is_reported() {
    let result = CorpusIndex::build(passages(&["x"]), Arc::new(FailingEmbedder));
    assert!(matches!(result, Err(IndexError::Embedding(_))));
}

#[test]
fn test_build_context_joins_in_score_order() {
    let index = fruit_index();
    let results = index.search("pear", 2).unwrap();

    // "pear" (1.0) outranks "apple pear" (~0.707).
    assert_eq!(build_context(&results), "pear apple pear");
}

#[test]
fn test_build_context_of_nothing_is_empty() {
    assert_eq!(build_context(&[]), "");
}

#[test]
fn test_stub_embedder_finds_fredonia_passage() {
    let embedder: SharedEmbedder =
        Arc::new(SentenceEmbedder::load(SentenceConfig::stub()).unwrap());
    let corpus = "The capital of Fredonia is Sylvania.";
    let index = CorpusIndex::build(Chunker::default().chunk(corpus), embedder).unwrap();

    let results = index.search("What is the capital of Fredonia?", 3).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].passage.text(), corpus);
    assert!(results[0].score > 0.5);
}

#[test]
fn test_debug_output_reports_size() {
    let debug = format!("{:?}", fruit_index());
    assert!(debug.contains("passages: 5"));
}
