use super::*;
use crate::embedding::cosine_similarity;
use tempfile::TempDir;

fn stub() -> SentenceEmbedder {
    SentenceEmbedder::load(SentenceConfig::stub()).expect("stub embedder should load")
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

#[test]
fn test_stub_reports_mode_and_dimension() {
    let embedder = stub();
    assert!(embedder.is_stub());
    assert!(!embedder.has_model());
    assert_eq!(embedder.embedding_dim(), crate::constants::DEFAULT_EMBEDDING_DIM);
}

#[test]
fn test_stub_embedding_has_configured_dimension() {
    let embedder = SentenceEmbedder::load(SentenceConfig::stub().embedding_dim(64)).unwrap();
    let v = embedder.embed("hello world").unwrap();
    assert_eq!(v.len(), 64);
}

#[test]
fn test_stub_embedding_is_deterministic() {
    let embedder = stub();
    assert_eq!(
        embedder.embed("What is the capital of Fredonia?").unwrap(),
        embedder.embed("What is the capital of Fredonia?").unwrap()
    );
}

#[test]
fn test_stub_embedding_is_unit_length() {
    let v = stub().embed("Sylvania is a city").unwrap();
    assert!((l2_norm(&v) - 1.0).abs() < 1e-5);
}

#[test]
fn test_stub_embedding_of_empty_text_is_zero() {
    let v = stub().embed("  ... ").unwrap();
    assert!(v.iter().all(|&x| x == 0.0));
}

#[test]
fn test_stub_ignores_case_and_punctuation() {
    let embedder = stub();
    assert_eq!(
        embedder.embed("Capital, FREDONIA!").unwrap(),
        embedder.embed("capital fredonia").unwrap()
    );
}

#[test]
fn test_stub_similarity_tracks_shared_words() {
    let embedder = stub();
    let query = embedder.embed("What is the capital of Fredonia?").unwrap();
    let related = embedder
        .embed("The capital of Fredonia is Sylvania.")
        .unwrap();
    let unrelated = embedder
        .embed("Bananas ripen quickly in warm kitchens")
        .unwrap();

    assert!(cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated));
}

#[test]
fn test_embed_batch_preserves_order() {
    let embedder = stub();
    let texts = ["alpha", "beta", "gamma"];
    let batch = embedder.embed_batch(&texts).unwrap();

    assert_eq!(batch.len(), 3);
    for (text, vector) in texts.iter().zip(&batch) {
        assert_eq!(&embedder.embed(text).unwrap(), vector);
    }
}

#[test]
fn test_load_without_model_dir_fails() {
    let err = SentenceEmbedder::load(SentenceConfig::default()).unwrap_err();
    assert!(matches!(err, EmbeddingError::InvalidConfig { .. }));
}

#[test]
fn test_load_with_incomplete_model_dir_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), "{}").unwrap();

    let config = SentenceConfig::new(dir.path());
    assert!(!config.model_available());

    match SentenceEmbedder::load(config).unwrap_err() {
        EmbeddingError::ModelNotFound { path } => {
            assert_eq!(path, dir.path().join("model.safetensors"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_validate_rejects_zero_dimensions() {
    assert!(SentenceConfig::stub().embedding_dim(0).validate().is_err());
    assert!(SentenceConfig::stub().max_seq_len(0).validate().is_err());
}

#[test]
fn test_debug_output_mentions_stub() {
    let debug = format!("{:?}", stub());
    assert!(debug.contains("Stub"));
}
