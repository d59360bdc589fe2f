//! Ragate library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Startup
//! - [`CorpusLoader`], [`initialize_index`], [`LoadReport`] - Document discovery and indexing
//! - [`Chunker`], [`Passage`] - Fixed-window chunking
//! - [`SentenceEmbedder`], [`SentenceConfig`] - Embedding generation (with stub mode)
//! - [`CorpusIndex`] - Exact cosine search over passages
//!
//! ## Per request
//! - [`AnswerService`] - Validate, check cache, retrieve, generate, store
//! - [`CacheGate`], [`MemoryStore`], [`FileStore`], [`RedisStore`] - Answer cache and its stores
//! - [`GenaiGenerator`], [`MockGenerator`] - Generation backends
//!
//! ## Server
//! - [`Config`] - Environment configuration
//! - [`gateway`] - Axum router and handlers
//!
//! ## Test/Mock Support
//! [`MockCacheStore`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod answer;
pub mod cache;
pub mod chunking;
pub mod config;
pub mod constants;
pub mod corpus;
pub mod embedding;
pub mod gateway;
pub mod generation;
pub mod hashing;
pub mod index;

pub use answer::{Answer, AnswerError, AnswerPolicies, AnswerService, CallFailure, CallPolicy};
#[cfg(any(test, feature = "mock"))]
pub use cache::MockCacheStore;
pub use cache::{
    CacheError, CacheGate, CacheStore, FileStore, Fingerprint, MemoryStore, Provenance,
    RAGATE_STATUS_HEADER, RedisStore,
};
pub use chunking::{ChunkError, Chunker, Passage};
pub use config::{Config, ConfigError};
pub use corpus::{CorpusError, CorpusLoader, FileExtractor, LoadReport, initialize_index};
pub use embedding::{
    Embedder, EmbeddingError, SentenceConfig, SentenceEmbedder, SharedEmbedder,
    cosine_similarity,
};
pub use generation::{GenaiGenerator, GenerationError, Generator, MockGenerator};
pub use hashing::{hash_query, hash_query_hex, normalize_query};
pub use index::{CorpusIndex, IndexError, ScoredPassage, build_context};
