//! Cross-cutting, shared constants.
//!
//! Retrieval and generation parameters are product decisions, not tuning knobs: changing
//! the chunk geometry or the embedding model requires re-indexing, and changing the prompt
//! or cache namespace should come with a bump of [`DEFAULT_CACHE_VERSION`].

use std::time::Duration;

/// Nominal passage length, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Distance between consecutive passage starts, in characters.
pub const DEFAULT_CHUNK_STEP: usize = 800;

/// Characters shared by two neighbouring passages.
pub const DEFAULT_CHUNK_OVERLAP: usize = DEFAULT_CHUNK_SIZE - DEFAULT_CHUNK_STEP;

/// Passages retrieved per question.
pub const DEFAULT_TOP_K: usize = 3;

/// Joins retrieved passages into the generation context.
pub const CONTEXT_SEPARATOR: &str = " ";

/// Lifetime of a cached answer.
pub const CACHE_TTL: Duration = Duration::from_secs(86_400);

/// Namespace tag prefixed to every cache key.
pub const CACHE_NAMESPACE: &str = "rag_openai";

/// Version marker prefixed to every cache key. Bumping it orphans all previous entries.
pub const DEFAULT_CACHE_VERSION: &str = "v3";

/// Output dimension of the default sentence-embedding model (MiniLM-L12).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Token budget per embedded text.
pub const DEFAULT_MAX_SEQ_LEN: usize = 128;

/// Generation model used when `RAGATE_GENERATION_MODEL` is not set.
pub const DEFAULT_GENERATION_MODEL: &str = "gpt-4o-mini";

/// Low sampling temperature keeps answers close to the retrieved context.
pub const GENERATION_TEMPERATURE: f64 = 0.2;

/// Persona and grounding instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "Você é um especialista que responde perguntas com base no contexto de PDFs fornecido. Responda de forma clara, técnica e em Português do Brasil.";

/// Default upper bound for a single embedding call.
pub const DEFAULT_EMBED_TIMEOUT: Duration = Duration::from_secs(10);

/// Default upper bound for a single generation call.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Default upper bound for a single cache store call.
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_millis(500);

/// Pause between a failed attempt and its retry.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(250);
