use std::sync::Arc;

use tracing::{Span, debug, info, instrument, warn};

use super::error::AnswerError;
use super::policy::{CallFailure, CallPolicy};
use crate::cache::{CacheError, CacheGate, CacheStore, Fingerprint, Provenance};
use crate::constants::{
    DEFAULT_CACHE_TIMEOUT, DEFAULT_EMBED_TIMEOUT, DEFAULT_GENERATION_TIMEOUT, DEFAULT_TOP_K,
    SYSTEM_PROMPT,
};
use crate::generation::{Generator, build_user_prompt};
use crate::index::{CorpusIndex, IndexError, ScoredPassage, build_context};

/// Steps of a single question, recorded on the request span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    CacheCheck,
    Retrieving,
    Generating,
    Storing,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validating => "validating",
            Stage::CacheCheck => "cache_check",
            Stage::Retrieving => "retrieving",
            Stage::Generating => "generating",
            Stage::Storing => "storing",
            Stage::Done => "done",
        }
    }
}

/// An answer and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub provenance: Provenance,
}

/// Call policies per collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerPolicies {
    /// Query embedding plus index search.
    pub retrieval: CallPolicy,
    /// Generation backend.
    pub generation: CallPolicy,
    /// Each cache store call. Cache failures degrade, so this never retries by default.
    pub cache: CallPolicy,
}

impl Default for AnswerPolicies {
    fn default() -> Self {
        Self {
            retrieval: CallPolicy::new(DEFAULT_EMBED_TIMEOUT, 1),
            generation: CallPolicy::new(DEFAULT_GENERATION_TIMEOUT, 1),
            cache: CallPolicy::once(DEFAULT_CACHE_TIMEOUT),
        }
    }
}

/// Answers questions from the corpus, consulting the answer cache first.
///
/// Holds the immutable index and the collaborators; one instance is shared by all
/// requests.
pub struct AnswerService<S, G> {
    index: Arc<CorpusIndex>,
    gate: CacheGate<S>,
    generator: G,
    policies: AnswerPolicies,
    top_k: usize,
}

impl<S: std::fmt::Debug, G: std::fmt::Debug> std::fmt::Debug for AnswerService<S, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerService")
            .field("index", &self.index)
            .field("gate", &self.gate)
            .field("generator", &self.generator)
            .field("policies", &self.policies)
            .field("top_k", &self.top_k)
            .finish()
    }
}

impl<S, G> AnswerService<S, G>
where
    S: CacheStore + Clone + 'static,
    G: Generator,
{
    pub fn new(index: Arc<CorpusIndex>, gate: CacheGate<S>, generator: G) -> Self {
        Self {
            index,
            gate,
            generator,
            policies: AnswerPolicies::default(),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_policies(mut self, policies: AnswerPolicies) -> Self {
        self.policies = policies;
        self
    }

    /// Overrides the number of passages retrieved per question (minimum 1).
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    pub fn gate(&self) -> &CacheGate<S> {
        &self.gate
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn policies(&self) -> &AnswerPolicies {
        &self.policies
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Returns `true` once the index can serve questions.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.index.is_ready()
    }

    /// Answers `query`.
    ///
    /// Empty queries and an empty index fail before any collaborator is called. A cache
    /// hit returns without touching the index or the generator. A fresh answer is written
    /// to the cache before it is returned; the write runs in its own task so it completes
    /// even if the caller goes away.
    #[instrument(skip(self, query), fields(query_len = query.len(), stage = tracing::field::Empty, provenance = tracing::field::Empty))]
    pub async fn ask(&self, query: &str) -> Result<Answer, AnswerError> {
        enter(Stage::Validating);
        if query.trim().is_empty() {
            return Err(AnswerError::BadRequest {
                reason: "input_text must be a non-empty question".to_string(),
            });
        }
        if !self.index.is_ready() {
            return Err(AnswerError::NotReady);
        }
        let query = query.trim();

        enter(Stage::CacheCheck);
        let fingerprint = self.gate.key_for(query);
        let mut cache_available = true;
        match self
            .policies
            .cache
            .run("cache_get", || self.gate.get(&fingerprint), |_| false)
            .await
        {
            Ok(Some(text)) => {
                enter(Stage::Done);
                Span::current().record("provenance", Provenance::Cache.as_origin());
                info!("Answer served from cache");
                return Ok(Answer {
                    text,
                    provenance: Provenance::Cache,
                });
            }
            Ok(None) => debug!("Cache miss"),
            Err(CallFailure::Failed {
                error: CacheError::InvalidPayload { reason },
                ..
            }) => {
                // Unreadable entry: answer fresh and overwrite it.
                warn!(%reason, "Discarding unreadable cache entry");
            }
            Err(failure) => {
                cache_available = false;
                warn!(error = %failure, "Cache unavailable; answering without cache");
            }
        }

        enter(Stage::Retrieving);
        let passages = self.retrieve(query).await?;
        let context = build_context(&passages);
        debug!(
            passages = passages.len(),
            context_len = context.len(),
            "Context assembled"
        );

        enter(Stage::Generating);
        let user_prompt = build_user_prompt(&context, query);
        let text = self
            .policies
            .generation
            .run(
                "generate",
                || self.generator.generate(SYSTEM_PROMPT, &user_prompt),
                |e| e.is_transient(),
            )
            .await
            .map_err(|failure| AnswerError::Generation {
                message: match failure {
                    CallFailure::TimedOut { .. } => format!("provider {failure}"),
                    CallFailure::Failed { error, .. } => error.to_string(),
                },
            })?;

        if cache_available {
            enter(Stage::Storing);
            self.store(fingerprint, &text).await;
        }

        enter(Stage::Done);
        Span::current().record("provenance", Provenance::Generated.as_origin());
        info!(
            answer_len = text.len(),
            model = self.generator.model(),
            "Answer generated"
        );

        Ok(Answer {
            text,
            provenance: Provenance::Generated,
        })
    }

    async fn retrieve(&self, query: &str) -> Result<Vec<ScoredPassage>, AnswerError> {
        let top_k = self.top_k;
        let result = self
            .policies
            .retrieval
            .run(
                "retrieve",
                || {
                    let index = Arc::clone(&self.index);
                    let query = query.to_string();
                    async move {
                        match tokio::task::spawn_blocking(move || index.search(&query, top_k)).await
                        {
                            Ok(result) => result,
                            Err(e) => Err(IndexError::TaskFailed {
                                reason: e.to_string(),
                            }),
                        }
                    }
                },
                IndexError::is_transient,
            )
            .await;

        match result {
            Ok(passages) => Ok(passages),
            Err(CallFailure::Failed {
                error: IndexError::NotReady,
                ..
            }) => Err(AnswerError::NotReady),
            Err(failure) => Err(AnswerError::Retrieval {
                reason: failure.to_string(),
            }),
        }
    }

    async fn store(&self, fingerprint: Fingerprint, text: &str) {
        let gate = self.gate.clone();
        let policy = self.policies.cache;
        let answer = text.to_string();

        let write = tokio::spawn(async move {
            let ttl = gate.ttl();
            policy
                .run("cache_put", || gate.put(&fingerprint, &answer, ttl), |_| false)
                .await
        });

        match write.await {
            Ok(Ok(())) => debug!("Answer cached"),
            Ok(Err(failure)) => warn!(error = %failure, "Failed to cache answer"),
            Err(e) => warn!(error = %e, "Cache write task failed"),
        }
    }
}

fn enter(stage: Stage) {
    Span::current().record("stage", stage.as_str());
}
