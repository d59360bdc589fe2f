//! Query fingerprinting and the answer cache in front of the store.

use std::time::Duration;

use tracing::{debug, instrument};

use super::error::{CacheError, CacheResult};
use super::store::CacheStore;
use crate::constants::{CACHE_NAMESPACE, CACHE_TTL, DEFAULT_CACHE_VERSION};
use crate::hashing::hash_query_hex;

/// Namespaced cache key derived from a normalized query.
///
/// Queries that differ only in case or surrounding whitespace share a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The full key, e.g. `rag_openai_v3:<hex>`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps queries to fingerprints and answers to store entries.
#[derive(Debug, Clone)]
pub struct CacheGate<S> {
    store: S,
    namespace: String,
    version: String,
    ttl: Duration,
}

impl<S: CacheStore> CacheGate<S> {
    /// Creates a gate with the default namespace, version and TTL.
    pub fn new(store: S) -> Self {
        Self {
            store,
            namespace: CACHE_NAMESPACE.to_string(),
            version: DEFAULT_CACHE_VERSION.to_string(),
            ttl: CACHE_TTL,
        }
    }

    /// Sets the version marker. A new version orphans every earlier entry.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the TTL used by [`Self::ttl`].
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Key prefix shared by every fingerprint of this gate.
    pub fn prefix(&self) -> String {
        format!("{}_{}:", self.namespace, self.version)
    }

    /// Fingerprints `query`.
    pub fn key_for(&self, query: &str) -> Fingerprint {
        Fingerprint(format!("{}{}", self.prefix(), hash_query_hex(query)))
    }

    /// Entry lifetime for stored answers.
    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The underlying store.
    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Looks up a cached answer.
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn get(&self, fingerprint: &Fingerprint) -> CacheResult<Option<String>> {
        let Some(bytes) = self.store.get(fingerprint.as_str()).await? else {
            debug!("Cache miss");
            return Ok(None);
        };

        let answer = String::from_utf8(bytes).map_err(|e| CacheError::InvalidPayload {
            reason: e.to_string(),
        })?;
        debug!(answer_len = answer.len(), "Cache hit");
        Ok(Some(answer))
    }

    /// Stores `answer` under `fingerprint`, replacing any previous entry.
    #[instrument(skip(self, answer), fields(store = self.store.name(), answer_len = answer.len()))]
    pub async fn put(
        &self,
        fingerprint: &Fingerprint,
        answer: &str,
        ttl: Duration,
    ) -> CacheResult<()> {
        self.store
            .set(fingerprint.as_str(), answer.as_bytes().to_vec(), ttl)
            .await
    }
}
