//! In-memory store with call counters and an availability switch.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::error::{CacheError, CacheResult};
use super::store::CacheStore;

#[derive(Default)]
struct MockState {
    entries: Mutex<HashMap<String, (Vec<u8>, Instant)>>,
    gets: AtomicUsize,
    sets: AtomicUsize,
    unavailable: AtomicBool,
}

/// Cache store for tests: records traffic and can simulate an outage.
#[derive(Clone, Default)]
pub struct MockCacheStore {
    state: Arc<MockState>,
}

impl MockCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with [`CacheError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.state.unavailable.store(!available, Ordering::SeqCst);
    }

    pub fn get_count(&self) -> usize {
        self.state.gets.load(Ordering::SeqCst)
    }

    pub fn set_count(&self) -> usize {
        self.state.sets.load(Ordering::SeqCst)
    }

    /// Returns the raw value under `key`, ignoring expiry.
    pub fn peek(&self, key: &str) -> Option<Vec<u8>> {
        self.state
            .entries
            .lock()
            .get(key)
            .map(|(value, _)| value.clone())
    }

    /// Inserts a value directly, bypassing counters.
    pub fn insert(&self, key: &str, value: &[u8], ttl: Duration) {
        self.state
            .entries
            .lock()
            .insert(key.to_string(), (value.to_vec(), Instant::now() + ttl));
    }

    pub fn len(&self) -> usize {
        self.state.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> CacheResult<()> {
        if self.state.unavailable.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable {
                reason: "mock store offline".to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for MockCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCacheStore")
            .field("entries", &self.len())
            .field("gets", &self.get_count())
            .field("sets", &self.set_count())
            .finish()
    }
}

impl CacheStore for MockCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.state.gets.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut entries = self.state.entries.lock();
        let expired = match entries.get(key) {
            Some((_, deadline)) => *deadline <= Instant::now(),
            None => return Ok(None),
        };
        if expired {
            entries.remove(key);
            return Ok(None);
        }
        Ok(entries.get(key).map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        self.state.sets.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        self.state
            .entries
            .lock()
            .insert(key.to_string(), (value, Instant::now() + ttl));
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        !self.state.unavailable.load(Ordering::SeqCst)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
