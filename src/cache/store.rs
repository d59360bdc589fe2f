use std::future::Future;
use std::time::Duration;

use super::error::CacheResult;

/// Key/value backend behind the cache gate.
///
/// Keys arrive fully prefixed; stores never interpret them. Each call is atomic on its own.
/// Absence is `Ok(None)`, never an error.
pub trait CacheStore: Send + Sync {
    /// Returns the value stored under `key`, if present and not expired.
    fn get(&self, key: &str) -> impl Future<Output = CacheResult<Option<Vec<u8>>>> + Send;

    /// Stores `value` under `key` for `ttl`, replacing any previous value.
    fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> impl Future<Output = CacheResult<()>> + Send;

    /// Returns `true` if the store can currently serve requests.
    fn is_ready(&self) -> impl Future<Output = bool> + Send;

    /// Short backend name for logs and readiness output.
    fn name(&self) -> &'static str;
}
