//! Redis store, shared by every replica and kept across restarts.
//!
//! The connection is opened lazily on first use and reused afterwards through a
//! [`ConnectionManager`], which reconnects on its own after a dropped link. A server that
//! cannot be reached surfaces as [`CacheError::Unavailable`], so callers degrade instead of
//! failing startup.

use std::sync::Arc;
use std::time::Duration;

use redis::aio::ConnectionManager;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::error::{CacheError, CacheResult};
use super::store::CacheStore;

/// Cache store backed by a Redis server.
#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
    connection: Arc<OnceCell<ConnectionManager>>,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("addr", &self.client.get_connection_info().addr)
            .field("connected", &self.connection.initialized())
            .finish()
    }
}

impl RedisStore {
    /// Parses `url` without connecting.
    pub fn open(url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(url).map_err(|e| CacheError::Unavailable {
            reason: format!("invalid redis url: {e}"),
        })?;

        Ok(Self {
            client,
            connection: Arc::new(OnceCell::new()),
        })
    }

    async fn connection(&self) -> CacheResult<ConnectionManager> {
        self.connection
            .get_or_try_init(|| async {
                debug!(addr = %self.client.get_connection_info().addr, "Connecting to redis");
                let manager = ConnectionManager::new(self.client.clone()).await?;
                info!("Redis cache store connected");
                Ok::<_, redis::RedisError>(manager)
            })
            .await
            .cloned()
            .map_err(unavailable)
    }
}

fn unavailable(err: redis::RedisError) -> CacheError {
    CacheError::Unavailable {
        reason: err.to_string(),
    }
}

/// Redis expiries are whole milliseconds and must be positive.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;
        let value: Option<Vec<u8>> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(ttl_millis(ttl))
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        let Ok(mut conn) = self.connection().await else {
            return false;
        };
        let pong: redis::RedisResult<String> =
            redis::cmd("PING").query_async(&mut conn).await;
        pong.is_ok()
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
