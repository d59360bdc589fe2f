//! Answer cache: query fingerprints, the cache gate, and its stores.
//!
//! The gate owns key derivation (`{namespace}_{version}:{blake3 hex}`); stores only see
//! opaque keys and bytes. [`MemoryStore`] keeps entries in-process with per-entry TTL,
//! [`FileStore`] persists them across restarts, and [`RedisStore`] shares them between
//! replicas.

pub mod error;
pub mod file;
pub mod gate;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod redis_store;
pub mod store;
pub mod types;


pub use error::{CacheError, CacheResult};
pub use file::{FileStore, StoredEntry};
pub use gate::{CacheGate, Fingerprint};
pub use memory::MemoryStore;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCacheStore;
pub use redis_store::RedisStore;
pub use store::CacheStore;
pub use types::{
    Provenance, RAGATE_STATUS_ERROR, RAGATE_STATUS_HEADER, RAGATE_STATUS_HEALTHY,
    RAGATE_STATUS_NOT_READY, RAGATE_STATUS_READY,
};
