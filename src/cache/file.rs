//! Persistent cache store: one rkyv-encoded file per key.
//!
//! Keys map onto paths by turning `:` into a directory separator, so every
//! `{namespace}_{version}` prefix gets its own directory. Entries carry an absolute expiry
//! timestamp; expired entries read as absent and are removed on that read.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rkyv::rancor::Error as RkyvError;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize, from_bytes, to_bytes};
use tracing::{debug, warn};

use super::error::{CacheError, CacheResult};
use super::store::CacheStore;

const RKYV_EXTENSION: &str = "rkyv";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A cached value as persisted on disk.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct StoredEntry {
    /// Full cache key, checked on read.
    pub key: String,
    /// Unix timestamp (milliseconds) after which the entry is expired.
    pub expires_at_ms: i64,
    /// Stored bytes.
    pub value: Vec<u8>,
}

impl StoredEntry {
    /// Returns `true` if the entry is expired at `now_ms`.
    #[inline]
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at_ms <= now_ms
    }
}

#[derive(Debug, Clone)]
/// File-per-entry store rooted at a directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> CacheResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| CacheError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves the file path for `key`, rejecting keys that escape the root.
    pub fn entry_path(&self, key: &str) -> CacheResult<PathBuf> {
        let rel = sanitize_storage_key(&key.replace(':', "/")).ok_or_else(|| {
            CacheError::InvalidKey {
                key: key.to_string(),
            }
        })?;
        let mut path = self.root.join(rel);
        path.set_extension(RKYV_EXTENSION);
        Ok(path)
    }

    fn read_entry(&self, key: &str, now_ms: i64) -> CacheResult<Option<Vec<u8>>> {
        let path = self.entry_path(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let mut aligned = AlignedVec::<16>::with_capacity(bytes.len());
        aligned.extend_from_slice(&bytes);

        let entry = match from_bytes::<StoredEntry, RkyvError>(&aligned) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to deserialize cache entry; treating as miss");
                return Ok(None);
            }
        };

        if entry.key != key {
            warn!(
                path = %path.display(),
                expected = key,
                found = %entry.key,
                "Cache key mismatch; treating as miss"
            );
            return Ok(None);
        }

        if entry.is_expired_at(now_ms) {
            debug!(path = %path.display(), "Cache entry expired; removing");
            if let Err(e) = fs::remove_file(&path)
                && e.kind() != ErrorKind::NotFound
            {
                warn!(path = %path.display(), error = %e, "Failed to remove expired cache entry");
            }
            return Ok(None);
        }

        Ok(Some(entry.value))
    }

    fn write_entry(&self, entry: &StoredEntry) -> CacheResult<()> {
        let final_path = self.entry_path(&entry.key)?;
        let parent = final_path.parent().unwrap_or(&self.root).to_path_buf();
        fs::create_dir_all(&parent).map_err(|source| CacheError::Io {
            path: parent.clone(),
            source,
        })?;

        let bytes =
            to_bytes::<RkyvError>(entry).map_err(|e| CacheError::Serialization(e.to_string()))?;

        let temp_path = final_path.with_extension(format!(
            "{}.{}.{}.tmp",
            RKYV_EXTENSION,
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        {
            let mut file = File::create(&temp_path).map_err(io_error(&temp_path))?;
            file.write_all(&bytes).map_err(io_error(&temp_path))?;
            file.sync_all().map_err(io_error(&temp_path))?;
        }

        fs::rename(&temp_path, &final_path).map_err(io_error(&final_path))?;
        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CacheError + use<> {
    let path = path.to_path_buf();
    move |source| CacheError::Io { path, source }
}

fn sanitize_storage_key(storage_key: &str) -> Option<PathBuf> {
    if storage_key.is_empty() {
        return None;
    }

    let mut out = PathBuf::new();
    for c in Path::new(storage_key).components() {
        match c {
            Component::Normal(seg) => out.push(seg),
            Component::CurDir => continue,
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl CacheStore for FileStore {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let store = self.clone();
        let key = key.to_string();

        tokio::task::spawn_blocking(move || store.read_entry(&key, now_ms()))
            .await
            .map_err(|e| CacheError::TaskFailed {
                reason: e.to_string(),
            })?
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        let store = self.clone();
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let entry = StoredEntry {
            key: key.to_string(),
            expires_at_ms: now_ms().saturating_add(ttl_ms),
            value,
        };

        tokio::task::spawn_blocking(move || store.write_entry(&entry))
            .await
            .map_err(|e| CacheError::TaskFailed {
                reason: e.to_string(),
            })?
    }

    async fn is_ready(&self) -> bool {
        self.root.is_dir()
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
