use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::Mutex;

/// A persistent-store operation failed. Callers log and carry on; the
/// system has no retry path (a single failed attempt is final).
#[derive(Debug, Error)]
#[error("persistence failure: {0}")]
pub struct PersistenceError(pub String);

/// The shared key-value store behind all per-tab and global state.
/// Keys are logically independent; same-key writers are last-write-wins.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    async fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
    async fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// In-memory backend. Doubles as the test backend: failures can be
/// injected per operation kind and reads are counted so tests can
/// assert the cache actually short-circuits.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    map: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_removes: AtomicBool,
    read_count: AtomicU64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    pub fn fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::Relaxed);
    }

    /// Number of `read` calls that reached this backend.
    pub fn reads(&self) -> u64 {
        self.read_count.load(Ordering::Relaxed)
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        self.map.lock().await.get(key).cloned()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.read_count.fetch_add(1, Ordering::Relaxed);
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(PersistenceError(format!("injected read failure for {key}")));
        }
        Ok(self.map.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(PersistenceError(format!(
                "injected write failure for {key}"
            )));
        }
        self.map
            .lock()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        if self.fail_removes.load(Ordering::Relaxed) {
            return Err(PersistenceError(format!(
                "injected remove failure for {key}"
            )));
        }
        self.map.lock().await.remove(key);
        Ok(())
    }
}

/// File-backed backend: one JSON object holding every key, rewritten on
/// each mutation. Loads the existing file on open, so state survives a
/// restart of the host process.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    map: Mutex<HashMap<String, String>>,
}

impl JsonFileBackend {
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        let map = match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|err| PersistenceError(format!("corrupt store {}: {err}", path.display())))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                return Err(PersistenceError(format!(
                    "cannot open store {}: {err}",
                    path.display()
                )));
            }
        };
        Ok(Self {
            path: path.to_owned(),
            map: Mutex::new(map),
        })
    }

    async fn persist(&self, map: &HashMap<String, String>) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string_pretty(map)
            .map_err(|err| PersistenceError(format!("serialize store: {err}")))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|err| PersistenceError(format!("write store {}: {err}", self.path.display())))
    }
}

#[async_trait]
impl StorageBackend for JsonFileBackend {
    async fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.map.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut map = self.map.lock().await;
        map.insert(key.to_owned(), value.to_owned());
        self.persist(&map).await
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let mut map = self.map.lock().await;
        map.remove(key);
        self.persist(&map).await
    }
}
