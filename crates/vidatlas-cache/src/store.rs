//! Key-value blob storage backing the batch cache.
//!
//! [`BatchCache`](crate::BatchCache) takes the store as an injected
//! dependency so tests can substitute [`MemoryStore`] (or a deliberately
//! failing store) for the file-backed production store.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::CacheError;

/// Minimal read/write/remove interface over opaque blobs.
pub trait BlobStore: Send + Sync {
    /// Reads the blob stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the underlying storage fails.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Writes `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the underlying storage fails.
    fn write(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Removes the blob under `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the underlying storage fails.
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// File-backed store: one file per key under a fixed directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Io {
                key: key.to_owned(),
                source: e,
            }),
        }
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let io_err = |e| CacheError::Io {
            key: key.to_owned(),
            source: e,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        std::fs::write(self.path_for(key), value).map_err(io_err)
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io {
                key: key.to_owned(),
                source: e,
            }),
        }
    }
}

/// In-memory store used by tests and as an in-process fallback.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recovers the map even from a poisoned mutex: a panic in another
    /// holder must not turn the store into a panic source of its own.
    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl BlobStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries().get(key).cloned())
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.entries().insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_a_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());

        store.write("batch", b"{\"v\":1}").unwrap();
        assert_eq!(store.read("batch").unwrap().as_deref(), Some(&b"{\"v\":1}"[..]));
    }

    #[test]
    fn file_store_read_of_absent_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        assert!(store.read("missing").unwrap().is_none());
    }

    #[test]
    fn file_store_remove_of_absent_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        store.remove("missing").unwrap();
    }

    #[test]
    fn file_store_creates_directory_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("cache"));
        store.write("batch", b"x").unwrap();
        assert_eq!(store.read("batch").unwrap().as_deref(), Some(&b"x"[..]));
    }

    #[test]
    fn memory_store_survives_a_poisoned_mutex() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new());
        store.write("batch", b"before").unwrap();

        // Poison the mutex by panicking while the lock is held.
        let poisoner = Arc::clone(&store);
        let result = std::thread::spawn(move || {
            let _guard = poisoner.entries();
            panic!("poison");
        })
        .join();
        assert!(result.is_err(), "poisoning thread should have panicked");

        // Storage must keep functioning, not become a panic source.
        assert_eq!(store.read("batch").unwrap().as_deref(), Some(&b"before"[..]));
        store.write("batch", b"after").unwrap();
        assert_eq!(store.read("batch").unwrap().as_deref(), Some(&b"after"[..]));
        store.remove("batch").unwrap();
        assert!(store.read("batch").unwrap().is_none());
    }

    #[test]
    fn memory_store_overwrites_wholesale() {
        let store = MemoryStore::new();
        store.write("batch", b"old").unwrap();
        store.write("batch", b"new").unwrap();
        assert_eq!(store.read("batch").unwrap().as_deref(), Some(&b"new"[..]));
        store.remove("batch").unwrap();
        assert!(store.read("batch").unwrap().is_none());
    }
}
