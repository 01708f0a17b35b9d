//! Key-value access traits and the in-memory store.
//!
//! The trie and the state processor talk to storage exclusively through these
//! traits: [`KvRead`] for snapshot reads and [`KvStore`] for mutation inside a
//! write transaction. [`MemStore`] is a transactionless in-memory
//! implementation used by unit tests and benchmarks.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::StorageResult;

/// Read access to a key-value store.
pub trait KvRead {
    /// Get the value stored under `key`, if any.
    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;
}

/// Write access to a key-value store.
///
/// Writes performed through one handle are observed by subsequent reads
/// through the same handle.
pub trait KvStore: KvRead {
    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &[u8], value: &[u8]) -> StorageResult<()>;

    /// Remove the value stored under `key`. Removing an absent key is a no-op.
    fn delete(&self, key: &[u8]) -> StorageResult<()>;
}

/// In-memory key-value store.
///
/// Thread-safe through an [`RwLock`]; there are no transactions, every write
/// is immediately visible.
#[derive(Debug, Default)]
pub struct MemStore {
    entries: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all entries, for inspection in tests.
    pub fn entries(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.entries
            .read()
            .expect("lock poisoned")
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl KvRead for MemStore {
    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.entries.read().expect("lock poisoned").get(key).cloned())
    }
}

impl KvStore for MemStore {
    fn put(&self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.entries
            .write()
            .expect("lock poisoned")
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> StorageResult<()> {
        self.entries.write().expect("lock poisoned").remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_store_round_trip() {
        let store = MemStore::new();
        assert!(store.is_empty());

        store.put(b"key", b"value").unwrap();
        assert_eq!(store.get(b"key").unwrap(), Some(b"value".to_vec()));
        assert_eq!(store.len(), 1);

        store.put(b"key", b"other").unwrap();
        assert_eq!(store.get(b"key").unwrap(), Some(b"other".to_vec()));

        store.delete(b"key").unwrap();
        assert_eq!(store.get(b"key").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_mem_store_delete_absent_is_noop() {
        let store = MemStore::new();
        store.delete(b"missing").unwrap();
        assert!(store.is_empty());
    }
}
