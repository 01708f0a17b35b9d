//! Tessera Storage Layer
//!
//! Provides the persistent key-value store backing the state trie and the
//! state-update pipeline.
//!
//! # Architecture
//!
//! The storage layer uses redb (an embedded database) with a single byte-keyed
//! table. All state lives in one keyspace, discriminated by key shape:
//!
//! - `0x00 || felt`: Pedersen preimages (two concatenated felts)
//! - `0x01 || felt`: serialized trie nodes, addressed by content hash
//! - well-known text keys (`state_root`, `latestBlockSynced`, `contract_hash:…`)
//!
//! Mutation happens through [`StateTransaction`], a single-writer redb write
//! transaction: either every write in a transaction commits or none does.
//! Readers open [`StateSnapshot`]s, which observe the last committed state and
//! are unaffected by a concurrently open writer.

mod error;
mod kv;

pub use error::{StorageError, StorageResult};
pub use kv::{KvRead, KvStore, MemStore};

use std::path::Path;

use redb::{Database, ReadTransaction, ReadableTable, TableDefinition, WriteTransaction};

/// The single table holding all persisted state.
const STATE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("state");

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Database path
    pub path: std::path::PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: std::path::PathBuf::from("./tessera_data"),
        }
    }
}

/// Handle to the on-disk state database.
pub struct StateDb {
    db: Database,
    config: StorageConfig,
}

impl StateDb {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let config = StorageConfig {
            path: path.as_ref().to_path_buf(),
        };
        Self::with_config(config)
    }

    /// Open the database with custom configuration.
    pub fn with_config(config: StorageConfig) -> StorageResult<Self> {
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(&config.path)?;

        // Make sure the table exists so snapshots opened before the first
        // write do not fail.
        let init = db.begin_write()?;
        init.open_table(STATE)?;
        init.commit()?;

        Ok(Self { db, config })
    }

    /// Get storage configuration.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Begin a write transaction.
    ///
    /// redb serializes writers, so at most one [`StateTransaction`] is live at
    /// a time; this call blocks until the previous writer finishes.
    pub fn begin(&self) -> StorageResult<StateTransaction> {
        Ok(StateTransaction {
            txn: self.db.begin_write()?,
        })
    }

    /// Open a read snapshot of the last committed state.
    pub fn snapshot(&self) -> StorageResult<StateSnapshot> {
        Ok(StateSnapshot {
            txn: self.db.begin_read()?,
        })
    }
}

/// A single-writer transaction over the state table.
///
/// Writes are buffered in the transaction and become visible to snapshots
/// only after [`commit`](Self::commit); [`rollback`](Self::rollback) discards
/// them all. Reads through the transaction observe its own pending writes.
pub struct StateTransaction {
    txn: WriteTransaction,
}

impl StateTransaction {
    /// Commit every write performed through this transaction.
    pub fn commit(self) -> StorageResult<()> {
        self.txn.commit()?;
        Ok(())
    }

    /// Discard every write performed through this transaction.
    pub fn rollback(self) -> StorageResult<()> {
        self.txn.abort()?;
        Ok(())
    }
}

impl KvRead for StateTransaction {
    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        let table = self.txn.open_table(STATE)?;
        let result = table.get(key)?.map(|guard| guard.value().to_vec());
        Ok(result)
    }
}

impl KvStore for StateTransaction {
    fn put(&self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        let mut table = self.txn.open_table(STATE)?;
        table.insert(key, value)?;
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> StorageResult<()> {
        let mut table = self.txn.open_table(STATE)?;
        table.remove(key)?;
        Ok(())
    }
}

/// A consistent read-only view of the last committed state.
pub struct StateSnapshot {
    txn: ReadTransaction,
}

impl KvRead for StateSnapshot {
    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        let table = self.txn.open_table(STATE)?;
        let result = table.get(key)?.map(|guard| guard.value().to_vec());
        Ok(result)
    }
}
