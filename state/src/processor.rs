//! The state-update pipeline.
//!
//! [`StateProcessor::apply`] takes one [`StateDiff`] plus the root the
//! authoritative source claims it produces, replays the diff against the
//! two-level trie structure inside a single write transaction, verifies the
//! recomputed global root, and commits. Any failure rolls the transaction
//! back, so the store never holds a partially applied diff.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use tessera_crypto::{felt, Felt};
use tessera_storage::{KvRead, KvStore, StateDb, StateTransaction};
use tessera_trie::{NodeStore, Trie, TRIE_HEIGHT};

use crate::contracts::ContractRegistry;
use crate::diff::StateDiff;
use crate::error::{StateError, StateResult};

/// Key holding the committed global state root, as unprefixed hex.
pub const STATE_ROOT_KEY: &[u8] = b"state_root";

/// Key holding the sequence number of the last applied diff, big-endian u64.
pub const LATEST_BLOCK_KEY: &[u8] = b"latestBlockSynced";

/// Applies state diffs to the global state trie.
///
/// Owns the database handle and the contract-hash index; all mutation runs
/// through [`apply`](Self::apply), one single-writer transaction per diff.
pub struct StateProcessor {
    db: StateDb,
    cancelled: Arc<AtomicBool>,
}

/// Handle for cancelling an in-flight state update.
///
/// Cancellation is cooperative: the processor observes the flag between store
/// operations, rolls back the open transaction, and fails with
/// [`StateError::Cancelled`]. The flag is sticky; a cancelled processor
/// stays cancelled.
#[derive(Debug, Clone)]
pub struct CancellationHandle(Arc<AtomicBool>);

impl CancellationHandle {
    /// Request cancellation of the current and any future update.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl StateProcessor {
    /// Create a processor over the given database.
    pub fn new(db: StateDb) -> Self {
        Self {
            db,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The underlying database handle.
    pub fn db(&self) -> &StateDb {
        &self.db
    }

    /// A handle that cancels in-flight updates.
    pub fn cancellation(&self) -> CancellationHandle {
        CancellationHandle(Arc::clone(&self.cancelled))
    }

    /// The committed global state root, zero before the first commit.
    pub fn state_root(&self) -> StateResult<Felt> {
        let snapshot = self.db.snapshot()?;
        stored_root(&snapshot)
    }

    /// Sequence number of the last committed diff, if any.
    pub fn latest_block(&self) -> StateResult<Option<u64>> {
        let snapshot = self.db.snapshot()?;
        match snapshot.get(LATEST_BLOCK_KEY)? {
            None => Ok(None),
            Some(bytes) => {
                let bytes: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    StateError::InvalidValue("latestBlockSynced is not 8 bytes".into())
                })?;
                Ok(Some(u64::from_be_bytes(bytes)))
            }
        }
    }

    /// Apply one state diff and commit the new global root.
    ///
    /// When `expected_root` is given and the recomputed root differs, nothing
    /// is committed and the call fails with [`StateError::RootMismatch`].
    /// That mismatch is not retryable for this diff; the caller must re-fetch
    /// authoritative state. Every other error likewise rolls back the whole
    /// transaction.
    pub fn apply(
        &self,
        diff: &StateDiff,
        expected_root: Option<Felt>,
        sequence_number: u64,
    ) -> StateResult<Felt> {
        let txn = self.db.begin()?;
        match self.apply_diff(&txn, diff, expected_root, sequence_number) {
            Ok(new_root) => {
                txn.commit()?;
                info!(
                    block = sequence_number,
                    root = %felt::to_hex(&new_root),
                    "state committed"
                );
                Ok(new_root)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback() {
                    warn!(block = sequence_number, error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    fn apply_diff(
        &self,
        txn: &StateTransaction,
        diff: &StateDiff,
        expected_root: Option<Felt>,
        sequence_number: u64,
    ) -> StateResult<Felt> {
        let mut state_trie = Trie::new(txn, stored_root(txn)?, TRIE_HEIGHT)?;
        let registry = ContractRegistry::new(txn);
        let nodes = NodeStore::new(txn);

        // Deployments run first so storage diffs for contracts deployed in
        // this same diff find their class hash recorded.
        debug!(
            block = sequence_number,
            count = diff.deployed_contracts.len(),
            "processing deployed contracts"
        );
        for contract in &diff.deployed_contracts {
            self.check_cancelled()?;
            registry.record(&contract.address, &contract.class_hash)?;

            let storage_root = match state_trie.get(&contract.address)? {
                Some(leaf) => storage_root_of_leaf(&nodes, &leaf)?,
                None => Felt::ZERO,
            };
            let storage_trie = Trie::new(txn, storage_root, TRIE_HEIGHT)?;
            let leaf = contract_state_leaf(
                &nodes,
                &contract.class_hash,
                &storage_trie.root_hash(),
            )?;
            state_trie.put(&contract.address, &leaf)?;
        }

        debug!(
            block = sequence_number,
            count = diff.storage_diffs.len(),
            "processing storage diffs"
        );
        for (address, entries) in &diff.storage_diffs {
            self.check_cancelled()?;
            let class_hash = registry
                .class_hash(address)?
                .ok_or_else(|| StateError::UnknownContract(felt::to_hex(address)))?;

            let storage_root = match state_trie.get(address)? {
                Some(leaf) => storage_root_of_leaf(&nodes, &leaf)?,
                None => Felt::ZERO,
            };
            let mut storage_trie = Trie::new(txn, storage_root, TRIE_HEIGHT)?;
            for entry in entries {
                storage_trie.put(&entry.key, &entry.value)?;
            }

            // The leaf commits to the post-mutation storage root.
            let leaf = contract_state_leaf(&nodes, &class_hash, &storage_trie.root_hash())?;
            state_trie.put(address, &leaf)?;
        }

        let new_root = state_trie.root_hash();
        if let Some(expected) = expected_root {
            if new_root != expected {
                return Err(StateError::RootMismatch {
                    expected,
                    computed: new_root,
                });
            }
        }

        txn.put(STATE_ROOT_KEY, felt::to_hex_unprefixed(&new_root).as_bytes())?;
        txn.put(LATEST_BLOCK_KEY, &sequence_number.to_be_bytes())?;
        Ok(new_root)
    }

    fn check_cancelled(&self) -> StateResult<()> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Err(StateError::Cancelled);
        }
        Ok(())
    }
}

/// Read the committed root from the store, zero when none was written yet.
fn stored_root<S: KvRead>(store: &S) -> StateResult<Felt> {
    match store.get(STATE_ROOT_KEY)? {
        None => Ok(Felt::ZERO),
        Some(bytes) => {
            let text = std::str::from_utf8(&bytes)
                .map_err(|_| StateError::InvalidValue("state_root is not utf-8".into()))?;
            felt::from_hex(text).map_err(|err| StateError::InvalidValue(err.to_string()))
        }
    }
}

/// Compute `C(class_hash, storage_root) = P(P(P(class_hash, storage_root), 0), 0)`,
/// persisting each pair so the leaf can later be decoded again.
fn contract_state_leaf<S: KvStore>(
    nodes: &NodeStore<S>,
    class_hash: &Felt,
    storage_root: &Felt,
) -> StateResult<Felt> {
    let value = nodes.digest(class_hash, storage_root)?;
    let value = nodes.digest(&value, &Felt::ZERO)?;
    Ok(nodes.digest(&value, &Felt::ZERO)?)
}

/// Recover the storage root committed in a contract-state leaf by peeling the
/// three stored Pedersen pairs back off.
fn storage_root_of_leaf<S: KvRead>(nodes: &NodeStore<S>, leaf: &Felt) -> StateResult<Felt> {
    let (middle, zero_outer) = nodes.retrieve_pair(leaf)?;
    let (inner, zero_middle) = nodes.retrieve_pair(&middle)?;
    if zero_outer != Felt::ZERO || zero_middle != Felt::ZERO {
        return Err(StateError::InvalidValue(format!(
            "contract state leaf {} does not decode",
            felt::to_hex(leaf)
        )));
    }
    let (_class_hash, storage_root) = nodes.retrieve_pair(&inner)?;
    Ok(storage_root)
}
