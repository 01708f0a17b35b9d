//! The contract-hash index.
//!
//! Maps a contract address to its class hash, persisted beside the trie store
//! under the `contract_hash:` key prefix. Written when a deployment is
//! processed, read when a storage-only diff needs to recompute the contract's
//! state leaf.

use tessera_crypto::{felt, Felt};
use tessera_storage::{KvRead, KvStore};

use crate::error::StateResult;

/// Key prefix for persisted class hashes.
pub const CONTRACT_HASH_PREFIX: &str = "contract_hash:";

fn index_key(address: &Felt) -> Vec<u8> {
    format!("{CONTRACT_HASH_PREFIX}{}", felt::to_hex_unprefixed(address)).into_bytes()
}

/// Store-backed `address → class_hash` mapping.
///
/// Lives inside whatever transaction the handle belongs to: writes commit or
/// roll back with the enclosing state update, and reads outside a transaction
/// reflect the last commit.
pub struct ContractRegistry<'s, S> {
    store: &'s S,
}

impl<'s, S> ContractRegistry<'s, S> {
    /// Wrap a key-value store handle.
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }
}

impl<S: KvRead> ContractRegistry<'_, S> {
    /// The class hash recorded for `address`, if any.
    pub fn class_hash(&self, address: &Felt) -> StateResult<Option<Felt>> {
        match self.store.get(&index_key(address))? {
            None => Ok(None),
            Some(bytes) => Ok(Some(felt::from_be_slice(&bytes).map_err(|err| {
                crate::error::StateError::InvalidValue(format!(
                    "class hash for {}: {err}",
                    felt::to_hex(address)
                ))
            })?)),
        }
    }
}

impl<S: KvStore> ContractRegistry<'_, S> {
    /// Record the class hash for `address`, replacing any previous value.
    pub fn record(&self, address: &Felt, class_hash: &Felt) -> StateResult<()> {
        self.store
            .put(&index_key(address), &felt::to_be_bytes_minimal(class_hash))?;
        Ok(())
    }
}
