//! The content-addressed node store.
//!
//! Two keyspaces share one key-value store, discriminated by a one-byte tag:
//! nodes live under their hash, and every Pedersen digest the trie computes is
//! stored with its argument pair so traversal can later recover the children
//! of a binary node. Pedersen is not invertible; the pair table is what makes
//! the lookup possible, and it must stay consistent with the node table.

use tessera_crypto::{felt, pedersen_hash, Felt};
use tessera_storage::{KvRead, KvStore};

use crate::error::{TrieError, TrieResult};
use crate::node::Node;

/// Key tag for the Pedersen preimage keyspace.
pub const PAIR_TAG: u8 = 0x00;
/// Key tag for the node keyspace.
pub const NODE_TAG: u8 = 0x01;

fn tagged_key(tag: u8, hash: &Felt) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + felt::FELT_LENGTH);
    key.push(tag);
    key.extend_from_slice(&hash.to_bytes_be());
    key
}

/// Content-addressed access to trie nodes and Pedersen pairs.
pub struct NodeStore<'s, S> {
    store: &'s S,
}

impl<'s, S> NodeStore<'s, S> {
    /// Wrap a key-value store handle.
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }
}

impl<S: KvRead> NodeStore<'_, S> {
    /// Load the node stored under its hash.
    pub fn retrieve_node(&self, hash: &Felt) -> TrieResult<Node> {
        let Some(bytes) = self.store.get(&tagged_key(NODE_TAG, hash))? else {
            return Err(TrieError::NotFound);
        };
        serde_json::from_slice(&bytes)
            .map_err(|err| TrieError::InvalidValue(format!("node {}: {err}", felt::to_hex(hash))))
    }

    /// Recover the argument pair of a previously stored Pedersen digest.
    pub fn retrieve_pair(&self, digest: &Felt) -> TrieResult<(Felt, Felt)> {
        let Some(bytes) = self.store.get(&tagged_key(PAIR_TAG, digest))? else {
            return Err(TrieError::NotFound);
        };
        if bytes.len() != 2 * felt::FELT_LENGTH {
            return Err(TrieError::InvalidValue(format!(
                "pedersen pair for {} is {} bytes, want {}",
                felt::to_hex(digest),
                bytes.len(),
                2 * felt::FELT_LENGTH
            )));
        }
        let left = felt::from_be_slice(&bytes[..felt::FELT_LENGTH])
            .map_err(|err| TrieError::InvalidValue(err.to_string()))?;
        let right = felt::from_be_slice(&bytes[felt::FELT_LENGTH..])
            .map_err(|err| TrieError::InvalidValue(err.to_string()))?;
        Ok((left, right))
    }
}

impl<S: KvStore> NodeStore<'_, S> {
    /// Persist a node under its hash and return the hash.
    pub fn store_node(&self, node: &Node) -> TrieResult<Felt> {
        let hash = node.hash();
        let bytes = serde_json::to_vec(node)
            .map_err(|err| TrieError::InvalidValue(err.to_string()))?;
        self.store.put(&tagged_key(NODE_TAG, &hash), &bytes)?;
        Ok(hash)
    }

    /// Compute `P(a, b)`, persist the pair under the digest, return the digest.
    pub fn digest(&self, a: &Felt, b: &Felt) -> TrieResult<Felt> {
        let digest = pedersen_hash(a, b);
        let mut pair = Vec::with_capacity(2 * felt::FELT_LENGTH);
        pair.extend_from_slice(&a.to_bytes_be());
        pair.extend_from_slice(&b.to_bytes_be());
        self.store.put(&tagged_key(PAIR_TAG, &digest), &pair)?;
        Ok(digest)
    }
}
