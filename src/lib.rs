//! TESSERA: Starknet State Commitment Engine
//!
//! This is the root crate that re-exports all Tessera components for
//! integration testing and provides unified access to the engine.
//!
//! ## Architecture Overview
//!
//! Tessera maintains Starknet state as a height-251 binary Merkle-Patricia
//! trie over field elements and recomputes the global state root from
//! per-block `StateDiff` records:
//!
//! - **Content-addressed persistence**: trie nodes are immutable, stored
//!   under their own hash, and shared across versions of the state
//! - **Pedersen commitments**: every branch digest is persisted with its
//!   argument pair, so traversal can walk back down through binary nodes
//! - **Two-level state**: a global trie of contract-state leaves, each
//!   committing to a per-contract storage trie
//! - **Atomic updates**: one single-writer transaction per diff, verified
//!   against the authoritative root before commit
//!
//! ## Crate Organization
//!
//! - `tessera-crypto`: field element codecs and the Pedersen digest
//! - `tessera-trie`: bit paths, nodes, the node store, and the trie
//! - `tessera-storage`: redb-backed key-value store and transactions
//! - `tessera-state`: state diffs and the update pipeline

pub use tessera_crypto as crypto;
pub use tessera_state as state;
pub use tessera_storage as storage;
pub use tessera_trie as trie;

/// Tessera engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use tessera_crypto::{contract_state_hash, pedersen_hash, Felt};
    pub use tessera_state::{StateDiff, StateError, StateProcessor};
    pub use tessera_storage::{KvRead, KvStore, MemStore, StateDb};
    pub use tessera_trie::{BitPath, Node, Trie, TrieError, TRIE_HEIGHT};
}
