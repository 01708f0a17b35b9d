//! Tessera State Pipeline
//!
//! Consumes per-block [`StateDiff`] records and maintains the two-level
//! Starknet state: one global trie mapping contract addresses to
//! contract-state leaves, and one storage trie per contract. Each diff is
//! applied inside a single write transaction and verified against the
//! authoritative root before committing.

pub mod contracts;
pub mod diff;
mod error;
pub mod processor;

pub use contracts::{ContractRegistry, CONTRACT_HASH_PREFIX};
pub use diff::{DeployedContract, RawStateDiff, StateDiff, StorageEntry};
pub use error::{StateError, StateResult};
pub use processor::{CancellationHandle, StateProcessor, LATEST_BLOCK_KEY, STATE_ROOT_KEY};
