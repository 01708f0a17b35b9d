//! State pipeline errors

use tessera_crypto::felt;
use tessera_crypto::{Felt, FeltError};
use tessera_storage::StorageError;
use tessera_trie::TrieError;
use thiserror::Error;

/// State result type
pub type StateResult<T> = Result<T, StateError>;

/// State pipeline errors
#[derive(Error, Debug)]
pub enum StateError {
    /// Storage error
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Trie error
    #[error("trie error: {0}")]
    Trie(#[from] TrieError),

    /// Caller-supplied field element failed to parse
    #[error("invalid input: {0}")]
    InvalidInput(#[from] FeltError),

    /// A persisted state entry failed to decode
    #[error("invalid persisted value: {0}")]
    InvalidValue(String),

    /// Computed root differs from the authoritative root
    #[error(
        "state root mismatch: expected {}, computed {}",
        felt::to_hex(.expected),
        felt::to_hex(.computed)
    )]
    RootMismatch {
        /// Root the caller expected
        expected: Felt,
        /// Root this update actually produced
        computed: Felt,
    },

    /// Storage diff for a contract with no recorded class hash
    #[error("no class hash recorded for contract {0}")]
    UnknownContract(String),

    /// The update was cancelled between store operations
    #[error("state update cancelled")]
    Cancelled,
}
