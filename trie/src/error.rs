//! Trie errors

use thiserror::Error;
use tessera_storage::StorageError;

/// Trie result type
pub type TrieResult<T> = Result<T, TrieError>;

/// Trie errors
#[derive(Error, Debug)]
pub enum TrieError {
    /// A node or key expected to be in the store is absent
    #[error("not found")]
    NotFound,

    /// A persisted entry failed to decode
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Underlying key-value store failure
    #[error("storage error: {0}")]
    Store(#[from] StorageError),
}
