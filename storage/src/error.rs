//! Storage errors

use thiserror::Error;

/// Storage result type
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] redb::DatabaseError),

    /// Transaction error
    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    /// Table error
    #[error("table error: {0}")]
    Table(#[from] redb::TableError),

    /// Storage error
    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),

    /// Commit error
    #[error("commit error: {0}")]
    Commit(#[from] redb::CommitError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
