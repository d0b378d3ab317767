/// Errors from state store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend failed to read the value at `key`.
    #[error("failed to read {key:?}: {reason}")]
    Read { key: String, reason: String },

    /// The backend failed to write the value at `key`.
    #[error("failed to write {key:?}: {reason}")]
    Write { key: String, reason: String },

    /// The snapshot file could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A previous holder of the store lock panicked.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
