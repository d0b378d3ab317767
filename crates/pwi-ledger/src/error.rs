use std::fmt;

use pwi_store::StoreError;

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid argument: {0}")]
    Validation(String),

    #[error("this {kind} already exists: {name}")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },

    #[error("failed to get state for {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("corrupt record at {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("store error: {0}")]
    Store(String),

    #[error("invalid ledger config: {0}")]
    Config(String),
}

impl LedgerError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn read_failed(key: &str, err: StoreError) -> Self {
        Self::ReadFailed {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn write_failed(key: &str, err: StoreError) -> Self {
        Self::Store(format!("failed to put state for {key}: {err}"))
    }

    /// The caller-facing error class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Config(_) => ErrorKind::Validation,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::NotFound { .. } | Self::ReadFailed { .. } => ErrorKind::NotFound,
            Self::Corrupt { .. } | Self::Store(_) => ErrorKind::Store,
        }
    }
}

/// Coarse error classes surfaced to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong argument count, empty required field, or non-integer number.
    Validation,
    /// Duplicate primary key on create.
    AlreadyExists,
    /// Store read failure or missing record.
    NotFound,
    /// Store write failure or unreadable reserved record.
    Store,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "ValidationError"),
            Self::AlreadyExists => write!(f, "AlreadyExistsError"),
            Self::NotFound => write!(f, "NotFoundError"),
            Self::Store => write!(f, "StoreError"),
        }
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
