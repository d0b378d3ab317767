use thiserror::Error;

use pwi_ledger::{ErrorKind, LedgerError};

#[derive(Debug, Error)]
pub enum ChaincodeError {
    #[error("received unknown function {entry_point}: {function}")]
    UnknownFunction {
        entry_point: &'static str,
        function: String,
    },

    #[error("incorrect number of arguments for {function}: expecting {expected}, got {actual}")]
    ArgumentCount {
        function: &'static str,
        expected: &'static str,
        actual: usize,
    },

    #[error("response encoding failed: {0}")]
    Encoding(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ChaincodeError {
    /// The caller-facing error class. Dispatch failures are validation
    /// failures.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownFunction { .. } | Self::ArgumentCount { .. } => ErrorKind::Validation,
            Self::Encoding(_) => ErrorKind::Store,
            Self::Ledger(e) => e.kind(),
        }
    }
}

pub type ChaincodeResult<T> = Result<T, ChaincodeError>;
