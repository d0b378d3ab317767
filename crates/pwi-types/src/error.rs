use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown contract state: {0:?}")]
    UnknownState(String),

    #[error("illegal contract transition: {from} -> {to}")]
    IllegalTransition { from: String, to: String },
}
