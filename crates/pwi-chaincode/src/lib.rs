//! Command dispatch for the parametric weather insurance ledger.
//!
//! Callers address the ledger with a function name and an ordered list of
//! string arguments. This crate validates that pair into a typed
//! [`Command`] and runs it through a [`Chaincode`], which owns the
//! [`Ledger`](pwi_ledger::Ledger).
//!
//! Mutating commands go through [`Chaincode::invoke`]; reads go through
//! [`Chaincode::query`]. Each entry point rejects the other's functions.

pub mod chaincode;
pub mod command;
pub mod error;

pub use chaincode::Chaincode;
pub use command::{Command, Function};
pub use error::{ChaincodeError, ChaincodeResult};
