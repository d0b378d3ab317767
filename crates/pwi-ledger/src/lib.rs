//! Indexed ledger state engine for parametric weather insurance (PWI).
//!
//! This crate is the heart of PWI. It provides:
//! - Reserved key names for the index sequences and the insurance book
//! - `IndexRegistry`: append-only name sequences for farm/user enumeration
//! - `EntityRepository`: typed create/lookup over farms, users, and contracts
//! - `WeatherHistoryAnalyzer`: trailing-window payout condition
//! - `SettlementEngine`: `active → solved` transition with beneficiary payout
//! - `Ledger`: facade tying the above to one store and one configuration
//!
//! Every operation re-reads the state it mutates. Callers are responsible for
//! serializing operations against the same store.

pub mod analyzer;
mod codec;
pub mod config;
pub mod error;
pub mod index;
pub mod keys;
pub mod ledger;
pub mod repository;
pub mod settlement;

pub use analyzer::WeatherHistoryAnalyzer;
pub use config::{LedgerConfig, TriggerConfig};
pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use index::IndexRegistry;
pub use ledger::{Ledger, WeatherUpdate};
pub use repository::EntityRepository;
pub use settlement::{Payout, SettlementEngine};

#[cfg(test)]
pub(crate) mod testing;
