//! Record types for the parametric weather insurance ledger (PWI).
//!
//! Every record stored in the ledger is one of the types in this crate,
//! serialized as field-tagged JSON. Every other PWI crate depends on
//! `pwi-types`.
//!
//! # Key Types
//!
//! - [`WeatherReading`]: One observation appended to a farm's history
//! - [`Farm`]: An insured location with its append-only weather history
//! - [`User`]: A coin-holding account that can receive payouts
//! - [`InsuranceContract`]: A parametric policy binding a farm to a beneficiary
//! - [`ContractState`]: Monotonic `pending → active → solved` lifecycle
//! - [`InsuranceBook`]: The single aggregate record holding all contracts

pub mod error;
pub mod farm;
pub mod insurance;
pub mod temporal;
pub mod user;
pub mod weather;

pub use error::TypeError;
pub use farm::Farm;
pub use insurance::{ContractState, InsuranceBook, InsuranceContract};
pub use temporal::now_millis;
pub use user::User;
pub use weather::WeatherReading;
