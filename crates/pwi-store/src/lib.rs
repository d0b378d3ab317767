//! Key-addressed state storage for the parametric weather insurance ledger.
//!
//! The ledger keeps every record (farms, users, index sequences, the
//! insurance book, and free-form values) as opaque bytes under a string key.
//! This crate defines that boundary and ships two backends.
//!
//! # Storage Backends
//!
//! All backends implement the [`StateStore`] trait:
//!
//! - [`InMemoryStateStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`FileStateStore`] -- JSON snapshot file rewritten on every `put`
//!
//! # Design Rules
//!
//! 1. The store never interprets values -- it is a pure key-value store.
//! 2. `get` on a missing key is `Ok(None)`, not an error.
//! 3. Each `put` is atomic on its own; there are no multi-key transactions.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileStateStore;
pub use memory::InMemoryStateStore;
pub use traits::StateStore;
