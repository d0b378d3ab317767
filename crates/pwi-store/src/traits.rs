use crate::error::StoreResult;

/// Key-addressed byte store backing the ledger.
///
/// All implementations must satisfy these invariants:
/// - `get` returns exactly the bytes most recently `put` under the key.
/// - A missing key reads as `Ok(None)`. A zero-length value is a present
///   value, distinct from a missing one.
/// - The store never interprets values.
/// - The ledger issues calls one at a time; callers serialize whole
///   operations externally.
pub trait StateStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key has never been written.
    /// Returns `Err` on backend failure.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Overwrite the value stored under `key`.
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// All keys currently holding a value, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Check whether `key` holds a value.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
