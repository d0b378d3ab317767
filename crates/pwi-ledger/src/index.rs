use pwi_store::StateStore;

use crate::codec::{decode_or_default, encode, fetch, persist};
use crate::error::LedgerResult;

/// Append-only sequences of entity names stored under reserved keys.
///
/// The registry is a write-time record of creations, used for enumeration.
/// It does not check for duplicates; uniqueness is enforced by the
/// repository before it appends.
pub struct IndexRegistry<'a, S: StateStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: StateStore + ?Sized> IndexRegistry<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Append `name` to the sequence under `index_key`.
    ///
    /// A missing sequence is treated as empty. On success `name` is the last
    /// element and the prior order is preserved.
    pub fn append(&self, index_key: &str, name: &str) -> LedgerResult<()> {
        let mut names = self.list(index_key)?;
        names.push(name.to_string());
        let bytes = encode(index_key, &names)?;
        persist(self.store, index_key, &bytes)?;
        tracing::debug!(index = index_key, name, len = names.len(), "index appended");
        Ok(())
    }

    /// The sequence under `index_key`, oldest first.
    pub fn list(&self, index_key: &str) -> LedgerResult<Vec<String>> {
        let raw = fetch(self.store, index_key)?;
        decode_or_default(index_key, raw)
    }

    /// Replace the sequence under `index_key` with an empty one.
    pub fn reset(&self, index_key: &str) -> LedgerResult<()> {
        let bytes = encode(index_key, &Vec::<String>::new())?;
        persist(self.store, index_key, &bytes)
    }
}
