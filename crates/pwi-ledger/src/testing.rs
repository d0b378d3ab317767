//! Store doubles for exercising failure paths.

use pwi_store::{InMemoryStateStore, StateStore, StoreError, StoreResult};

/// In-memory store that fails selected calls.
pub struct FlakyStore {
    inner: InMemoryStateStore,
    fail_gets: bool,
    fail_puts_to: Option<String>,
}

impl FlakyStore {
    pub fn failing_gets() -> Self {
        Self {
            inner: InMemoryStateStore::new(),
            fail_gets: true,
            fail_puts_to: None,
        }
    }

    pub fn failing_puts_to(key: &str) -> Self {
        Self {
            inner: InMemoryStateStore::new(),
            fail_gets: false,
            fail_puts_to: Some(key.to_string()),
        }
    }
}

impl StateStore for FlakyStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if self.fail_gets {
            return Err(StoreError::Read {
                key: key.to_string(),
                reason: "backend unavailable".into(),
            });
        }
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        if self.fail_puts_to.as_deref() == Some(key) {
            return Err(StoreError::Write {
                key: key.to_string(),
                reason: "disk full".into(),
            });
        }
        self.inner.put(key, value)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        self.inner.keys()
    }
}
