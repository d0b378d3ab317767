//! Store access and argument parsing shared by the index and repository.

use serde::de::DeserializeOwned;
use serde::Serialize;

use pwi_store::StateStore;

use crate::error::{LedgerError, LedgerResult};

pub(crate) fn fetch<S: StateStore + ?Sized>(store: &S, key: &str) -> LedgerResult<Option<Vec<u8>>> {
    let value = store
        .get(key)
        .map_err(|e| LedgerError::read_failed(key, e))?;
    tracing::debug!(key, found = value.is_some(), "get state");
    Ok(value)
}

pub(crate) fn persist<S: StateStore + ?Sized>(store: &S, key: &str, value: &[u8]) -> LedgerResult<()> {
    store
        .put(key, value)
        .map_err(|e| LedgerError::write_failed(key, e))?;
    tracing::debug!(key, bytes = value.len(), "put state");
    Ok(())
}

pub(crate) fn encode<T: Serialize>(key: &str, value: &T) -> LedgerResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| LedgerError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Decode a reserved aggregate. Absent, zero-length, and JSON `null` values
/// all read as `T::default()`.
pub(crate) fn decode_or_default<T>(key: &str, raw: Option<Vec<u8>>) -> LedgerResult<T>
where
    T: DeserializeOwned + Default,
{
    match raw {
        Some(bytes) if !bytes.is_empty() => {
            let value: Option<T> =
                serde_json::from_slice(&bytes).map_err(|e| LedgerError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                })?;
            Ok(value.unwrap_or_default())
        }
        _ => Ok(T::default()),
    }
}

pub(crate) fn require_non_empty(position: &str, value: &str) -> LedgerResult<()> {
    if value.is_empty() {
        return Err(LedgerError::validation(format!(
            "{position} argument must be a non-empty string"
        )));
    }
    Ok(())
}

pub(crate) fn parse_int(field: &str, token: &str) -> LedgerResult<i64> {
    token
        .parse::<i64>()
        .map_err(|_| LedgerError::validation(format!("{field} is not a numeric string: {token:?}")))
}
