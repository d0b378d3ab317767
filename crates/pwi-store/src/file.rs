use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::StateStore;

/// State store persisted as a single JSON snapshot file.
///
/// On-disk format is one JSON object mapping each key to the hex encoding of
/// its value:
/// ```text
/// {"_farmindex": "5b226631225d", "abc": "3432"}
/// ```
///
/// The whole file is rewritten on every `put` through a temporary file in the
/// same directory followed by a rename, so a crash never leaves a torn file.
pub struct FileStateStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl FileStateStore {
    /// Open the snapshot at `path`, starting empty if the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read(&path) {
            Ok(raw) => decode_snapshot(&raw)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = entries.len(), "opened state file");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn flush(&self, entries: &BTreeMap<String, Vec<u8>>) -> StoreResult<()> {
        let encoded: BTreeMap<&str, String> = entries
            .iter()
            .map(|(k, v)| (k.as_str(), hex::encode(v)))
            .collect();
        let json = serde_json::to_vec_pretty(&encoded)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

fn decode_snapshot(raw: &[u8]) -> StoreResult<BTreeMap<String, Vec<u8>>> {
    if raw.is_empty() {
        return Ok(BTreeMap::new());
    }
    let encoded: BTreeMap<String, String> =
        serde_json::from_slice(raw).map_err(|e| StoreError::Serialization(e.to_string()))?;
    encoded
        .into_iter()
        .map(|(k, v)| {
            let bytes = hex::decode(&v).map_err(|e| StoreError::Read {
                key: k.clone(),
                reason: format!("invalid hex value: {e}"),
            })?;
            Ok((k, bytes))
        })
        .collect()
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut map = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        let previous = map.insert(key.to_string(), value.to_vec());
        if let Err(e) = self.flush(&map) {
            // Keep memory consistent with what is on disk.
            match previous {
                Some(old) => map.insert(key.to_string(), old),
                None => map.remove(key),
            };
            return Err(StoreError::Write {
                key: key.to_string(),
                reason: e.to_string(),
            });
        }
        debug!(key, bytes = value.len(), "state file updated");
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.keys().cloned().collect())
    }
}

impl std::fmt::Debug for FileStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStateStore")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::open(dir.path().join("state.json")).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        {
            let store = FileStateStore::open(&path).unwrap();
            store.put("abc", b"42").unwrap();
            store.put("blank", b"").unwrap();
        }
        let store = FileStateStore::open(&path).unwrap();
        assert_eq!(store.get("abc").unwrap(), Some(b"42".to_vec()));
        assert_eq!(store.get("blank").unwrap(), Some(Vec::new()));
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn file_is_hex_encoded_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = FileStateStore::open(&path).unwrap();
        store.put("k", b"hi").unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.get("k").map(String::as_str), Some("6869"));
    }

    #[test]
    fn corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"not json").unwrap();
        let err = FileStateStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn bad_hex_value_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, br#"{"k":"zz"}"#).unwrap();
        let err = FileStateStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[test]
    fn failed_flush_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("ledger");
        fs::create_dir(&sub).unwrap();
        let store = FileStateStore::open(sub.join("state.json")).unwrap();
        store.put("k", b"old").unwrap();

        fs::remove_dir_all(&sub).unwrap();
        let err = store.put("k", b"new").unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(store.get("k").unwrap(), Some(b"old".to_vec()));

        assert!(store.put("fresh", b"v").is_err());
        assert!(store.get("fresh").unwrap().is_none());
    }

    #[test]
    fn empty_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"").unwrap();
        let store = FileStateStore::open(&path).unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
