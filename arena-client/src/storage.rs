//! Local device storage
//!
//! A tiny key-value store: one file per key inside the client's root folder.
//! Writes go to a temporary file first and are renamed into place, so a crash
//! never leaves a half-written value behind.

use arena_common::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key holding the client's voter identity
pub const CLIENT_ID_KEY: &str = "hw_arena_client_id";

/// Key holding the JSON-serialized local vote ledger
pub const VOTES_KEY: &str = "hw_arena_votes_v1";

/// File-backed key-value storage
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    /// Open storage in `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read a value; `None` when the key was never written
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let target = self.path(key);
        let tmp = self.dir.join(format!(".{}.tmp", key));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &target)?;
        Ok(())
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_is_none() {
        let temp = TempDir::new().unwrap();
        let storage = LocalStorage::open(temp.path()).unwrap();
        assert_eq!(storage.get(CLIENT_ID_KEY).unwrap(), None);
    }

    #[test]
    fn test_set_then_get_overwrites() {
        let temp = TempDir::new().unwrap();
        let storage = LocalStorage::open(temp.path().join("client")).unwrap();

        storage.set(VOTES_KEY, "[]").unwrap();
        storage.set(VOTES_KEY, "[1]").unwrap();
        assert_eq!(storage.get(VOTES_KEY).unwrap().as_deref(), Some("[1]"));

        // No temporary file left behind
        let names: Vec<_> = std::fs::read_dir(storage.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(VOTES_KEY)]);
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp = TempDir::new().unwrap();
        LocalStorage::open(temp.path())
            .unwrap()
            .set(CLIENT_ID_KEY, "c_abc")
            .unwrap();

        let reopened = LocalStorage::open(temp.path()).unwrap();
        assert_eq!(reopened.get(CLIENT_ID_KEY).unwrap().as_deref(), Some("c_abc"));
    }
}
