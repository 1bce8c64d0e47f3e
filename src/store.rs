use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Key under which the serialized appointment ledger is stored.
pub const APPOINTMENTS_KEY: &str = "appointments";

/// File-backed key-value store holding one JSON blob per key.
///
/// Values are always written wholesale, never patched. Reads and writes
/// return explicit Results; whether a failure matters is the caller's
/// policy, not the store's.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        JsonStore {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Reads the blob stored under `key`. A missing key is `Ok(None)`.
    pub fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    /// Overwrites the blob stored under `key`.
    pub fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.key_path(key), value)?;
        Ok(())
    }

    /// Removes the blob stored under `key`, if present.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        assert!(store.read("nothing").unwrap().is_none());
    }

    #[test]
    fn write_read_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        store.write("blob", "[1,2,3]").unwrap();
        assert_eq!(store.read("blob").unwrap().as_deref(), Some("[1,2,3]"));

        store.write("blob", "[]").unwrap();
        assert_eq!(store.read("blob").unwrap().as_deref(), Some("[]"));

        store.delete("blob").unwrap();
        assert!(store.read("blob").unwrap().is_none());
        // Deleting again is not an error
        store.delete("blob").unwrap();
    }

    #[test]
    fn write_creates_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested/data"));
        store.write("blob", "{}").unwrap();
        assert_eq!(store.read("blob").unwrap().as_deref(), Some("{}"));
    }
}
