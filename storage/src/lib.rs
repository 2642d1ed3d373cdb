//! Aerial Storage Layer - Sled-Backed State
//!
//! Durable implementation of the chaincode state accessor:
//! - Single sled tree holding balances, funding ledgers and parameters
//! - Each invocation's changeset applied as one atomic batch
//! - Flushed after every commit so state survives a restart

use aerial_core::{Changeset, LedgerError, StateStore};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Failed to open {path}: {source}")]
    Open { path: String, source: sled::Error },
}

impl From<StorageError> for LedgerError {
    fn from(err: StorageError) -> Self {
        LedgerError::StateAccess(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone)]
pub struct SledStore {
    db: sled::Db,
    path: Option<PathBuf>,
}

impl SledStore {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let db = sled::open(&path).map_err(|source| StorageError::Open {
            path: path.display().to_string(),
            source,
        })?;

        log::info!("opened state database at {}", path.display());
        Ok(Self {
            db,
            path: Some(path),
        })
    }

    /// Throwaway database removed on drop
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db, path: None })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl StateStore for SledStore {
    fn get(&self, key: &[u8]) -> aerial_core::Result<Option<Vec<u8>>> {
        let value = self.db.get(key).map_err(StorageError::from)?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn put(&mut self, key: &[u8], value: Vec<u8>) -> aerial_core::Result<()> {
        self.db.insert(key, value).map_err(StorageError::from)?;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> aerial_core::Result<()> {
        self.db.remove(key).map_err(StorageError::from)?;
        Ok(())
    }

    fn apply(&mut self, changes: Changeset) -> aerial_core::Result<()> {
        let mut batch = sled::Batch::default();
        for (key, value) in changes {
            match value {
                Some(value) => batch.insert(key, value),
                None => batch.remove(key),
            }
        }

        self.db.apply_batch(batch).map_err(StorageError::from)?;
        // Flush to ensure the invocation is durable before reporting success
        self.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerial_core::StagedState;
    use tempfile::tempdir;

    #[test]
    fn test_put_get_delete() {
        let mut store = SledStore::temporary().unwrap();

        store.put(b"alice", b"10".to_vec()).unwrap();
        assert_eq!(store.get(b"alice").unwrap(), Some(b"10".to_vec()));

        store.delete(b"alice").unwrap();
        assert_eq!(store.get(b"alice").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_staged_commit_applies_batch() {
        let mut store = SledStore::temporary().unwrap();
        store.put(b"bob", b"1".to_vec()).unwrap();

        let mut staged = StagedState::new(&mut store);
        staged.put(b"alice", b"5".to_vec()).unwrap();
        staged.delete(b"bob").unwrap();
        staged.commit().unwrap();

        assert_eq!(store.get(b"alice").unwrap(), Some(b"5".to_vec()));
        assert_eq!(store.get(b"bob").unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state");

        {
            let mut store = SledStore::open(&path).unwrap();
            let mut staged = StagedState::new(&mut store);
            staged.put(b"alice", b"42".to_vec()).unwrap();
            staged.commit().unwrap();
        }

        let store = SledStore::open(&path).unwrap();
        assert_eq!(store.get(b"alice").unwrap(), Some(b"42".to_vec()));
        assert_eq!(store.path(), Some(path.as_path()));
    }
}
