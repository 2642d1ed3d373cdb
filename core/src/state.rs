//! State accessor abstraction
//!
//! The host runtime hands every invocation a key-value store. Operations never
//! write to it directly: they go through a [`StagedState`] overlay and commit
//! once every precondition has passed, so a rejected invocation leaves the
//! store untouched.

use crate::error::Result;
use std::collections::BTreeMap;

/// Pending writes keyed by state key; `None` marks a deletion
pub type Changeset = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

/// Deterministic key-value store supplied by the host runtime
pub trait StateStore {
    /// Read a value, `None` when the key is absent
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    fn put(&mut self, key: &[u8], value: Vec<u8>) -> Result<()>;

    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// Apply a set of writes. Durable backends override this to commit
    /// the whole changeset atomically.
    fn apply(&mut self, changes: Changeset) -> Result<()> {
        for (key, value) in changes {
            match value {
                Some(value) => self.put(&key, value)?,
                None => self.delete(&key)?,
            }
        }
        Ok(())
    }
}

/// In-memory store, used by tests and by hosts without persistence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.entries.insert(key.to_vec(), value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Read-through overlay that buffers writes until [`StagedState::commit`]
pub struct StagedState<'a, S: StateStore + ?Sized> {
    base: &'a mut S,
    changes: Changeset,
}

impl<'a, S: StateStore + ?Sized> StagedState<'a, S> {
    pub fn new(base: &'a mut S) -> Self {
        Self {
            base,
            changes: Changeset::new(),
        }
    }

    /// Number of keys with a pending write or deletion
    pub fn pending(&self) -> usize {
        self.changes.len()
    }

    /// Hand all staged writes to the underlying store in one batch
    pub fn commit(self) -> Result<usize> {
        let count = self.changes.len();
        if count > 0 {
            self.base.apply(self.changes)?;
        }
        log::debug!("committed {} state change(s)", count);
        Ok(count)
    }
}

impl<S: StateStore + ?Sized> StateStore for StagedState<'_, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.changes.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.base.get(key),
        }
    }

    fn put(&mut self, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.changes.insert(key.to_vec(), Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.changes.insert(key.to_vec(), None);
        Ok(())
    }
}
