//! In-memory storage adapter for tests and embedders without a filesystem.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::StorageError;

use super::StorageBackend;

/// HashMap-backed storage. Clones share the same underlying map, so a
/// handle kept by a test still sees what a store wrote through its clone.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<String, String>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            // A poisoned lock still holds valid data.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl StorageBackend for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.map().get(key).cloned())
    }

    fn save(&self, key: &str, text: &str) -> Result<(), StorageError> {
        self.map().insert(key.to_string(), text.to_string());
        Ok(())
    }
}
