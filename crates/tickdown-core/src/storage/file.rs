//! Filesystem storage adapter.
//!
//! One `<key>.json` file per storage key inside the data directory.

use std::path::PathBuf;

use crate::error::StorageError;

use super::{data_dir, StorageBackend};

/// File-backed storage under the tickdown data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the default data directory (see [`super::data_dir`]).
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self { dir: data_dir()? })
    }

    /// Open an explicit directory, creating it if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open_at(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDirFailed {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::ReadFailed { path, source }),
        }
    }

    fn save(&self, key: &str, text: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        std::fs::write(&path, text).map_err(|source| StorageError::WriteFailed { path, source })
    }
}
