//! Keyed text-blob persistence.
//!
//! Every collection serializes as one JSON blob per key on every change.
//! Adapters implement [`StorageBackend`]; the stores never touch the
//! filesystem directly.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;

/// Storage key for the timer collection.
pub const TIMERS_KEY: &str = "countdown_timers";
/// Storage key for the event collection.
pub const EVENTS_KEY: &str = "countdown_events";
/// Storage key for application settings.
pub const SETTINGS_KEY: &str = "countdown_settings";

/// Keyed load/save of serialized text.
///
/// Implementations are either a real adapter or an in-memory stub, chosen
/// at store construction -- callers never probe for storage availability.
pub trait StorageBackend: Send + Sync {
    /// Load the blob stored under `key`, `None` if nothing was ever saved.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    fn save(&self, key: &str, text: &str) -> Result<(), StorageError>;
}

/// Returns `~/.config/tickdown[-dev]/` based on TICKDOWN_ENV.
///
/// Set TICKDOWN_DATA_DIR to override the location entirely, or
/// TICKDOWN_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = if let Ok(custom) = std::env::var("TICKDOWN_DATA_DIR") {
        PathBuf::from(custom)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");

        let env = std::env::var("TICKDOWN_ENV").unwrap_or_else(|_| "production".to_string());

        if env == "dev" {
            base_dir.join("tickdown-dev")
        } else {
            base_dir.join("tickdown")
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDirFailed {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Load a collection blob, falling back to empty on any failure.
///
/// Read and parse failures are logged and swallowed; a fresh session starts
/// with an empty collection rather than an error.
pub(crate) fn load_collection<T: DeserializeOwned>(
    storage: &dyn StorageBackend,
    key: &str,
) -> Vec<T> {
    match storage.load(key) {
        Ok(Some(text)) => match serde_json::from_str(&text) {
            Ok(items) => items,
            Err(error) => {
                tracing::warn!(key, %error, "discarding unreadable collection");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(error) => {
            tracing::warn!(key, %error, "failed to load collection");
            Vec::new()
        }
    }
}

/// Persist a collection blob. Failures are logged and swallowed; the
/// in-memory collection stays authoritative for the session.
pub(crate) fn save_collection<T: Serialize>(
    storage: &dyn StorageBackend,
    key: &str,
    items: &[T],
) {
    let text = match serde_json::to_string(items) {
        Ok(text) => text,
        Err(error) => {
            tracing::error!(key, %error, "failed to serialize collection");
            return;
        }
    };
    if let Err(error) = storage.save(key, &text) {
        tracing::error!(key, %error, "failed to persist collection");
    }
}
