//! Error types for tickdown-core.
//!
//! The stores swallow storage failures (the in-memory collection stays
//! authoritative for the session), so these types surface only at the
//! collaborator seams: storage adapters and audio playback.

use std::path::PathBuf;
use thiserror::Error;

/// Storage adapter errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read a persisted blob
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a persisted blob
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the data directory
    #[error("failed to create data directory {path}: {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Audio collaborator errors.
#[derive(Error, Debug)]
pub enum AudioError {
    /// No audio backend is available to play through
    #[error("audio backend unavailable: {0}")]
    Unavailable(String),

    /// The backend exists but refused to start playback
    #[error("playback failed: {0}")]
    PlaybackFailed(String),

    /// The fallback tone generator could not be set up
    #[error("tone generator failed: {0}")]
    ToneFailed(String),
}
