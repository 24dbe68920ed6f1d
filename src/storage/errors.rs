//! Storage error types
//!
//! Corruption is fatal: a snapshot that fails a checksum or violates a
//! referential constraint on load must never be served from.

use std::io;

use thiserror::Error;

/// Errors raised while writing or reading snapshots.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),

    /// A record's checksum or framing did not verify. The offset is the
    /// byte position of the failing record.
    #[error("corruption at offset {offset}: {reason}")]
    Corruption { offset: u64, reason: String },

    /// The file is structurally readable but not a valid snapshot
    /// (bad magic, unknown section tag, undecodable payload, or a
    /// constraint failure while reloading entities).
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl StorageError {
    pub fn corruption(offset: u64, reason: impl Into<String>) -> Self {
        Self::Corruption {
            offset,
            reason: reason.into(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidSnapshot(reason.into())
    }

    /// Stable code string for CLI/log output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "STORAGE_IO",
            Self::Corruption { .. } => "CORRUPTION",
            Self::InvalidSnapshot(_) => "INVALID_SNAPSHOT",
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
