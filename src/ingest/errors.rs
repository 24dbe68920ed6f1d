//! Ingest error types
//!
//! Only dataset-level failures are errors: an unreadable file or
//! undecodable JSON. Row-level problems are skip counters in the
//! report, matching the one-shot batch-load contract.

use std::io;

use thiserror::Error;

/// Errors raised by the dataset loader.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("dataset unreadable: {0}")]
    Io(#[from] io::Error),

    #[error("dataset is not a JSON array of records: {0}")]
    Decode(#[from] serde_json::Error),
}

impl IngestError {
    /// Stable code string for CLI/log output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "INGEST_IO",
            Self::Decode(_) => "INGEST_DECODE",
        }
    }
}

/// Result type for ingest operations.
pub type IngestResult<T> = Result<T, IngestError>;
