//! View registry error types

use thiserror::Error;

/// Errors raised by the view registry.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The requested name matches no registered view.
    #[error("unknown view '{name}'")]
    UnknownView { name: String },

    /// A computed row could not be encoded as JSON.
    #[error("row encoding failed: {0}")]
    RowEncoding(#[from] serde_json::Error),
}

impl ViewError {
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownView { name: name.into() }
    }

    /// Stable code string for CLI/log output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownView { .. } => "UNKNOWN_VIEW",
            Self::RowEncoding(_) => "ROW_ENCODING",
        }
    }
}

/// Result type for view operations.
pub type ViewResult<T> = Result<T, ViewError>;
