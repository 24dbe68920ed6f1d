//! CLI-specific error types
//!
//! Every CLI failure exits non-zero with a stable code string so
//! wrapping scripts can branch on it.

use std::fmt;
use std::io;

use crate::ingest::IngestError;
use crate::storage::StorageError;
use crate::store::StoreError;
use crate::views::ViewError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout or filesystem)
    IoError,
    /// Already initialized
    AlreadyInitialized,
    /// Not initialized
    NotInitialized,
    /// Boot failed (snapshot unreadable or corrupt)
    BootFailed,
    /// A subsystem rejected the command; the inner code is carried
    /// alongside the message.
    CommandFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::BootFailed => "BOOT_FAILED",
            Self::CommandFailed => "COMMAND_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    /// Subsystem code when the failure came from below (e.g.
    /// UNKNOWN_VIEW, CONSTRAINT_VIOLATION, CORRUPTION).
    inner_code: Option<&'static str>,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            inner_code: None,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Already initialized
    pub fn already_initialized() -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            "Data directory already initialized",
        )
    }

    /// Not initialized
    pub fn not_initialized() -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            "Data directory not initialized. Run 'freightdb init' first.",
        )
    }

    /// Boot failed
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    /// A subsystem error, keeping its code visible.
    pub fn command_failed(inner_code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            code: CliErrorCode::CommandFailed,
            inner_code: Some(inner_code),
            message: msg.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Code string to surface: the subsystem code when present,
    /// otherwise the CLI code.
    pub fn code_str(&self) -> &'static str {
        self.inner_code.unwrap_or_else(|| self.code.code())
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ViewError> for CliError {
    fn from(e: ViewError) -> Self {
        Self::command_failed(e.code(), e.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::command_failed(e.code(), e.to_string())
    }
}

impl From<IngestError> for CliError {
    fn from(e: IngestError) -> Self {
        Self::command_failed(e.code(), e.to_string())
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        Self::command_failed(e.code(), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsystem_code_surfaces() {
        let err = CliError::from(ViewError::unknown("v_nope"));
        assert_eq!(err.code_str(), "UNKNOWN_VIEW");
        assert!(err.to_string().starts_with("UNKNOWN_VIEW:"));
    }

    #[test]
    fn test_cli_code_when_no_inner() {
        let err = CliError::not_initialized();
        assert_eq!(err.code_str(), "NOT_INITIALIZED");
    }
}
