//! Store error types
//!
//! Every insert failure is a constraint violation carrying the entity
//! name and field-level details. Errors are surfaced to the caller
//! immediately; the store never retries and never holds partial state
//! (a failed insert leaves the store untouched).

use thiserror::Error;

use crate::model::ViolationDetails;

/// Errors raised by the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field is absent, a numeric invariant fails, a
    /// referential link is dangling, or a uniqueness rule is violated.
    #[error("constraint violation on {entity}: {details}")]
    ConstraintViolation {
        entity: &'static str,
        details: ViolationDetails,
    },

    /// Delete target does not exist.
    #[error("{entity} id {id} does not exist")]
    UnknownId { entity: &'static str, id: u64 },
}

impl StoreError {
    pub fn constraint(entity: &'static str, details: ViolationDetails) -> Self {
        Self::ConstraintViolation { entity, details }
    }

    pub fn unknown_id(entity: &'static str, id: u64) -> Self {
        Self::UnknownId { entity, id }
    }

    /// Stable code string for CLI/log output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
            Self::UnknownId { .. } => "UNKNOWN_ID",
        }
    }

    /// Whether this is an insert-time constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
