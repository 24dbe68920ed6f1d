//! Observability
//!
//! Structured JSON logging for ingest and boot events.
//!
//! # Design Principles
//!
//! - Structured logs (JSON), one line per event
//! - Deterministic key ordering (event, severity, then fields sorted)
//! - Synchronous, unbuffered writes
//! - Level filter from the FREIGHTDB_LOG environment variable

mod logger;

pub use logger::{Logger, Severity};
