//! Batch dataset ingest
//!
//! One-shot loader for the flat transaction dataset (a JSON array, one
//! record per source row). Ingest owns deduplication by business key
//! and foreign-key resolution; rows it cannot place are skipped and
//! counted, never fatal.
//!
//! # Design Principles
//!
//! - Customers dedup by source customer id, products by trimmed name;
//!   first occurrence wins
//! - Orders resolve parents through in-run id maps; unresolvable rows
//!   are counted per cause
//! - Shipping rows are written only for orders that survived
//! - Every run gets a batch id and ends with a summary report

mod errors;
mod loader;
mod record;

pub use errors::{IngestError, IngestResult};
pub use loader::{DatasetLoader, IngestReport};
pub use record::TransactionRecord;
