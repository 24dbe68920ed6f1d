//! Snapshot persistence
//!
//! The whole store is persisted as a single snapshot file of framed,
//! checksummed records, one entity per record.
//!
//! # Design Principles
//!
//! - Checksum-verified on every record read; any mismatch is fatal
//! - Atomic replace: snapshots are written to a temp file and renamed
//! - Sections in dependency order (customers, products, orders,
//!   shipping) so referential checks hold during load
//! - Deterministic: entities are written in ascending id order, so the
//!   same store always produces byte-identical snapshots

mod checksum;
mod errors;
mod reader;
mod record;
mod writer;

pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{StorageError, StorageResult};
pub use reader::SnapshotReader;
pub use record::{Record, SectionTag, SNAPSHOT_MAGIC};
pub use writer::SnapshotWriter;
