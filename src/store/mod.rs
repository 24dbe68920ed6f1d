//! Constraint-checked entity store
//!
//! Durable, validated storage for the four supply-chain entities.
//!
//! # Design Principles
//!
//! - Validation before any mutation; failed inserts leave no trace
//! - Referential integrity enforced at insert, cascade on delete
//!   (customer → orders → shipping; product → orders → shipping)
//! - No update path: entities are immutable after insert
//! - Deterministic: entity maps iterate in ascending id order
//! - Secondary indexes are derived state, rebuilt from the maps

mod errors;
mod indexes;
mod store;

pub use errors::{StoreError, StoreResult};
pub use indexes::Indexes;
pub use store::{Store, StoreOptions};
