//! Entity types for the supply-chain dataset
//!
//! Four entities, all immutable after insert:
//! - Customer: identity, contact, segment, location
//! - Product: catalog entry with price and status flag
//! - Order: one transaction line referencing a customer and a product,
//!   with a denormalized geography snapshot
//! - ShippingDetail: at most one per order, transit days and late flag

mod types;
mod validate;

pub use types::{Customer, Order, Product, ShippingDetail};
pub use validate::{email_pattern, ViolationDetails};
