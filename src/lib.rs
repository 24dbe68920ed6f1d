//! freightdb - a strict, deterministic, embedded supply-chain analytics store
//!
//! Four constraint-checked entity tables (customers, products, orders,
//! shipping details), a pure-read aggregation engine, and a registry of
//! named analytical views for downstream reporting tools.

pub mod agg;
pub mod cli;
pub mod ingest;
pub mod model;
pub mod observability;
pub mod storage;
pub mod store;
pub mod views;
