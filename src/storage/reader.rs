//! Snapshot reader
//!
//! Rebuilds a store from a snapshot file. Every record's checksum is
//! verified before its payload is decoded, and every entity goes back
//! through the store's insert path, so numeric and referential
//! constraints are re-checked on load. A snapshot that fails either
//! check must not be served from.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::errors::{StorageError, StorageResult};
use super::record::{Record, SectionTag, SNAPSHOT_MAGIC};
use crate::model::{Customer, Order, Product, ShippingDetail};
use crate::store::{Store, StoreOptions};

/// Reads store snapshots.
pub struct SnapshotReader;

impl SnapshotReader {
    /// Reads the snapshot at `path` into a fresh store built with
    /// `options`.
    pub fn read(path: &Path, options: StoreOptions) -> StorageResult<Store> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 8];
        std::io::Read::read_exact(&mut reader, &mut magic)
            .map_err(|_| StorageError::invalid("file too short for magic"))?;
        if &magic != SNAPSHOT_MAGIC {
            return Err(StorageError::invalid("bad magic"));
        }

        let mut store = Store::with_options(options);
        let mut offset = SNAPSHOT_MAGIC.len() as u64;

        while let Some(record) = Record::decode_from(&mut reader, offset)? {
            match record.tag {
                SectionTag::Customer => {
                    let customer: Customer = decode_payload(&record, offset)?;
                    store
                        .insert_customer(customer)
                        .map_err(|e| reload_failure(offset, &e))?;
                }
                SectionTag::Product => {
                    let product: Product = decode_payload(&record, offset)?;
                    store
                        .insert_product(product)
                        .map_err(|e| reload_failure(offset, &e))?;
                }
                SectionTag::Order => {
                    let order: Order = decode_payload(&record, offset)?;
                    store
                        .insert_order(order)
                        .map_err(|e| reload_failure(offset, &e))?;
                }
                SectionTag::Shipping => {
                    let shipping: ShippingDetail = decode_payload(&record, offset)?;
                    store
                        .insert_shipping(shipping)
                        .map_err(|e| reload_failure(offset, &e))?;
                }
            }
            offset += record.encoded_len();
        }

        Ok(store)
    }
}

fn decode_payload<T: DeserializeOwned>(record: &Record, offset: u64) -> StorageResult<T> {
    serde_json::from_slice(&record.payload)
        .map_err(|e| StorageError::corruption(offset, format!("undecodable payload: {}", e)))
}

fn reload_failure(offset: u64, err: &crate::store::StoreError) -> StorageError {
    StorageError::invalid(format!("constraint failure at offset {}: {}", offset, err))
}
