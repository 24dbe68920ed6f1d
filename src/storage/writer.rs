//! Snapshot writer
//!
//! Serializes the whole store to a new snapshot file. The write is
//! atomic at the filesystem level: records go to `<path>.tmp`, the file
//! is fsynced, then renamed over the target path. A crash mid-write
//! leaves the previous snapshot intact.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::errors::{StorageError, StorageResult};
use super::record::{Record, SectionTag, SNAPSHOT_MAGIC};
use crate::store::Store;

/// Writes store snapshots.
pub struct SnapshotWriter;

impl SnapshotWriter {
    /// Writes `store` to a snapshot at `path`, replacing any existing
    /// snapshot atomically.
    ///
    /// Sections are written in dependency order (customers, products,
    /// orders, shipping), each in ascending id order, so the output is
    /// byte-identical for the same store contents.
    pub fn write(store: &Store, path: &Path) -> StorageResult<()> {
        let mut buf = Vec::with_capacity(64 * 1024);
        buf.extend_from_slice(SNAPSHOT_MAGIC);

        for customer in store.customers() {
            append_entity(&mut buf, SectionTag::Customer, customer)?;
        }
        for product in store.products() {
            append_entity(&mut buf, SectionTag::Product, product)?;
        }
        for order in store.orders() {
            append_entity(&mut buf, SectionTag::Order, order)?;
        }
        for shipping in store.shipping_details() {
            append_entity(&mut buf, SectionTag::Shipping, shipping)?;
        }

        let tmp_path = tmp_path_for(path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = open_truncated(&tmp_path)?;
        file.write_all(&buf)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

fn append_entity<T: Serialize>(buf: &mut Vec<u8>, tag: SectionTag, entity: &T) -> StorageResult<()> {
    let payload = serde_json::to_vec(entity)
        .map_err(|e| StorageError::invalid(format!("entity encoding failed: {}", e)))?;
    Record::new(tag, payload).encode_into(buf);
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}

fn open_truncated(path: &Path) -> StorageResult<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(StorageError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Customer, Order, Product};
    use tempfile::TempDir;

    fn small_store() -> Store {
        let mut store = Store::new();
        store
            .insert_customer(Customer::new(1, "A", "B", "a@x.com"))
            .unwrap();
        store
            .insert_product(Product::new(1, "Widget").with_price(10.0))
            .unwrap();
        store.insert_order(Order::new(1, 1, 1).with_sales(20.0)).unwrap();
        store
    }

    #[test]
    fn test_write_creates_file_with_magic() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshot.db");

        SnapshotWriter::write(&small_store(), &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], SNAPSHOT_MAGIC);
        assert!(bytes.len() > 8);
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn test_same_store_same_bytes() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.db");
        let b = tmp.path().join("b.db");

        let store = small_store();
        SnapshotWriter::write(&store, &a).unwrap();
        SnapshotWriter::write(&store, &b).unwrap();

        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
    }

    #[test]
    fn test_rewrite_replaces_existing_snapshot() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("snapshot.db");

        SnapshotWriter::write(&small_store(), &path).unwrap();
        let first = fs::read(&path).unwrap();

        let mut bigger = small_store();
        bigger
            .insert_customer(Customer::new(2, "C", "D", "c@x.com"))
            .unwrap();
        SnapshotWriter::write(&bigger, &path).unwrap();
        let second = fs::read(&path).unwrap();

        assert!(second.len() > first.len());
    }
}
