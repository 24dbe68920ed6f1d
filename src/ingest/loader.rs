//! Dataset loader
//!
//! Four passes over the record array, in dependency order: customers,
//! products, orders, shipping. Each pass logs its outcome; the run
//! ends with a summary report carrying a batch id and skip counters.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use uuid::Uuid;

use crate::model::{Customer, Order, Product, ShippingDetail};
use crate::observability::Logger;
use crate::store::Store;

use super::errors::IngestResult;
use super::record::TransactionRecord;

/// Outcome summary of one ingest run.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    /// Identifies this run in logs and responses.
    pub batch_id: Uuid,
    /// Source rows read from the dataset file.
    pub records: usize,
    pub customers: u64,
    pub products: u64,
    pub orders: u64,
    pub shipping: u64,
    /// Order rows whose customer id was absent or never imported.
    pub skipped_no_customer: u64,
    /// Order rows whose product name was absent or never imported.
    pub skipped_no_product: u64,
    /// Rows the store rejected with a constraint violation.
    pub rejected: u64,
}

/// One-shot batch loader for the flat transaction dataset.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Loads the JSON dataset at `path` into `store`.
    ///
    /// The store may already hold data; new ids are allocated above the
    /// current maximums. Row-level problems never abort the run.
    pub fn load(store: &mut Store, path: &Path) -> IngestResult<IngestReport> {
        let text = fs::read_to_string(path)?;
        let records: Vec<TransactionRecord> = serde_json::from_str(&text)?;
        Ok(Self::load_records(store, &records))
    }

    /// Loads already-decoded records. Exposed for embedding callers
    /// that produce records from another source.
    pub fn load_records(store: &mut Store, records: &[TransactionRecord]) -> IngestReport {
        let batch_id = Uuid::new_v4();
        let (max_customer, max_product, max_order) = store.max_ids();

        let mut report = IngestReport {
            batch_id,
            records: records.len(),
            customers: 0,
            products: 0,
            orders: 0,
            shipping: 0,
            skipped_no_customer: 0,
            skipped_no_product: 0,
            rejected: 0,
        };

        Logger::info(
            "ingest_start",
            &[
                ("batch_id", &batch_id.to_string()),
                ("records", &records.len().to_string()),
            ],
        );

        // Pass 1: customers, dedup by source id, first occurrence wins.
        let mut customer_ids: HashMap<u64, u64> = HashMap::new();
        let mut next_customer = max_customer + 1;
        for record in records {
            let Some(source_id) = record.customer_id else {
                continue;
            };
            if customer_ids.contains_key(&source_id) {
                continue;
            }
            let customer = build_customer(next_customer, source_id, record);
            match store.insert_customer(customer) {
                Ok(()) => {
                    customer_ids.insert(source_id, next_customer);
                    next_customer += 1;
                    report.customers += 1;
                }
                Err(e) => {
                    report.rejected += 1;
                    Logger::trace("customer_rejected", &[("reason", &e.to_string())]);
                }
            }
        }

        // Pass 2: products, dedup by trimmed name, first occurrence wins.
        let mut product_ids: HashMap<String, u64> = HashMap::new();
        let mut next_product = max_product + 1;
        for record in records {
            let Some(name) = record.product_key() else {
                continue;
            };
            if product_ids.contains_key(&name) {
                continue;
            }
            let product = build_product(next_product, &name, record);
            match store.insert_product(product) {
                Ok(()) => {
                    product_ids.insert(name, next_product);
                    next_product += 1;
                    report.products += 1;
                }
                Err(e) => {
                    report.rejected += 1;
                    Logger::trace("product_rejected", &[("reason", &e.to_string())]);
                }
            }
        }

        // Pass 3: orders, resolving parents through the in-run maps.
        // Pass 4 is folded in: a shipping row is written immediately
        // for each order that survives.
        let mut next_order = max_order + 1;
        for record in records {
            let customer_id = record
                .customer_id
                .and_then(|source| customer_ids.get(&source).copied());
            let Some(customer_id) = customer_id else {
                report.skipped_no_customer += 1;
                continue;
            };
            let product_id = record
                .product_key()
                .and_then(|name| product_ids.get(&name).copied());
            let Some(product_id) = product_id else {
                report.skipped_no_product += 1;
                continue;
            };

            let order = build_order(next_order, customer_id, product_id, record);
            match store.insert_order(order) {
                Ok(()) => {}
                Err(e) => {
                    report.rejected += 1;
                    Logger::trace("order_rejected", &[("reason", &e.to_string())]);
                    continue;
                }
            }
            report.orders += 1;

            let shipping = build_shipping(next_order, record);
            match store.insert_shipping(shipping) {
                Ok(()) => report.shipping += 1,
                Err(e) => {
                    report.rejected += 1;
                    Logger::trace("shipping_rejected", &[("reason", &e.to_string())]);
                }
            }
            next_order += 1;
        }

        Logger::info(
            "ingest_complete",
            &[
                ("batch_id", &batch_id.to_string()),
                ("customers", &report.customers.to_string()),
                ("products", &report.products.to_string()),
                ("orders", &report.orders.to_string()),
                ("shipping", &report.shipping.to_string()),
                ("rejected", &report.rejected.to_string()),
            ],
        );

        report
    }
}

fn build_customer(id: u64, source_id: u64, record: &TransactionRecord) -> Customer {
    // Source data has rows with no email; give them a resolvable
    // placeholder keyed by the source id.
    let email = record
        .customer_email
        .clone()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| format!("customer_{}@placeholder.com", source_id));

    Customer {
        id,
        email,
        first_name: record.customer_fname.clone().unwrap_or_default(),
        last_name: record.customer_lname.clone().unwrap_or_default(),
        segment: record.customer_segment.clone(),
        city: record.customer_city.clone(),
        state: record.customer_state.clone(),
        country: record.customer_country.clone(),
        zipcode: record.customer_zipcode.clone(),
        street: record.customer_street.clone(),
        latitude: record.latitude,
        longitude: record.longitude,
    }
}

fn build_product(id: u64, name: &str, record: &TransactionRecord) -> Product {
    Product {
        id,
        name: name.to_string(),
        card_id: record.product_card_id,
        category: record.category_name.clone(),
        department: record.department_name.clone(),
        price: record.product_price,
        description: record.product_description.clone(),
        image: record.product_image.clone(),
        status: record.product_status,
    }
}

fn build_order(id: u64, customer_id: u64, product_id: u64, record: &TransactionRecord) -> Order {
    Order {
        id,
        item_id: record.order_item_id,
        customer_id,
        product_id,
        order_date: record.order_date.clone(),
        quantity: record.order_quantity,
        sales: record.sales,
        discount: record.order_discount,
        profit: record.profit_per_order,
        status: record.order_status.clone(),
        market: record.market.clone(),
        region: record.order_region.clone(),
        country: record.order_country.clone(),
        city: record.order_city.clone(),
        state: record.order_state.clone(),
        zipcode: record.order_zipcode.clone(),
    }
}

fn build_shipping(order_id: u64, record: &TransactionRecord) -> ShippingDetail {
    ShippingDetail {
        order_id,
        shipping_date: record.shipping_date.clone(),
        mode: record.shipping_mode.clone(),
        actual_days: record.days_for_shipping_real,
        scheduled_days: record.days_for_shipment_scheduled,
        delivery_status: record.delivery_status.clone(),
        late_delivery_risk: record.late_delivery_risk,
    }
}
