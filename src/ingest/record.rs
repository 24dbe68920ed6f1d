//! Flat transaction record
//!
//! The JSON rendition of one source dataset row: customer, product,
//! order and shipping columns side by side. Every field is optional;
//! the loader decides what each row is good for.

use serde::Deserialize;

/// One source row of the transaction dataset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransactionRecord {
    // customer columns
    pub customer_id: Option<u64>,
    pub customer_email: Option<String>,
    pub customer_fname: Option<String>,
    pub customer_lname: Option<String>,
    pub customer_segment: Option<String>,
    pub customer_city: Option<String>,
    pub customer_state: Option<String>,
    pub customer_country: Option<String>,
    pub customer_zipcode: Option<String>,
    pub customer_street: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    // product columns
    pub product_name: Option<String>,
    pub product_card_id: Option<u64>,
    pub category_name: Option<String>,
    pub department_name: Option<String>,
    pub product_price: Option<f64>,
    pub product_description: Option<String>,
    pub product_image: Option<String>,
    pub product_status: Option<u8>,

    // order columns
    pub order_item_id: Option<u64>,
    pub order_date: Option<String>,
    pub order_quantity: Option<u32>,
    pub sales: Option<f64>,
    pub order_discount: Option<f64>,
    pub profit_per_order: Option<f64>,
    pub order_status: Option<String>,
    pub market: Option<String>,
    pub order_region: Option<String>,
    pub order_country: Option<String>,
    pub order_city: Option<String>,
    pub order_state: Option<String>,
    pub order_zipcode: Option<String>,

    // shipping columns
    pub shipping_date: Option<String>,
    pub shipping_mode: Option<String>,
    pub days_for_shipping_real: Option<i32>,
    pub days_for_shipment_scheduled: Option<i32>,
    pub delivery_status: Option<String>,
    pub late_delivery_risk: Option<u8>,
}

impl TransactionRecord {
    /// Trimmed product name, `None` when absent or blank.
    pub fn product_key(&self) -> Option<String> {
        let name = self.product_name.as_deref()?.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}
