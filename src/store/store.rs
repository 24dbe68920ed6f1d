//! The entity store
//!
//! Validation runs before any mutation; a failed insert leaves the
//! store untouched. Writes are single-writer by construction (&mut
//! receiver); concurrent readers over a shared snapshot are safe since
//! nothing mutates after bulk ingest.

use std::collections::BTreeMap;

use regex::Regex;

use crate::model::{email_pattern, Customer, Order, Product, ShippingDetail, ViolationDetails};

use super::errors::{StoreError, StoreResult};
use super::indexes::Indexes;

/// Store-level behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    /// Reject a customer insert whose email already exists. Off by
    /// default: the source data is known to contain duplicate emails.
    pub unique_email: bool,
}

/// In-memory entity store with secondary indexes and cascade delete.
///
/// Entity maps are `BTreeMap`s keyed by id; shipping details are keyed
/// by their order id (at most one per order).
#[derive(Debug)]
pub struct Store {
    options: StoreOptions,
    customers: BTreeMap<u64, Customer>,
    products: BTreeMap<u64, Product>,
    orders: BTreeMap<u64, Order>,
    shipping: BTreeMap<u64, ShippingDetail>,
    indexes: Indexes,
    email_re: Regex,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            options,
            customers: BTreeMap::new(),
            products: BTreeMap::new(),
            orders: BTreeMap::new(),
            shipping: BTreeMap::new(),
            indexes: Indexes::new(),
            email_re: email_pattern(),
        }
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    // --- inserts ---

    /// Insert a customer. Fails on duplicate id, blank or malformed
    /// email, and (when `unique_email` is set) duplicate email.
    pub fn insert_customer(&mut self, customer: Customer) -> StoreResult<()> {
        customer
            .validate(&self.email_re)
            .map_err(|d| StoreError::constraint("customers", d))?;

        if self.customers.contains_key(&customer.id) {
            return Err(StoreError::constraint(
                "customers",
                ViolationDetails::duplicate("id", customer.id.to_string()),
            ));
        }

        if self.options.unique_email
            && !self.indexes.customers_with_email(&customer.email).is_empty()
        {
            return Err(StoreError::constraint(
                "customers",
                ViolationDetails::duplicate("email", customer.email.clone()),
            ));
        }

        self.indexes.apply_customer(&customer);
        self.customers.insert(customer.id, customer);
        Ok(())
    }

    /// Insert a product. Fails on duplicate id, blank name, negative
    /// price, or an out-of-range status flag.
    pub fn insert_product(&mut self, product: Product) -> StoreResult<()> {
        product
            .validate()
            .map_err(|d| StoreError::constraint("products", d))?;

        if self.products.contains_key(&product.id) {
            return Err(StoreError::constraint(
                "products",
                ViolationDetails::duplicate("id", product.id.to_string()),
            ));
        }

        self.indexes.apply_product(&product);
        self.products.insert(product.id, product);
        Ok(())
    }

    /// Insert an order. Fails on duplicate id, a zero quantity, negative
    /// sales, or a dangling customer/product reference.
    pub fn insert_order(&mut self, order: Order) -> StoreResult<()> {
        order
            .validate()
            .map_err(|d| StoreError::constraint("orders", d))?;

        if self.orders.contains_key(&order.id) {
            return Err(StoreError::constraint(
                "orders",
                ViolationDetails::duplicate("id", order.id.to_string()),
            ));
        }
        if !self.customers.contains_key(&order.customer_id) {
            return Err(StoreError::constraint(
                "orders",
                ViolationDetails::dangling("customer_id", order.customer_id),
            ));
        }
        if !self.products.contains_key(&order.product_id) {
            return Err(StoreError::constraint(
                "orders",
                ViolationDetails::dangling("product_id", order.product_id),
            ));
        }

        self.indexes.apply_order(&order);
        self.orders.insert(order.id, order);
        Ok(())
    }

    /// Insert a shipping detail. Fails on negative day counts, an
    /// out-of-range late flag, a dangling order reference, or a second
    /// detail for the same order.
    pub fn insert_shipping(&mut self, shipping: ShippingDetail) -> StoreResult<()> {
        shipping
            .validate()
            .map_err(|d| StoreError::constraint("shipping_details", d))?;

        if !self.orders.contains_key(&shipping.order_id) {
            return Err(StoreError::constraint(
                "shipping_details",
                ViolationDetails::dangling("order_id", shipping.order_id),
            ));
        }
        if self.shipping.contains_key(&shipping.order_id) {
            return Err(StoreError::constraint(
                "shipping_details",
                ViolationDetails::duplicate("order_id", shipping.order_id.to_string()),
            ));
        }

        self.indexes.apply_shipping(&shipping);
        self.shipping.insert(shipping.order_id, shipping);
        Ok(())
    }

    // --- deletes (cascading) ---

    /// Delete a customer and, transitively, its orders and their
    /// shipping details.
    pub fn delete_customer(&mut self, id: u64) -> StoreResult<()> {
        let customer = self
            .customers
            .remove(&id)
            .ok_or_else(|| StoreError::unknown_id("customers", id))?;
        self.indexes.remove_customer(&customer);

        for order_id in self.indexes.orders_of_customer(id) {
            self.remove_order_row(order_id);
        }
        Ok(())
    }

    /// Delete a product and, transitively, its orders and their
    /// shipping details.
    pub fn delete_product(&mut self, id: u64) -> StoreResult<()> {
        let product = self
            .products
            .remove(&id)
            .ok_or_else(|| StoreError::unknown_id("products", id))?;
        self.indexes.remove_product(&product);

        for order_id in self.indexes.orders_of_product(id) {
            self.remove_order_row(order_id);
        }
        Ok(())
    }

    /// Delete an order and its shipping detail.
    pub fn delete_order(&mut self, id: u64) -> StoreResult<()> {
        if !self.orders.contains_key(&id) {
            return Err(StoreError::unknown_id("orders", id));
        }
        self.remove_order_row(id);
        Ok(())
    }

    fn remove_order_row(&mut self, id: u64) {
        if let Some(order) = self.orders.remove(&id) {
            self.indexes.remove_order(&order);
        }
        if let Some(shipping) = self.shipping.remove(&id) {
            self.indexes.remove_shipping(&shipping);
        }
    }

    // --- point reads ---

    pub fn customer(&self, id: u64) -> Option<&Customer> {
        self.customers.get(&id)
    }

    pub fn product(&self, id: u64) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn order(&self, id: u64) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// The shipping detail for an order, if one was recorded.
    pub fn shipping_for(&self, order_id: u64) -> Option<&ShippingDetail> {
        self.shipping.get(&order_id)
    }

    // --- scans (ascending id order) ---

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    pub fn shipping_details(&self) -> impl Iterator<Item = &ShippingDetail> {
        self.shipping.values()
    }

    // --- counts ---

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn shipping_count(&self) -> usize {
        self.shipping.len()
    }

    /// Largest assigned id per entity, for id allocation by loaders.
    pub fn max_ids(&self) -> (u64, u64, u64) {
        (
            self.customers.keys().next_back().copied().unwrap_or(0),
            self.products.keys().next_back().copied().unwrap_or(0),
            self.orders.keys().next_back().copied().unwrap_or(0),
        )
    }

    /// Secondary index lookups.
    pub fn indexes(&self) -> &Indexes {
        &self.indexes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Store {
        let mut store = Store::new();
        store
            .insert_customer(Customer::new(1, "A", "B", "a@x.com"))
            .unwrap();
        store
            .insert_product(Product::new(1, "Widget").with_price(10.0))
            .unwrap();
        store
    }

    #[test]
    fn test_insert_and_read_back() {
        let store = seeded();
        assert_eq!(store.customer(1).unwrap().email, "a@x.com");
        assert_eq!(store.product(1).unwrap().name, "Widget");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store = seeded();
        let err = store
            .insert_customer(Customer::new(1, "C", "D", "c@x.com"))
            .unwrap_err();
        assert_eq!(err.code(), "CONSTRAINT_VIOLATION");
    }

    #[test]
    fn test_order_requires_existing_parents() {
        let mut store = seeded();
        assert!(store.insert_order(Order::new(1, 99, 1)).is_err());
        assert!(store.insert_order(Order::new(1, 1, 99)).is_err());
        assert!(store.insert_order(Order::new(1, 1, 1)).is_ok());
    }

    #[test]
    fn test_shipping_requires_existing_order() {
        let mut store = seeded();
        let err = store.insert_shipping(ShippingDetail::new(5)).unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_second_shipping_row_rejected() {
        let mut store = seeded();
        store.insert_order(Order::new(1, 1, 1)).unwrap();
        store.insert_shipping(ShippingDetail::new(1)).unwrap();
        let err = store.insert_shipping(ShippingDetail::new(1)).unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_failed_insert_leaves_store_untouched() {
        let mut store = seeded();
        let before = store.order_count();
        let _ = store.insert_order(Order::new(1, 1, 1).with_quantity(0));
        assert_eq!(store.order_count(), before);
        assert!(store.indexes().orders_of_customer(1).is_empty());
    }

    #[test]
    fn test_unique_email_option() {
        let mut store = Store::with_options(StoreOptions { unique_email: true });
        store
            .insert_customer(Customer::new(1, "A", "B", "dup@x.com"))
            .unwrap();
        let err = store
            .insert_customer(Customer::new(2, "C", "D", "dup@x.com"))
            .unwrap_err();
        assert!(err.is_constraint_violation());

        // Default store accepts the duplicate.
        let mut relaxed = Store::new();
        relaxed
            .insert_customer(Customer::new(1, "A", "B", "dup@x.com"))
            .unwrap();
        relaxed
            .insert_customer(Customer::new(2, "C", "D", "dup@x.com"))
            .unwrap();
    }

    #[test]
    fn test_delete_customer_cascades() {
        let mut store = seeded();
        store.insert_order(Order::new(1, 1, 1)).unwrap();
        store.insert_order(Order::new(2, 1, 1)).unwrap();
        store.insert_shipping(ShippingDetail::new(1)).unwrap();

        store.delete_customer(1).unwrap();
        assert_eq!(store.customer_count(), 0);
        assert_eq!(store.order_count(), 0);
        assert_eq!(store.shipping_count(), 0);
        // Product is untouched.
        assert_eq!(store.product_count(), 1);
    }

    #[test]
    fn test_delete_product_cascades() {
        let mut store = seeded();
        store.insert_order(Order::new(1, 1, 1)).unwrap();
        store.insert_shipping(ShippingDetail::new(1)).unwrap();

        store.delete_product(1).unwrap();
        assert_eq!(store.order_count(), 0);
        assert_eq!(store.shipping_count(), 0);
        assert_eq!(store.customer_count(), 1);
    }

    #[test]
    fn test_delete_order_removes_shipping() {
        let mut store = seeded();
        store.insert_order(Order::new(1, 1, 1)).unwrap();
        store.insert_shipping(ShippingDetail::new(1)).unwrap();

        store.delete_order(1).unwrap();
        assert_eq!(store.order_count(), 0);
        assert_eq!(store.shipping_count(), 0);
    }

    #[test]
    fn test_delete_unknown_id() {
        let mut store = Store::new();
        let err = store.delete_customer(7).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_ID");
    }

    #[test]
    fn test_max_ids() {
        let mut store = seeded();
        store.insert_order(Order::new(42, 1, 1)).unwrap();
        assert_eq!(store.max_ids(), (1, 1, 42));
    }
}
