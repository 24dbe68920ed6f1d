//! In-memory secondary indexes
//!
//! Maintained on every insert and delete. Indexes are performance aids
//! for the point/range lookups the aggregation layer and the `stats`
//! command perform; they carry no semantic state and can always be
//! rebuilt from the entity maps. Posting lists are `BTreeSet`s so every
//! lookup returns ids in ascending order.

use std::collections::{BTreeSet, HashMap};

use crate::model::{Customer, Order, Product, ShippingDetail};

/// Secondary index maps for all four entities.
#[derive(Debug, Default)]
pub struct Indexes {
    customers_by_email: HashMap<String, BTreeSet<u64>>,
    customers_by_segment: HashMap<String, BTreeSet<u64>>,
    customers_by_city_state: HashMap<(String, String), BTreeSet<u64>>,

    products_by_name: HashMap<String, BTreeSet<u64>>,
    products_by_category: HashMap<String, BTreeSet<u64>>,
    products_by_department: HashMap<String, BTreeSet<u64>>,

    orders_by_customer: HashMap<u64, BTreeSet<u64>>,
    orders_by_product: HashMap<u64, BTreeSet<u64>>,
    orders_by_date: HashMap<String, BTreeSet<u64>>,
    orders_by_region: HashMap<String, BTreeSet<u64>>,
    orders_by_market: HashMap<String, BTreeSet<u64>>,

    shipping_by_mode: HashMap<String, BTreeSet<u64>>,
    shipping_by_late_flag: HashMap<u8, BTreeSet<u64>>,
}

fn insert_into(map: &mut HashMap<String, BTreeSet<u64>>, key: Option<&str>, id: u64) {
    if let Some(key) = key {
        map.entry(key.to_string()).or_default().insert(id);
    }
}

fn remove_from(map: &mut HashMap<String, BTreeSet<u64>>, key: Option<&str>, id: u64) {
    if let Some(key) = key {
        if let Some(set) = map.get_mut(key) {
            set.remove(&id);
            if set.is_empty() {
                map.remove(key);
            }
        }
    }
}

impl Indexes {
    pub fn new() -> Self {
        Self::default()
    }

    // --- apply/remove, one pair per entity ---

    pub fn apply_customer(&mut self, customer: &Customer) {
        insert_into(&mut self.customers_by_email, Some(customer.email.as_str()), customer.id);
        insert_into(
            &mut self.customers_by_segment,
            customer.segment.as_deref(),
            customer.id,
        );
        if let (Some(city), Some(state)) = (&customer.city, &customer.state) {
            self.customers_by_city_state
                .entry((city.clone(), state.clone()))
                .or_default()
                .insert(customer.id);
        }
    }

    pub fn remove_customer(&mut self, customer: &Customer) {
        remove_from(&mut self.customers_by_email, Some(customer.email.as_str()), customer.id);
        remove_from(
            &mut self.customers_by_segment,
            customer.segment.as_deref(),
            customer.id,
        );
        if let (Some(city), Some(state)) = (&customer.city, &customer.state) {
            let key = (city.clone(), state.clone());
            if let Some(set) = self.customers_by_city_state.get_mut(&key) {
                set.remove(&customer.id);
                if set.is_empty() {
                    self.customers_by_city_state.remove(&key);
                }
            }
        }
    }

    pub fn apply_product(&mut self, product: &Product) {
        insert_into(&mut self.products_by_name, Some(product.name.as_str()), product.id);
        insert_into(
            &mut self.products_by_category,
            product.category.as_deref(),
            product.id,
        );
        insert_into(
            &mut self.products_by_department,
            product.department.as_deref(),
            product.id,
        );
    }

    pub fn remove_product(&mut self, product: &Product) {
        remove_from(&mut self.products_by_name, Some(product.name.as_str()), product.id);
        remove_from(
            &mut self.products_by_category,
            product.category.as_deref(),
            product.id,
        );
        remove_from(
            &mut self.products_by_department,
            product.department.as_deref(),
            product.id,
        );
    }

    pub fn apply_order(&mut self, order: &Order) {
        self.orders_by_customer
            .entry(order.customer_id)
            .or_default()
            .insert(order.id);
        self.orders_by_product
            .entry(order.product_id)
            .or_default()
            .insert(order.id);
        insert_into(&mut self.orders_by_date, order.order_date.as_deref(), order.id);
        insert_into(&mut self.orders_by_region, order.region.as_deref(), order.id);
        insert_into(&mut self.orders_by_market, order.market.as_deref(), order.id);
    }

    pub fn remove_order(&mut self, order: &Order) {
        if let Some(set) = self.orders_by_customer.get_mut(&order.customer_id) {
            set.remove(&order.id);
            if set.is_empty() {
                self.orders_by_customer.remove(&order.customer_id);
            }
        }
        if let Some(set) = self.orders_by_product.get_mut(&order.product_id) {
            set.remove(&order.id);
            if set.is_empty() {
                self.orders_by_product.remove(&order.product_id);
            }
        }
        remove_from(&mut self.orders_by_date, order.order_date.as_deref(), order.id);
        remove_from(&mut self.orders_by_region, order.region.as_deref(), order.id);
        remove_from(&mut self.orders_by_market, order.market.as_deref(), order.id);
    }

    pub fn apply_shipping(&mut self, shipping: &ShippingDetail) {
        insert_into(&mut self.shipping_by_mode, shipping.mode.as_deref(), shipping.order_id);
        if let Some(flag) = shipping.late_delivery_risk {
            self.shipping_by_late_flag
                .entry(flag)
                .or_default()
                .insert(shipping.order_id);
        }
    }

    pub fn remove_shipping(&mut self, shipping: &ShippingDetail) {
        remove_from(&mut self.shipping_by_mode, shipping.mode.as_deref(), shipping.order_id);
        if let Some(flag) = shipping.late_delivery_risk {
            if let Some(set) = self.shipping_by_late_flag.get_mut(&flag) {
                set.remove(&shipping.order_id);
                if set.is_empty() {
                    self.shipping_by_late_flag.remove(&flag);
                }
            }
        }
    }

    // --- lookups ---

    pub fn customers_with_email(&self, email: &str) -> Vec<u64> {
        self.customers_by_email
            .get(email)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn customers_in_segment(&self, segment: &str) -> Vec<u64> {
        self.customers_by_segment
            .get(segment)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn customers_in_city(&self, city: &str, state: &str) -> Vec<u64> {
        self.customers_by_city_state
            .get(&(city.to_string(), state.to_string()))
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn products_named(&self, name: &str) -> Vec<u64> {
        self.products_by_name
            .get(name)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn products_in_category(&self, category: &str) -> Vec<u64> {
        self.products_by_category
            .get(category)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn products_in_department(&self, department: &str) -> Vec<u64> {
        self.products_by_department
            .get(department)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn orders_of_customer(&self, customer_id: u64) -> Vec<u64> {
        self.orders_by_customer
            .get(&customer_id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn orders_of_product(&self, product_id: u64) -> Vec<u64> {
        self.orders_by_product
            .get(&product_id)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn orders_in_region(&self, region: &str) -> Vec<u64> {
        self.orders_by_region
            .get(region)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn orders_in_market(&self, market: &str) -> Vec<u64> {
        self.orders_by_market
            .get(market)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn shipments_with_mode(&self, mode: &str) -> Vec<u64> {
        self.shipping_by_mode
            .get(mode)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn shipments_with_late_flag(&self, flag: u8) -> Vec<u64> {
        self.shipping_by_late_flag
            .get(&flag)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }
}
