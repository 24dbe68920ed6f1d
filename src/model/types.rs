//! Entity struct definitions
//!
//! Every nullable source column is an `Option`. The order date is carried
//! as unparsed text in the external `MM/DD/YYYY` format; parsing happens
//! in the aggregation layer, never here.

use serde::{Deserialize, Serialize};

/// A customer dimension row.
///
/// Email is the only required contact field. Uniqueness of email is a
/// store option, not a property of the type (source data is known to
/// contain duplicate emails).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Primary key
    pub id: u64,
    /// Contact email (required, shape-checked on insert)
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Segment classification (e.g. "Consumer", "Corporate")
    pub segment: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zipcode: Option<String>,
    pub street: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Customer {
    /// Create a customer with the required fields only.
    pub fn new(
        id: u64,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            segment: None,
            city: None,
            state: None,
            country: None,
            zipcode: None,
            street: None,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn with_location(
        mut self,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        self.city = Some(city.into());
        self.state = Some(state.into());
        self
    }

    /// Full display name ("First Last").
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A product dimension row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Primary key
    pub id: u64,
    /// Product name (required, non-blank)
    pub name: String,
    /// Source catalog card id
    pub card_id: Option<u64>,
    pub category: Option<String>,
    pub department: Option<String>,
    /// Unit price, must be >= 0 when present
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Availability flag, 0 or 1 when present
    pub status: Option<u8>,
}

impl Product {
    /// Create a product with the required fields only.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            card_id: None,
            category: None,
            department: None,
            price: None,
            description: None,
            image: None,
            status: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_category(
        mut self,
        department: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        self.department = Some(department.into());
        self.category = Some(category.into());
        self
    }
}

/// A fact row: one transaction line.
///
/// Carries its own geography snapshot (market/region/country/city/state/
/// zipcode), independent of the customer's stored location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Primary key
    pub id: u64,
    /// Source line-item id
    pub item_id: Option<u64>,
    /// Must reference an existing customer
    pub customer_id: u64,
    /// Must reference an existing product
    pub product_id: u64,
    /// Unparsed date text, external format MM/DD/YYYY
    pub order_date: Option<String>,
    /// Units ordered, must be > 0 when present
    pub quantity: Option<u32>,
    /// Sales amount, must be >= 0 when present
    pub sales: Option<f64>,
    pub discount: Option<f64>,
    pub profit: Option<f64>,
    pub status: Option<String>,
    pub market: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
}

impl Order {
    /// Create an order with the required references only.
    pub fn new(id: u64, customer_id: u64, product_id: u64) -> Self {
        Self {
            id,
            item_id: None,
            customer_id,
            product_id,
            order_date: None,
            quantity: None,
            sales: None,
            discount: None,
            profit: None,
            status: None,
            market: None,
            region: None,
            country: None,
            city: None,
            state: None,
            zipcode: None,
        }
    }

    pub fn with_date(mut self, date_text: impl Into<String>) -> Self {
        self.order_date = Some(date_text.into());
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_sales(mut self, sales: f64) -> Self {
        self.sales = Some(sales);
        self
    }

    pub fn with_profit(mut self, profit: f64) -> Self {
        self.profit = Some(profit);
        self
    }

    pub fn with_geography(
        mut self,
        market: impl Into<String>,
        region: impl Into<String>,
        country: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        self.market = Some(market.into());
        self.region = Some(region.into());
        self.country = Some(country.into());
        self.state = Some(state.into());
        self
    }
}

/// Shipping record for an order, at most one per order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingDetail {
    /// The order this shipment belongs to (also the record's key)
    pub order_id: u64,
    /// Unparsed shipping date text
    pub shipping_date: Option<String>,
    pub mode: Option<String>,
    /// Actual transit days, >= 0 when present
    pub actual_days: Option<i32>,
    /// Scheduled transit days, >= 0 when present
    pub scheduled_days: Option<i32>,
    pub delivery_status: Option<String>,
    /// Late-delivery flag, 0 or 1 when present. Absent flags count toward
    /// on-time-percentage denominators but never numerators.
    pub late_delivery_risk: Option<u8>,
}

impl ShippingDetail {
    pub fn new(order_id: u64) -> Self {
        Self {
            order_id,
            shipping_date: None,
            mode: None,
            actual_days: None,
            scheduled_days: None,
            delivery_status: None,
            late_delivery_risk: None,
        }
    }

    pub fn with_days(mut self, actual: i32, scheduled: i32) -> Self {
        self.actual_days = Some(actual);
        self.scheduled_days = Some(scheduled);
        self
    }

    pub fn with_late_flag(mut self, late: u8) -> Self {
        self.late_delivery_risk = Some(late);
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Delay in days (actual - scheduled); negative means early.
    pub fn delay_days(&self) -> Option<i32> {
        match (self.actual_days, self.scheduled_days) {
            (Some(actual), Some(scheduled)) => Some(actual - scheduled),
            _ => None,
        }
    }
}
