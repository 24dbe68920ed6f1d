//! Typed output rows, one struct per view
//!
//! Field names are the stable column names external consumers see;
//! `Option` fields serialize as JSON null. Currency fields are already
//! rounded by the engine.

use serde::Serialize;

/// One calendar month of business KPIs.
///
/// Shipment counts come from a left join: orders without a shipping
/// detail still count toward the sales figures, and a matched pair
/// with no late flag counts toward percentage denominators only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyKpiRow {
    /// "YYYY-MM"
    pub month: String,
    pub total_orders: u64,
    pub unique_customers: u64,
    pub total_quantity: u64,
    pub total_sales: f64,
    pub total_profit: f64,
    pub avg_sales: f64,
    pub profit_margin_pct: Option<f64>,
    pub late_deliveries: u64,
    pub on_time_deliveries: u64,
    pub late_pct: Option<f64>,
    pub on_time_pct: Option<f64>,
}

/// One order joined (inner) with its shipping detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryPerformanceRow {
    pub order_id: u64,
    pub customer_id: u64,
    pub product_id: u64,
    pub order_date: Option<String>,
    pub shipping_mode: Option<String>,
    pub scheduled_days: Option<i32>,
    pub actual_days: Option<i32>,
    /// actual - scheduled; negative means early
    pub delay_days: Option<i32>,
    pub delivery_status: Option<String>,
    /// "Late" / "On Time" from the late flag; null when the flag is absent
    pub delivery_category: Option<String>,
}

/// Sales rollup for one product (products with no orders are absent).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSalesRow {
    pub product_id: u64,
    pub product_name: String,
    pub category: Option<String>,
    pub department: Option<String>,
    pub order_count: u64,
    pub total_quantity: u64,
    pub total_revenue: f64,
    pub total_profit: f64,
    pub avg_sale_value: f64,
    pub profit_margin_pct: Option<f64>,
}

/// Lifetime rollup for one customer (customers with no orders are
/// absent).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerAnalysisRow {
    pub customer_id: u64,
    pub customer_name: String,
    pub email: String,
    pub segment: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub total_orders: u64,
    pub total_items: u64,
    pub total_spend: f64,
    pub avg_order_value: f64,
    /// Raw text of the chronologically latest parseable order date
    pub last_order_date: Option<String>,
    pub late_deliveries: u64,
}

/// Sales rollup by (market, region, country, state); only shipped
/// orders participate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoSalesRow {
    pub market: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub total_orders: u64,
    pub unique_customers: u64,
    pub total_revenue: f64,
    pub total_profit: f64,
    pub on_time_pct: Option<f64>,
}

/// Sales rollup by (month, department, category).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPerformanceRow {
    /// "YYYY-MM"
    pub month: String,
    pub department: Option<String>,
    pub category: Option<String>,
    pub order_count: u64,
    pub total_units: u64,
    pub total_revenue: f64,
    pub total_profit: f64,
    pub profit_margin_pct: Option<f64>,
}

/// The denormalized one-row-per-order export: order, customer (inner),
/// product (inner), shipping (left), plus the derived month and
/// delivery category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetailRow {
    pub order_id: u64,
    pub order_item_id: Option<u64>,
    pub order_date: Option<String>,
    /// "YYYY-MM"; null when the date text is absent or unparseable
    pub order_month: Option<String>,
    pub order_status: Option<String>,
    pub quantity: Option<u32>,
    pub sales: Option<f64>,
    pub discount: Option<f64>,
    pub profit: Option<f64>,

    pub customer_id: u64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_segment: Option<String>,

    pub product_id: u64,
    pub product_name: String,
    pub product_category: Option<String>,
    pub product_department: Option<String>,
    pub product_price: Option<f64>,

    pub market: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,

    pub shipping_mode: Option<String>,
    pub scheduled_days: Option<i32>,
    pub actual_days: Option<i32>,
    pub delay_days: Option<i32>,
    pub delivery_status: Option<String>,
    pub late_delivery_risk: Option<u8>,
    pub delivery_category: Option<String>,
}
