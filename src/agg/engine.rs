//! The seven analytical operations
//!
//! Each operation is a pure function of the store at call time: scan
//! the fact table, join dimensions at the fixed join kind, group with
//! accumulators, reduce, and emit rows sorted by the natural group
//! key. Group maps are `BTreeMap`s so output ordering never depends on
//! hash iteration.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::store::Store;

use super::date::{month_of, parse_order_date};
use super::metrics::{margin_pct, pct, round2};
use super::rows::{
    CategoryPerformanceRow, CustomerAnalysisRow, DeliveryPerformanceRow, GeoSalesRow,
    MonthlyKpiRow, OrderDetailRow, ProductSalesRow,
};

/// Read-only aggregation over a borrowed store snapshot.
pub struct AggregationEngine<'a> {
    store: &'a Store,
}

/// Category label for a late flag; absent flags get no label.
fn delivery_category(flag: Option<u8>) -> Option<String> {
    match flag {
        Some(1) => Some("Late".to_string()),
        Some(0) => Some("On Time".to_string()),
        _ => None,
    }
}

#[derive(Default)]
struct KpiAcc {
    orders: u64,
    customers: BTreeSet<u64>,
    quantity: u64,
    sales: f64,
    profit: f64,
    shipped: u64,
    late: u64,
    on_time: u64,
}

#[derive(Default)]
struct ProductAcc {
    orders: u64,
    quantity: u64,
    revenue: f64,
    profit: f64,
}

#[derive(Default)]
struct CustomerAcc {
    orders: u64,
    items: u64,
    spend: f64,
    last_order: Option<(NaiveDate, String)>,
    late: u64,
}

#[derive(Default)]
struct GeoAcc {
    orders: u64,
    customers: BTreeSet<u64>,
    revenue: f64,
    profit: f64,
    on_time: u64,
}

#[derive(Default)]
struct CategoryAcc {
    orders: u64,
    units: u64,
    revenue: f64,
    profit: f64,
}

impl<'a> AggregationEngine<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Monthly KPI rollup.
    ///
    /// Orders group by the calendar month of their date text; rows with
    /// absent or unparseable dates are excluded. Shipping joins left:
    /// unshipped orders still count toward sales, and a matched pair
    /// with no late flag counts toward percentage denominators only.
    pub fn monthly_kpis(&self) -> Vec<MonthlyKpiRow> {
        let mut groups: BTreeMap<String, KpiAcc> = BTreeMap::new();

        for order in self.store.orders() {
            let Some(month) = month_of(order.order_date.as_deref()) else {
                continue;
            };
            let acc = groups.entry(month).or_default();
            acc.orders += 1;
            acc.customers.insert(order.customer_id);
            acc.quantity += u64::from(order.quantity.unwrap_or(0));
            acc.sales += order.sales.unwrap_or(0.0);
            acc.profit += order.profit.unwrap_or(0.0);

            if let Some(shipping) = self.store.shipping_for(order.id) {
                acc.shipped += 1;
                match shipping.late_delivery_risk {
                    Some(1) => acc.late += 1,
                    Some(0) => acc.on_time += 1,
                    _ => {}
                }
            }
        }

        groups
            .into_iter()
            .map(|(month, acc)| MonthlyKpiRow {
                month,
                total_orders: acc.orders,
                unique_customers: acc.customers.len() as u64,
                total_quantity: acc.quantity,
                total_sales: round2(acc.sales),
                total_profit: round2(acc.profit),
                avg_sales: round2(acc.sales / acc.orders as f64),
                profit_margin_pct: margin_pct(acc.profit, acc.sales),
                late_deliveries: acc.late,
                on_time_deliveries: acc.on_time,
                late_pct: pct(acc.late, acc.shipped),
                on_time_pct: pct(acc.on_time, acc.shipped),
            })
            .collect()
    }

    /// Per-order delivery performance. Inner join: orders without a
    /// shipping detail are excluded.
    pub fn delivery_performance(&self) -> Vec<DeliveryPerformanceRow> {
        let mut rows = Vec::new();
        for order in self.store.orders() {
            let Some(shipping) = self.store.shipping_for(order.id) else {
                continue;
            };
            rows.push(DeliveryPerformanceRow {
                order_id: order.id,
                customer_id: order.customer_id,
                product_id: order.product_id,
                order_date: order.order_date.clone(),
                shipping_mode: shipping.mode.clone(),
                scheduled_days: shipping.scheduled_days,
                actual_days: shipping.actual_days,
                delay_days: shipping.delay_days(),
                delivery_status: shipping.delivery_status.clone(),
                delivery_category: delivery_category(shipping.late_delivery_risk),
            });
        }
        rows
    }

    /// Sales rollup by product. Inner join: products with no orders do
    /// not appear.
    pub fn product_sales(&self) -> Vec<ProductSalesRow> {
        let mut groups: BTreeMap<u64, ProductAcc> = BTreeMap::new();

        for order in self.store.orders() {
            let acc = groups.entry(order.product_id).or_default();
            acc.orders += 1;
            acc.quantity += u64::from(order.quantity.unwrap_or(0));
            acc.revenue += order.sales.unwrap_or(0.0);
            acc.profit += order.profit.unwrap_or(0.0);
        }

        groups
            .into_iter()
            .filter_map(|(product_id, acc)| {
                // Referential integrity guarantees the parent exists.
                let product = self.store.product(product_id)?;
                Some(ProductSalesRow {
                    product_id,
                    product_name: product.name.clone(),
                    category: product.category.clone(),
                    department: product.department.clone(),
                    order_count: acc.orders,
                    total_quantity: acc.quantity,
                    total_revenue: round2(acc.revenue),
                    total_profit: round2(acc.profit),
                    avg_sale_value: round2(acc.revenue / acc.orders as f64),
                    profit_margin_pct: margin_pct(acc.profit, acc.revenue),
                })
            })
            .collect()
    }

    /// Lifetime rollup by customer. Inner join to orders, left join to
    /// shipping. Recency is chronological over parseable dates; the
    /// reported value is the raw text of the winning date.
    pub fn customer_analysis(&self) -> Vec<CustomerAnalysisRow> {
        let mut groups: BTreeMap<u64, CustomerAcc> = BTreeMap::new();

        for order in self.store.orders() {
            let acc = groups.entry(order.customer_id).or_default();
            acc.orders += 1;
            acc.items += u64::from(order.quantity.unwrap_or(0));
            acc.spend += order.sales.unwrap_or(0.0);

            if let Some(text) = order.order_date.as_deref() {
                if let Ok(date) = parse_order_date(text) {
                    let newer = acc.last_order.as_ref().map_or(true, |(d, _)| date > *d);
                    if newer {
                        acc.last_order = Some((date, text.to_string()));
                    }
                }
            }

            if let Some(shipping) = self.store.shipping_for(order.id) {
                if shipping.late_delivery_risk == Some(1) {
                    acc.late += 1;
                }
            }
        }

        groups
            .into_iter()
            .filter_map(|(customer_id, acc)| {
                let customer = self.store.customer(customer_id)?;
                Some(CustomerAnalysisRow {
                    customer_id,
                    customer_name: customer.full_name(),
                    email: customer.email.clone(),
                    segment: customer.segment.clone(),
                    city: customer.city.clone(),
                    state: customer.state.clone(),
                    total_orders: acc.orders,
                    total_items: acc.items,
                    total_spend: round2(acc.spend),
                    avg_order_value: round2(acc.spend / acc.orders as f64),
                    last_order_date: acc.last_order.map(|(_, text)| text),
                    late_deliveries: acc.late,
                })
            })
            .collect()
    }

    /// Sales rollup by (market, region, country, state) from the
    /// order's own geography snapshot. Inner join to shipping: only
    /// shipped orders participate.
    pub fn geographic_sales(&self) -> Vec<GeoSalesRow> {
        type GeoKey = (Option<String>, Option<String>, Option<String>, Option<String>);
        let mut groups: BTreeMap<GeoKey, GeoAcc> = BTreeMap::new();

        for order in self.store.orders() {
            let Some(shipping) = self.store.shipping_for(order.id) else {
                continue;
            };
            let key = (
                order.market.clone(),
                order.region.clone(),
                order.country.clone(),
                order.state.clone(),
            );
            let acc = groups.entry(key).or_default();
            acc.orders += 1;
            acc.customers.insert(order.customer_id);
            acc.revenue += order.sales.unwrap_or(0.0);
            acc.profit += order.profit.unwrap_or(0.0);
            if shipping.late_delivery_risk == Some(0) {
                acc.on_time += 1;
            }
        }

        groups
            .into_iter()
            .map(|((market, region, country, state), acc)| GeoSalesRow {
                market,
                region,
                country,
                state,
                total_orders: acc.orders,
                unique_customers: acc.customers.len() as u64,
                total_revenue: round2(acc.revenue),
                total_profit: round2(acc.profit),
                on_time_pct: pct(acc.on_time, acc.orders),
            })
            .collect()
    }

    /// Sales rollup by (month, department, category). Uses the same
    /// month-exclusion rule as the KPI rollup; department and category
    /// come from the product dimension (inner join).
    pub fn category_performance(&self) -> Vec<CategoryPerformanceRow> {
        type CategoryKey = (String, Option<String>, Option<String>);
        let mut groups: BTreeMap<CategoryKey, CategoryAcc> = BTreeMap::new();

        for order in self.store.orders() {
            let Some(month) = month_of(order.order_date.as_deref()) else {
                continue;
            };
            let Some(product) = self.store.product(order.product_id) else {
                continue;
            };
            let key = (month, product.department.clone(), product.category.clone());
            let acc = groups.entry(key).or_default();
            acc.orders += 1;
            acc.units += u64::from(order.quantity.unwrap_or(0));
            acc.revenue += order.sales.unwrap_or(0.0);
            acc.profit += order.profit.unwrap_or(0.0);
        }

        groups
            .into_iter()
            .map(|((month, department, category), acc)| CategoryPerformanceRow {
                month,
                department,
                category,
                order_count: acc.orders,
                total_units: acc.units,
                total_revenue: round2(acc.revenue),
                total_profit: round2(acc.profit),
                profit_margin_pct: margin_pct(acc.profit, acc.revenue),
            })
            .collect()
    }

    /// The full denormalized export, one row per order. Customer and
    /// product join inner; shipping joins left. Orders with
    /// unparseable dates still appear, with a null derived month.
    pub fn order_details(&self) -> Vec<OrderDetailRow> {
        let mut rows = Vec::new();

        for order in self.store.orders() {
            let Some(customer) = self.store.customer(order.customer_id) else {
                continue;
            };
            let Some(product) = self.store.product(order.product_id) else {
                continue;
            };
            let shipping = self.store.shipping_for(order.id);

            rows.push(OrderDetailRow {
                order_id: order.id,
                order_item_id: order.item_id,
                order_date: order.order_date.clone(),
                order_month: month_of(order.order_date.as_deref()),
                order_status: order.status.clone(),
                quantity: order.quantity,
                sales: order.sales,
                discount: order.discount,
                profit: order.profit,

                customer_id: customer.id,
                customer_name: customer.full_name(),
                customer_email: customer.email.clone(),
                customer_segment: customer.segment.clone(),

                product_id: product.id,
                product_name: product.name.clone(),
                product_category: product.category.clone(),
                product_department: product.department.clone(),
                product_price: product.price,

                market: order.market.clone(),
                region: order.region.clone(),
                country: order.country.clone(),
                city: order.city.clone(),
                state: order.state.clone(),

                shipping_mode: shipping.and_then(|s| s.mode.clone()),
                scheduled_days: shipping.and_then(|s| s.scheduled_days),
                actual_days: shipping.and_then(|s| s.actual_days),
                delay_days: shipping.and_then(|s| s.delay_days()),
                delivery_status: shipping.and_then(|s| s.delivery_status.clone()),
                late_delivery_risk: shipping.and_then(|s| s.late_delivery_risk),
                delivery_category: delivery_category(shipping.and_then(|s| s.late_delivery_risk)),
            });
        }

        rows
    }
}
