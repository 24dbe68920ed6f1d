//! Aggregation and View Tests
//!
//! End-to-end properties of the analytical layer:
//! - The single-order round trip produces the expected KPI row
//! - Zero-sales margins are null, never an arithmetic error
//! - Malformed dates are excluded from date-grouped views but keep
//!   their row in the full order export
//! - Late + on-time counts reconcile with the on-time percentage
//! - View access is idempotent

use freightdb::agg::AggregationEngine;
use freightdb::model::{Customer, Order, Product, ShippingDetail};
use freightdb::store::Store;
use freightdb::views::{Registry, ViewName};

// =============================================================================
// Helper Functions
// =============================================================================

fn single_order_store(sales: f64, profit: f64) -> Store {
    let mut store = Store::new();
    store
        .insert_customer(Customer::new(1, "A", "B", "a@x.com"))
        .unwrap();
    store
        .insert_product(Product::new(1, "Widget").with_price(10.0))
        .unwrap();
    store
        .insert_order(
            Order::new(1, 1, 1)
                .with_date("01/15/2024")
                .with_quantity(2)
                .with_sales(sales)
                .with_profit(profit),
        )
        .unwrap();
    store
        .insert_shipping(ShippingDetail::new(1).with_days(3, 2).with_late_flag(0))
        .unwrap();
    store
}

// =============================================================================
// Round-Trip Scenario
// =============================================================================

/// Insert one customer, product, order and shipment; the January 2024
/// KPI row reports exactly the inserted figures.
#[test]
fn test_single_order_round_trip() {
    let store = single_order_store(20.0, 5.0);
    let rows = AggregationEngine::new(&store).monthly_kpis();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.month, "2024-01");
    assert_eq!(row.total_orders, 1);
    assert_eq!(row.unique_customers, 1);
    assert_eq!(row.total_quantity, 2);
    assert_eq!(row.total_sales, 20.00);
    assert_eq!(row.total_profit, 5.00);
    assert_eq!(row.avg_sales, 20.00);
    assert_eq!(row.profit_margin_pct, Some(25.00));
    assert_eq!(row.on_time_deliveries, 1);
    assert_eq!(row.late_deliveries, 0);
    assert_eq!(row.on_time_pct, Some(100.00));
}

/// The same scenario with zero sales: the margin is null, not zero and
/// not an error.
#[test]
fn test_zero_sales_margin_is_null() {
    let store = single_order_store(0.0, 0.0);
    let rows = AggregationEngine::new(&store).monthly_kpis();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_sales, 0.0);
    assert_eq!(rows[0].profit_margin_pct, None);

    // The serialized view renders it as JSON null.
    let json_rows = Registry::rows(&store, ViewName::MonthlyKpis).unwrap();
    assert!(json_rows[0]["profit_margin_pct"].is_null());
}

/// Zero-sales groups in the product and category rollups behave the
/// same way.
#[test]
fn test_zero_sales_margin_in_other_rollups() {
    let store = single_order_store(0.0, 0.0);
    let engine = AggregationEngine::new(&store);

    assert_eq!(engine.product_sales()[0].profit_margin_pct, None);
    assert_eq!(engine.category_performance()[0].profit_margin_pct, None);
}

// =============================================================================
// Date Handling
// =============================================================================

/// Malformed date text excludes the row from date-grouped views but
/// not from the full order export, where the derived month is null.
#[test]
fn test_malformed_date_exclusion_policy() {
    let mut store = single_order_store(20.0, 5.0);
    store
        .insert_order(
            Order::new(2, 1, 1)
                .with_date("not-a-date")
                .with_quantity(1)
                .with_sales(10.0),
        )
        .unwrap();
    store
        .insert_order(Order::new(3, 1, 1).with_quantity(1).with_sales(7.0))
        .unwrap();

    let engine = AggregationEngine::new(&store);

    // Only the well-dated order reaches the monthly rollup.
    let kpis = engine.monthly_kpis();
    assert_eq!(kpis.len(), 1);
    assert_eq!(kpis[0].total_orders, 1);

    // Same exclusion in the category rollup.
    let categories = engine.category_performance();
    assert_eq!(categories.iter().map(|r| r.order_count).sum::<u64>(), 1);

    // All three orders appear in the full export.
    let details = engine.order_details();
    assert_eq!(details.len(), 3);
    assert_eq!(details[0].order_month.as_deref(), Some("2024-01"));
    assert_eq!(details[1].order_date.as_deref(), Some("not-a-date"));
    assert_eq!(details[1].order_month, None);
    assert_eq!(details[2].order_date, None);
    assert_eq!(details[2].order_month, None);
}

/// Recency uses chronological order, not the lexical order of the
/// MM/DD/YYYY text.
#[test]
fn test_last_order_date_is_chronological() {
    let mut store = single_order_store(20.0, 5.0);
    // "12/01/2023" sorts after "01/15/2024" lexically but is older.
    store
        .insert_order(Order::new(2, 1, 1).with_date("12/01/2023").with_sales(5.0))
        .unwrap();

    let rows = AggregationEngine::new(&store).customer_analysis();
    assert_eq!(rows[0].last_order_date.as_deref(), Some("01/15/2024"));
}

// =============================================================================
// Shipment Reconciliation
// =============================================================================

/// For every month, late + on-time equals the number of matched
/// shipment pairs when every pair carries a flag, and the percentages
/// reconcile with those counts.
#[test]
fn test_late_and_on_time_reconcile() {
    let mut store = Store::new();
    store
        .insert_customer(Customer::new(1, "A", "B", "a@x.com"))
        .unwrap();
    store.insert_product(Product::new(1, "Widget")).unwrap();

    let flags = [0u8, 1, 0, 0, 1];
    for (i, flag) in flags.iter().enumerate() {
        let id = i as u64 + 1;
        store
            .insert_order(Order::new(id, 1, 1).with_date("03/10/2024").with_sales(10.0))
            .unwrap();
        store
            .insert_shipping(ShippingDetail::new(id).with_late_flag(*flag))
            .unwrap();
    }
    // One order in the month with no shipping detail at all.
    store
        .insert_order(Order::new(9, 1, 1).with_date("03/11/2024").with_sales(10.0))
        .unwrap();

    let rows = AggregationEngine::new(&store).monthly_kpis();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];

    assert_eq!(row.late_deliveries + row.on_time_deliveries, 5);
    assert_eq!(row.late_deliveries, 2);
    assert_eq!(row.on_time_pct, Some(60.0));
    assert_eq!(row.late_pct, Some(40.0));
}

/// A matched pair with no late flag counts toward the percentage
/// denominator but neither numerator.
#[test]
fn test_null_late_flag_in_denominator() {
    let mut store = Store::new();
    store
        .insert_customer(Customer::new(1, "A", "B", "a@x.com"))
        .unwrap();
    store.insert_product(Product::new(1, "Widget")).unwrap();
    for (id, flag) in [(1u64, Some(0u8)), (2, Some(1)), (3, None), (4, None)] {
        store
            .insert_order(Order::new(id, 1, 1).with_date("05/05/2024").with_sales(1.0))
            .unwrap();
        let mut shipping = ShippingDetail::new(id);
        shipping.late_delivery_risk = flag;
        store.insert_shipping(shipping).unwrap();
    }

    let row = &AggregationEngine::new(&store).monthly_kpis()[0];
    assert_eq!(row.on_time_deliveries, 1);
    assert_eq!(row.late_deliveries, 1);
    // Denominator is all four matched pairs.
    assert_eq!(row.on_time_pct, Some(25.0));
    assert_eq!(row.late_pct, Some(25.0));
}

// =============================================================================
// Join Kinds
// =============================================================================

/// Delivery performance and geographic sales drop unshipped orders;
/// the KPI rollup and order details keep them.
#[test]
fn test_join_kinds_per_view() {
    let mut store = single_order_store(20.0, 5.0);
    store
        .insert_order(
            Order::new(2, 1, 1)
                .with_date("01/16/2024")
                .with_sales(30.0)
                .with_geography("Europe", "West", "France", "IDF"),
        )
        .unwrap();

    let engine = AggregationEngine::new(&store);

    // Inner joins drop the unshipped order 2.
    assert_eq!(engine.delivery_performance().len(), 1);
    let geo = engine.geographic_sales();
    assert_eq!(geo.len(), 1);
    assert_eq!(geo[0].market, None); // order 1 carries no geography snapshot
    assert_eq!(geo[0].total_orders, 1);

    // The left joins keep it.
    assert_eq!(engine.monthly_kpis()[0].total_orders, 2);
    assert_eq!(engine.order_details().len(), 2);
}

/// Views recompute identically on repeated access.
#[test]
fn test_view_access_is_idempotent() {
    let store = single_order_store(20.0, 5.0);
    for view in ViewName::ALL {
        let first = Registry::rows(&store, view).unwrap();
        let second = Registry::rows(&store, view).unwrap();
        assert_eq!(first, second, "{} differed between calls", view.as_str());
    }
}

/// Unknown view names fail with the coded error.
#[test]
fn test_unknown_view() {
    let store = single_order_store(20.0, 5.0);
    let err = Registry::get(&store, "v_does_not_exist").unwrap_err();
    assert_eq!(err.code(), "UNKNOWN_VIEW");
}
