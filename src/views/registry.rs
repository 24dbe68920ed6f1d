//! Named views over the aggregation engine

use serde_json::Value;

use crate::agg::AggregationEngine;
use crate::store::Store;

use super::errors::{ViewError, ViewResult};

/// The seven registered views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewName {
    MonthlyKpis,
    DeliveryPerformance,
    ProductSales,
    CustomerAnalysis,
    GeographicSales,
    CategoryPerformance,
    OrderDetails,
}

impl ViewName {
    /// Every registered view, in listing order.
    pub const ALL: [ViewName; 7] = [
        Self::MonthlyKpis,
        Self::DeliveryPerformance,
        Self::ProductSales,
        Self::CustomerAnalysis,
        Self::GeographicSales,
        Self::CategoryPerformance,
        Self::OrderDetails,
    ];

    /// The stable external name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MonthlyKpis => "v_monthly_kpis",
            Self::DeliveryPerformance => "v_delivery_performance",
            Self::ProductSales => "v_product_sales",
            Self::CustomerAnalysis => "v_customer_analysis",
            Self::GeographicSales => "v_geographic_sales",
            Self::CategoryPerformance => "v_category_performance",
            Self::OrderDetails => "v_order_details",
        }
    }

    /// One-line description for listings.
    pub fn description(self) -> &'static str {
        match self {
            Self::MonthlyKpis => "business KPIs by calendar month",
            Self::DeliveryPerformance => "per-order transit delay and delivery category",
            Self::ProductSales => "revenue, profit and margin by product",
            Self::CustomerAnalysis => "lifetime value and recency by customer",
            Self::GeographicSales => "revenue and on-time rate by market/region/country/state",
            Self::CategoryPerformance => "revenue and margin by month, department and category",
            Self::OrderDetails => "denormalized one-row-per-order export",
        }
    }

    /// Resolves an external name; unrecognized names fail with
    /// `UnknownView`.
    pub fn parse(name: &str) -> ViewResult<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == name)
            .ok_or_else(|| ViewError::unknown(name))
    }
}

/// Dispatches view names to aggregation operations.
pub struct Registry;

impl Registry {
    /// Computes the rows of a view. Each call is a fresh computation
    /// over the store; nothing is cached between calls.
    pub fn rows(store: &Store, view: ViewName) -> ViewResult<Vec<Value>> {
        let engine = AggregationEngine::new(store);
        match view {
            ViewName::MonthlyKpis => encode(engine.monthly_kpis()),
            ViewName::DeliveryPerformance => encode(engine.delivery_performance()),
            ViewName::ProductSales => encode(engine.product_sales()),
            ViewName::CustomerAnalysis => encode(engine.customer_analysis()),
            ViewName::GeographicSales => encode(engine.geographic_sales()),
            ViewName::CategoryPerformance => encode(engine.category_performance()),
            ViewName::OrderDetails => encode(engine.order_details()),
        }
    }

    /// Resolves a name and computes its rows.
    pub fn get(store: &Store, name: &str) -> ViewResult<Vec<Value>> {
        let view = ViewName::parse(name)?;
        Self::rows(store, view)
    }
}

fn encode<T: serde::Serialize>(rows: Vec<T>) -> ViewResult<Vec<Value>> {
    rows.into_iter()
        .map(|row| serde_json::to_value(row).map_err(ViewError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Customer, Order, Product, ShippingDetail};

    fn fixture() -> Store {
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
                    .with_sales(20.0)
                    .with_profit(5.0),
            )
            .unwrap();
        store
            .insert_shipping(ShippingDetail::new(1).with_days(3, 2).with_late_flag(0))
            .unwrap();
        store
    }

    #[test]
    fn test_every_view_name_round_trips() {
        for view in ViewName::ALL {
            assert_eq!(ViewName::parse(view.as_str()).unwrap(), view);
        }
    }

    #[test]
    fn test_unknown_view_is_coded_error() {
        let err = ViewName::parse("v_nonsense").unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_VIEW");
        assert!(err.to_string().contains("v_nonsense"));
    }

    #[test]
    fn test_get_by_name() {
        let store = fixture();
        let rows = Registry::get(&store, "v_monthly_kpis").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["month"], "2024-01");
        assert_eq!(rows[0]["total_sales"], 20.0);
    }

    #[test]
    fn test_every_view_computes_on_fixture() {
        let store = fixture();
        for view in ViewName::ALL {
            let rows = Registry::rows(&store, view).unwrap();
            assert_eq!(rows.len(), 1, "{} should have one row", view.as_str());
        }
    }

    #[test]
    fn test_rows_are_objects_with_stable_columns() {
        let store = fixture();
        let rows = Registry::get(&store, "v_order_details").unwrap();
        let row = rows[0].as_object().unwrap();
        for column in [
            "order_id",
            "order_month",
            "customer_email",
            "product_name",
            "delivery_category",
        ] {
            assert!(row.contains_key(column), "missing column {}", column);
        }
    }

    #[test]
    fn test_repeated_access_identical() {
        let store = fixture();
        for view in ViewName::ALL {
            let first = Registry::rows(&store, view).unwrap();
            let second = Registry::rows(&store, view).unwrap();
            assert_eq!(first, second);
        }
    }
}
