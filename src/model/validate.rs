//! Entity invariant validation
//!
//! Validation runs before any store mutation and is deterministic: the
//! same entity fails the same way every time. Checks here cover required
//! fields and numeric invariants only; referential checks belong to the
//! store, which owns the id maps.

use std::fmt;

use regex::Regex;

use super::types::{Customer, Order, Product, ShippingDetail};

/// Pattern for a structurally plausible email address.
///
/// Deliberately loose: one `@`, no whitespace, a dot in the domain.
pub fn email_pattern() -> Regex {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static pattern compiles")
}

/// Field-level violation details carried inside a constraint error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationDetails {
    /// Field name (e.g. "email", "quantity")
    pub field: String,
    /// Expected condition
    pub expected: String,
    /// Actual value or state found
    pub actual: String,
}

impl ViolationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "non-blank value", "missing or blank")
    }

    pub fn out_of_range(field: impl Into<String>, expected: impl Into<String>, actual: f64) -> Self {
        Self::new(field, expected, actual.to_string())
    }

    pub fn bad_flag(field: impl Into<String>, actual: u8) -> Self {
        Self::new(field, "0 or 1", actual.to_string())
    }

    pub fn duplicate(field: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(field, "no existing row with this value", actual)
    }

    pub fn dangling(field: impl Into<String>, id: u64) -> Self {
        Self::new(field, "reference to an existing row", format!("id {} not found", id))
    }
}

impl fmt::Display for ViolationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

impl Customer {
    /// Check required fields and numeric invariants.
    pub fn validate(&self, email_re: &Regex) -> Result<(), ViolationDetails> {
        if self.email.trim().is_empty() {
            return Err(ViolationDetails::missing_field("email"));
        }
        if !email_re.is_match(self.email.trim()) {
            return Err(ViolationDetails::new(
                "email",
                "address of the form local@domain.tld",
                self.email.clone(),
            ));
        }
        Ok(())
    }
}

impl Product {
    /// Check required fields and numeric invariants.
    pub fn validate(&self) -> Result<(), ViolationDetails> {
        if self.name.trim().is_empty() {
            return Err(ViolationDetails::missing_field("name"));
        }
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err(ViolationDetails::out_of_range("price", ">= 0", price));
            }
        }
        if let Some(status) = self.status {
            if status > 1 {
                return Err(ViolationDetails::bad_flag("status", status));
            }
        }
        Ok(())
    }
}

impl Order {
    /// Check numeric invariants. Referential checks live in the store.
    pub fn validate(&self) -> Result<(), ViolationDetails> {
        if let Some(quantity) = self.quantity {
            if quantity == 0 {
                return Err(ViolationDetails::out_of_range("quantity", "> 0", 0.0));
            }
        }
        if let Some(sales) = self.sales {
            if !sales.is_finite() || sales < 0.0 {
                return Err(ViolationDetails::out_of_range("sales", ">= 0", sales));
            }
        }
        Ok(())
    }
}

impl ShippingDetail {
    /// Check numeric invariants.
    pub fn validate(&self) -> Result<(), ViolationDetails> {
        if let Some(days) = self.actual_days {
            if days < 0 {
                return Err(ViolationDetails::out_of_range(
                    "actual_days",
                    ">= 0",
                    f64::from(days),
                ));
            }
        }
        if let Some(days) = self.scheduled_days {
            if days < 0 {
                return Err(ViolationDetails::out_of_range(
                    "scheduled_days",
                    ">= 0",
                    f64::from(days),
                ));
            }
        }
        if let Some(flag) = self.late_delivery_risk {
            if flag > 1 {
                return Err(ViolationDetails::bad_flag("late_delivery_risk", flag));
            }
        }
        Ok(())
    }
}
