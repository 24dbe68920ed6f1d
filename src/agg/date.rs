//! Order-date parsing
//!
//! Order dates arrive as unparsed text in the external `MM/DD/YYYY`
//! format. Date-grouped aggregates parse up front and exclude rows
//! whose text is blank or unparseable; recency comparisons always go
//! through the parsed date, never through the raw text (the external
//! format does not sort lexically in chronological order).

use chrono::NaiveDate;
use thiserror::Error;

/// External order-date format.
pub const ORDER_DATE_FORMAT: &str = "%m/%d/%Y";

/// A date text field that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable date text '{text}'")]
pub struct DateParseError {
    pub text: String,
}

impl DateParseError {
    /// Stable code string for CLI/log output.
    pub fn code(&self) -> &'static str {
        "PARSE_FAILURE"
    }
}

/// Parses order-date text. Blank text is a parse failure.
pub fn parse_order_date(text: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DateParseError {
            text: text.to_string(),
        });
    }
    NaiveDate::parse_from_str(trimmed, ORDER_DATE_FORMAT).map_err(|_| DateParseError {
        text: text.to_string(),
    })
}

/// Calendar-month key ("YYYY-MM") of an order's date text, `None` when
/// the text is absent, blank, or unparseable.
pub fn month_of(text: Option<&str>) -> Option<String> {
    let date = parse_order_date(text?).ok()?;
    Some(date.format("%Y-%m").to_string())
}
