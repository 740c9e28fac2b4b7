//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::DateTime;

/// Shown in place of a missing or unparseable date.
pub const DATE_UNAVAILABLE: &str = "Not available";

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats an RFC 3339 timestamp as a long date, e.g. "March 4, 2024".
///
/// Usage in templates: `{{ order.ordered_at|order_date }}`
#[askama::filter_fn]
pub fn order_date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_order_date(&value.to_string()))
}

/// Long-date rendering shared by the filter and JSON views.
#[must_use]
pub fn format_order_date(value: &str) -> String {
    DateTime::parse_from_rfc3339(value.trim()).map_or_else(
        |_| DATE_UNAVAILABLE.to_string(),
        |date| date.format("%B %-d, %Y").to_string(),
    )
}
