//! Monetary amounts using decimal arithmetic.
//!
//! An amount is never carried without its currency code. Formatting follows
//! the `en-US` conventions used across the storefront: a currency symbol where
//! one is well known (`$1,234.50`, `€9.99`), the ISO code otherwise
//! (`CHF 12.00`), and minor units appropriate to the currency (`¥1,200`).

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A decimal amount paired with its ISO 4217 currency code.
///
/// The currency code may be empty when the upstream record had no currency;
/// such values still format (as a plain number) rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code, upper case.
    pub currency_code: String,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into().trim().to_uppercase(),
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Build an amount from optional upstream parts.
    ///
    /// A missing amount becomes zero and a missing currency becomes empty.
    #[must_use]
    pub fn from_parts(amount: Option<Decimal>, currency_code: Option<&str>) -> Self {
        Self::new(amount.unwrap_or_default(), currency_code.unwrap_or_default())
    }

    /// Whether the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Multiply the amount by a quantity, keeping the currency.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            amount: self.amount * Decimal::from(quantity),
            currency_code: self.currency_code.clone(),
        }
    }

    /// Format for display, e.g. `$1,234.50`.
    ///
    /// Always returns a non-empty string.
    #[must_use]
    pub fn format(&self) -> String {
        let style = CurrencyStyle::for_code(&self.currency_code);
        let rounded = self
            .amount
            .round_dp_with_strategy(style.minor_units, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = group_thousands(&format!(
            "{:.prec$}",
            rounded.abs(),
            prec = style.minor_units as usize
        ));

        match (style.symbol, self.currency_code.is_empty()) {
            (Some(symbol), _) => format!("{sign}{symbol}{digits}"),
            (None, true) => format!("{sign}{digits}"),
            (None, false) => format!("{sign}{} {digits}", self.currency_code),
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::from_parts(None, None)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Display conventions for a currency.
struct CurrencyStyle {
    symbol: Option<&'static str>,
    minor_units: u32,
}

impl CurrencyStyle {
    fn for_code(code: &str) -> Self {
        let (symbol, minor_units) = match code {
            "USD" => (Some("$"), 2),
            "EUR" => (Some("€"), 2),
            "GBP" => (Some("£"), 2),
            "CAD" => (Some("CA$"), 2),
            "AUD" => (Some("A$"), 2),
            "NZD" => (Some("NZ$"), 2),
            "INR" => (Some("₹"), 2),
            "JPY" => (Some("¥"), 0),
            "KRW" => (Some("₩"), 0),
            "MXN" => (Some("MX$"), 2),
            "BRL" => (Some("R$"), 2),
            "CNY" => (Some("CN¥"), 2),
            "ILS" => (Some("₪"), 2),
            "VND" => (Some("₫"), 0),
            "CLP" | "ISK" | "HUF" => (None, 0),
            _ => (None, 2),
        };
        Self {
            symbol,
            minor_units,
        }
    }
}

/// Insert `,` separators into the integer part of a plain decimal string.
fn group_thousands(plain: &str) -> String {
    let (int_part, frac_part) = plain
        .split_once('.')
        .map_or((plain, None), |(i, f)| (i, Some(f)));

    let len = int_part.len();
    let mut grouped = String::with_capacity(len + len / 3 + 4);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
