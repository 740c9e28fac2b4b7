//! Cart and checkout view models.

use cove_core::{CartId, Money, ProductId};
use serde::Serialize;

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: String,
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
}

/// The cart summary. Physical items are listed before digital ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub id: CartId,
    pub currency_code: String,
    pub amount: Money,
    pub items: Vec<CartLine>,
}

impl CartSummary {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

/// A country the store ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingCountry {
    pub id: i64,
    pub name: String,
    pub country_code: String,
}
