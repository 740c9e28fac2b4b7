//! Order view models.

use cove_core::{LineItemId, Money, OptionId, OptionValueId, OrderId, ProductId};
use serde::Serialize;

use super::product::ProductOptionDefinition;
use crate::bigcommerce::types::PageInfo;

/// Payment label shown when the order carries none.
pub const PAYMENT_METHOD_UNSPECIFIED: &str = "Not specified";

/// A flat, fully defaulted postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub email: String,
    pub phone: String,
    pub postal_code: String,
    pub company: String,
    pub country: String,
    pub state_or_province: String,
}

impl Address {
    /// `first last`, skipping empty parts.
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.first_name.as_str(), self.last_name.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A free-text option recorded on an order line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

/// A selected option after reconciliation against the product's current
/// option definitions. Ids are `None` when no definition matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOption {
    pub name: String,
    pub value: String,
    pub option_entity_id: Option<OptionId>,
    pub value_entity_id: Option<OptionValueId>,
}

/// A purchased line with its reconciled options.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub line_item_id: Option<LineItemId>,
    /// Name printed on the order line.
    pub name: String,
    /// Current catalog name of the product, empty if it no longer exists.
    pub product_name: String,
    pub quantity: u32,
    pub price: Money,
    pub image_url: String,
    pub selected_options: Vec<ResolvedOption>,
    pub product_options: Vec<ProductOptionDefinition>,
    /// Resolved value ids joined with `_`, unresolved ids left blank.
    pub value_ids: String,
    /// Key identifying this line in a reorder request.
    pub selection_key: String,
}

impl LineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// The order detail page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: OrderId,
    pub ordered_at: String,
    pub updated_at: String,
    pub status: String,
    pub payment_method: String,
    pub sub_total: Money,
    pub total_inc_tax: Money,
    pub shipping_cost: Money,
    pub items: Vec<LineItem>,
    pub shipping_address: Address,
    pub billing_address: Address,
}

/// Thumbnail row of an order in the order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPreview {
    pub image_url: String,
    pub name: String,
    pub quantity: u32,
}

/// One order in the order history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub ordered_at: String,
    pub updated_at: String,
    pub status: String,
    pub sub_total: Money,
    pub items: Vec<OrderItemPreview>,
}

/// A page of the order history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersPage {
    pub orders: Vec<OrderSummary>,
    pub page_info: PageInfo,
}
