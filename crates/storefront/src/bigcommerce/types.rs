//! Wire types for Storefront API responses.
//!
//! Every nested object the schema marks nullable is an `Option` here.
//! Defaulting to display values happens once, in [`crate::normalize`].

use cove_core::{
    CartId, CustomerId, LineItemId, OptionId, OptionValueId, OrderId, ProductId, WishlistId,
    WishlistItemId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Connections
// =============================================================================

/// A Relay-style connection (`edges { node { ... } }`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    /// Edges in server order. Individual edges may be null.
    pub edges: Option<Vec<Option<Edge<T>>>>,
    /// Cursor information, when selected.
    pub page_info: Option<PageInfo>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            edges: None,
            page_info: None,
        }
    }
}

/// An edge wrapping a single node. The node may be null.
#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: Option<T>,
}

/// Cursor pagination state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

// =============================================================================
// Shared Scalars
// =============================================================================

/// A `Money` object as returned by the Storefront API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMoney {
    pub value: Option<Decimal>,
    pub currency_code: Option<String>,
}

/// A `DateTimeExtended` object.
#[derive(Debug, Clone, Deserialize)]
pub struct DateTimeExtended {
    pub utc: Option<String>,
}

/// An image reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url_original: Option<String>,
    pub alt_text: Option<String>,
}

// =============================================================================
// Orders
// =============================================================================

/// An order, as selected by the order detail and order history queries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub entity_id: OrderId,
    pub ordered_at: Option<DateTimeExtended>,
    pub updated_at: Option<DateTimeExtended>,
    pub status: Option<OrderStatus>,
    pub sub_total: Option<WireMoney>,
    pub total_inc_tax: Option<WireMoney>,
    pub consignments: Option<OrderConsignments>,
    pub billing_address: Option<OrderAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatus {
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderConsignments {
    pub shipping: Option<Connection<ShippingConsignment>>,
}

/// A shipment within an order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingConsignment {
    pub shipping_cost: Option<WireMoney>,
    pub handling_cost: Option<WireMoney>,
    pub line_items: Option<Connection<OrderLineItem>>,
    pub shipping_address: Option<OrderAddress>,
}

/// A purchased line item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub product_entity_id: Option<ProductId>,
    pub entity_id: Option<LineItemId>,
    pub quantity: Option<i64>,
    pub name: Option<String>,
    pub image: Option<Image>,
    pub product_options: Option<Vec<OrderProductOption>>,
    pub sub_total_sale_price: Option<WireMoney>,
}

/// A free-text option recorded on an order line (e.g. `Size: Large`).
#[derive(Debug, Clone, Deserialize)]
pub struct OrderProductOption {
    pub name: Option<String>,
    pub value: Option<String>,
}

/// A postal address on an order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAddress {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub company: Option<String>,
    pub country: Option<String>,
    pub state_or_province: Option<String>,
}

// =============================================================================
// Products
// =============================================================================

/// A catalog product. Option definitions are only present when selected.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub entity_id: ProductId,
    pub name: Option<String>,
    pub path: Option<String>,
    pub prices: Option<Prices>,
    pub default_image: Option<Image>,
    pub product_options: Option<Connection<ProductOption>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Prices {
    pub price: Option<WireMoney>,
}

/// A product option definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    #[serde(rename = "__typename")]
    pub kind: ProductOptionKind,
    pub entity_id: OptionId,
    pub display_name: Option<String>,
    pub is_variant_option: Option<bool>,
    /// Only multiple-choice options carry values.
    pub values: Option<Connection<ProductOptionValue>>,
}

/// The concrete `CatalogProductOption` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductOptionKind {
    #[serde(rename = "MultipleChoiceOption")]
    MultipleChoice,
    #[serde(rename = "CheckboxOption")]
    Checkbox,
    #[serde(rename = "NumberFieldOption")]
    Number,
    #[serde(rename = "TextFieldOption")]
    Text,
    #[serde(rename = "DateFieldOption")]
    Date,
    #[serde(rename = "MultiLineTextFieldOption")]
    MultiLineText,
    #[serde(rename = "FileUploadFieldOption")]
    File,
}

/// A selectable value of a multiple-choice option.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOptionValue {
    pub entity_id: OptionValueId,
    pub label: Option<String>,
    pub is_default: Option<bool>,
}

// =============================================================================
// Cart
// =============================================================================

/// A cart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub entity_id: CartId,
    pub currency_code: Option<String>,
    pub amount: Option<WireMoney>,
    pub line_items: Option<CartLineItems>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItems {
    pub physical_items: Option<Vec<CartLineItem>>,
    pub digital_items: Option<Vec<CartLineItem>>,
}

/// A line in a cart. Cart line ids are opaque strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub entity_id: String,
    pub product_entity_id: ProductId,
    pub name: Option<String>,
    pub quantity: Option<i64>,
}

// =============================================================================
// Wishlists
// =============================================================================

/// A customer wishlist.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    pub entity_id: WishlistId,
    pub name: Option<String>,
    pub is_public: Option<bool>,
    pub token: Option<String>,
    pub items: Option<Connection<WishlistItem>>,
}

/// An item in a wishlist.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub entity_id: WishlistItemId,
    pub product_entity_id: ProductId,
    pub product: Option<WishlistProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WishlistProduct {
    pub name: Option<String>,
}

// =============================================================================
// Reviews and Customers
// =============================================================================

/// One member of the `AddProductReviewError` union.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewError {
    #[serde(rename = "__typename")]
    pub typename: String,
    pub message: Option<String>,
    pub fields: Option<Vec<String>>,
}

/// The customer returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCustomer {
    pub entity_id: CustomerId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_option_kind_from_typename() {
        let option: ProductOption = serde_json::from_value(json!({
            "__typename": "CheckboxOption",
            "entityId": 12,
            "displayName": "Gift wrap",
            "isVariantOption": false
        }))
        .unwrap();
        assert_eq!(option.kind, ProductOptionKind::Checkbox);
        assert!(option.values.is_none());
    }

    #[test]
    fn test_money_accepts_numbers_and_nulls() {
        let money: WireMoney =
            serde_json::from_value(json!({"value": 19.99, "currencyCode": "USD"})).unwrap();
        assert_eq!(money.value, Some(Decimal::new(1999, 2)));

        let money: WireMoney = serde_json::from_value(json!({"value": null})).unwrap();
        assert!(money.value.is_none());
        assert!(money.currency_code.is_none());
    }

    #[test]
    fn test_connection_tolerates_null_edges() {
        let conn: Connection<WishlistItem> = serde_json::from_value(json!({
            "edges": [null, {"node": null}, {"node": {"entityId": 5, "productEntityId": 77}}]
        }))
        .unwrap();
        assert_eq!(conn.edges.unwrap().len(), 3);
    }
}
