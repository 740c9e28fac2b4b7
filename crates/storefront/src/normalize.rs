//! Conversions from Storefront API wire types to view models.
//!
//! Nullable nested data is defaulted here, once: missing strings become `""`,
//! missing amounts become zero and missing currencies become empty. Nothing in
//! this module performs I/O.

use cove_core::Money;

use crate::bigcommerce::types::{
    Cart, CartLineItem, Connection, OrderAddress, OrderProductOption, Product, ProductOption,
    WireMoney, Wishlist as WireWishlist,
};
use crate::bigcommerce::types::{DateTimeExtended, Order};
use crate::models::{
    Address, CartLine, CartSummary, OptionValue, OrderItemPreview, OrderSummary, ProductCard,
    ProductOptionDefinition, SelectedOption, Wishlist, WishlistItem,
};

// =============================================================================
// Connections
// =============================================================================

/// Flatten a connection into its nodes, in server order.
///
/// Null edges and edges with a null node are dropped; an absent connection
/// yields an empty vector.
#[must_use]
pub fn remove_edges_and_nodes<T>(connection: Option<Connection<T>>) -> Vec<T> {
    connection
        .and_then(|c| c.edges)
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter_map(|edge| edge.node)
        .collect()
}

// =============================================================================
// Scalars
// =============================================================================

/// Default a wire money value.
#[must_use]
pub fn money(value: Option<WireMoney>) -> Money {
    let value = value.unwrap_or_default();
    Money::from_parts(value.value, value.currency_code.as_deref())
}

/// Default a wire money value, using `fallback_currency` when the whole
/// object is missing.
#[must_use]
pub fn money_or_zero_in(value: Option<WireMoney>, fallback_currency: &str) -> Money {
    match value {
        Some(value) => money(Some(value)),
        None => Money::zero(fallback_currency),
    }
}

/// Clamp an upstream quantity into `u32`. Negative or missing becomes zero.
#[must_use]
pub fn quantity(value: Option<i64>) -> u32 {
    value
        .and_then(|q| u32::try_from(q).ok())
        .unwrap_or_default()
}

/// The UTC timestamp string of a date, or `""`.
#[must_use]
pub fn timestamp(value: Option<DateTimeExtended>) -> String {
    value.and_then(|d| d.utc).unwrap_or_default()
}

/// Flatten an address, defaulting every missing field to `""`.
#[must_use]
pub fn address(value: Option<OrderAddress>) -> Address {
    let a = value.unwrap_or_default();
    Address {
        first_name: a.first_name.unwrap_or_default(),
        last_name: a.last_name.unwrap_or_default(),
        address1: a.address1.unwrap_or_default(),
        address2: a.address2.unwrap_or_default(),
        city: a.city.unwrap_or_default(),
        email: a.email.unwrap_or_default(),
        phone: a.phone.unwrap_or_default(),
        postal_code: a.postal_code.unwrap_or_default(),
        company: a.company.unwrap_or_default(),
        country: a.country.unwrap_or_default(),
        state_or_province: a.state_or_province.unwrap_or_default(),
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Free-text options recorded on an order line.
#[must_use]
pub fn selected_options(options: Option<Vec<OrderProductOption>>) -> Vec<SelectedOption> {
    options
        .unwrap_or_default()
        .into_iter()
        .map(|o| SelectedOption {
            name: o.name.unwrap_or_default(),
            value: o.value.unwrap_or_default(),
        })
        .collect()
}

/// Summarize an order for the order history.
#[must_use]
pub fn order_summary(order: Order) -> OrderSummary {
    let items = remove_edges_and_nodes(order.consignments.and_then(|c| c.shipping))
        .into_iter()
        .flat_map(|consignment| remove_edges_and_nodes(consignment.line_items))
        .map(|item| OrderItemPreview {
            image_url: item.image.and_then(|i| i.url_original).unwrap_or_default(),
            name: item.name.unwrap_or_default(),
            quantity: quantity(item.quantity),
        })
        .collect();

    OrderSummary {
        id: order.entity_id,
        ordered_at: timestamp(order.ordered_at),
        updated_at: timestamp(order.updated_at),
        status: order.status.and_then(|s| s.value).unwrap_or_default(),
        sub_total: money(order.sub_total),
        items,
    }
}

// =============================================================================
// Products
// =============================================================================

/// Convert an option definition. Only multiple-choice options carry values.
#[must_use]
pub fn option_definition(option: ProductOption) -> ProductOptionDefinition {
    let values = remove_edges_and_nodes(option.values)
        .into_iter()
        .map(|v| OptionValue {
            id: v.entity_id,
            label: v.label.unwrap_or_default(),
            is_default: v.is_default.unwrap_or_default(),
        })
        .collect();

    ProductOptionDefinition {
        id: option.entity_id,
        display_name: option.display_name.unwrap_or_default(),
        kind: option.kind,
        is_variant_option: option.is_variant_option.unwrap_or_default(),
        values,
    }
}

/// Convert a product's option definitions, in catalog order.
#[must_use]
pub fn option_definitions(
    options: Option<Connection<ProductOption>>,
) -> Vec<ProductOptionDefinition> {
    remove_edges_and_nodes(options)
        .into_iter()
        .map(option_definition)
        .collect()
}

/// Convert a product to a card, ignoring any option definitions.
#[must_use]
pub fn product_card(product: Product) -> ProductCard {
    let image = product.default_image;
    let (image_url, image_alt) = image.map_or_else(Default::default, |i| {
        (
            i.url_original.unwrap_or_default(),
            i.alt_text.unwrap_or_default(),
        )
    });

    ProductCard {
        id: product.entity_id,
        name: product.name.unwrap_or_default(),
        path: product.path.unwrap_or_default(),
        price: money(product.prices.and_then(|p| p.price)),
        image_url,
        image_alt,
    }
}

// =============================================================================
// Cart
// =============================================================================

fn cart_line(item: CartLineItem) -> CartLine {
    CartLine {
        id: item.entity_id,
        product_id: item.product_entity_id,
        name: item.name.unwrap_or_default(),
        quantity: quantity(item.quantity),
    }
}

/// Summarize a cart. Physical items come before digital ones.
#[must_use]
pub fn cart_summary(cart: Cart) -> CartSummary {
    let currency_code = cart.currency_code.unwrap_or_default();
    let amount = money_or_zero_in(cart.amount, &currency_code);
    let (physical, digital) = cart
        .line_items
        .map(|l| {
            (
                l.physical_items.unwrap_or_default(),
                l.digital_items.unwrap_or_default(),
            )
        })
        .unwrap_or_default();

    CartSummary {
        id: cart.entity_id,
        currency_code,
        amount,
        items: physical.into_iter().chain(digital).map(cart_line).collect(),
    }
}

// =============================================================================
// Wishlists
// =============================================================================

/// Convert a wishlist, flattening its items.
#[must_use]
pub fn wishlist(wishlist: WireWishlist) -> Wishlist {
    let items = remove_edges_and_nodes(wishlist.items)
        .into_iter()
        .map(|item| WishlistItem {
            id: item.entity_id,
            product_id: item.product_entity_id,
            product_name: item.product.and_then(|p| p.name).unwrap_or_default(),
        })
        .collect();

    Wishlist {
        id: wishlist.entity_id,
        name: wishlist.name.unwrap_or_default(),
        is_public: wishlist.is_public.unwrap_or_default(),
        token: wishlist.token.unwrap_or_default(),
        items,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cove_core::{OrderId, ProductId};
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::models::product::ProductOptionKind;

    #[test]
    fn test_remove_edges_and_nodes_drops_empty_wrappers() {
        let conn: Connection<i64> = serde_json::from_value(json!({
            "edges": [
                {"node": 1},
                null,
                {"node": 2},
                {"node": null},
                {"node": 3},
                null
            ]
        }))
        .unwrap();
        assert_eq!(remove_edges_and_nodes(Some(conn)), vec![1, 2, 3]);
    }

    #[test]
    fn test_remove_edges_and_nodes_absent_connection() {
        assert!(remove_edges_and_nodes::<i64>(None).is_empty());
        assert!(remove_edges_and_nodes::<i64>(Some(Connection::default())).is_empty());
    }

    #[test]
    fn test_address_defaults_missing_fields() {
        let partial: OrderAddress = serde_json::from_value(json!({
            "firstName": "Ada",
            "city": "London",
            "phone": null
        }))
        .unwrap();
        let address = address(Some(partial));
        assert_eq!(address.first_name, "Ada");
        assert_eq!(address.city, "London");
        assert_eq!(address.phone, "");
        assert_eq!(address.postal_code, "");

        assert_eq!(super::address(None), Address::default());
    }

    #[test]
    fn test_money_defaults() {
        assert_eq!(money(None), Money::default());
        assert!(money(None).is_zero());

        let wire = WireMoney {
            value: Some(Decimal::new(1250, 2)),
            currency_code: None,
        };
        assert_eq!(money(Some(wire)), Money::new(Decimal::new(1250, 2), ""));

        assert_eq!(money_or_zero_in(None, "EUR"), Money::zero("EUR"));
        assert!(!money(None).format().is_empty());
    }

    #[test]
    fn test_quantity_clamps() {
        assert_eq!(quantity(Some(3)), 3);
        assert_eq!(quantity(Some(-1)), 0);
        assert_eq!(quantity(None), 0);
    }

    #[test]
    fn test_order_summary_flattens_consignments() {
        let order: Order = serde_json::from_value(json!({
            "entityId": 118,
            "orderedAt": {"utc": "2024-05-01T10:00:00Z"},
            "status": {"value": "SHIPPED"},
            "subTotal": {"value": 40, "currencyCode": "USD"},
            "consignments": {"shipping": {"edges": [
                {"node": {"lineItems": {"edges": [
                    {"node": {"name": "Tee", "quantity": 2, "image": {"urlOriginal": "https://cdn/tee.jpg"}}}
                ]}}},
                {"node": {"lineItems": {"edges": [
                    null,
                    {"node": {"name": "Cap", "quantity": 1}}
                ]}}}
            ]}}
        }))
        .unwrap();

        let summary = order_summary(order);
        assert_eq!(summary.id, OrderId::new(118));
        assert_eq!(summary.status, "SHIPPED");
        assert_eq!(summary.updated_at, "");
        assert_eq!(
            summary.items,
            vec![
                OrderItemPreview {
                    image_url: "https://cdn/tee.jpg".into(),
                    name: "Tee".into(),
                    quantity: 2
                },
                OrderItemPreview {
                    image_url: String::new(),
                    name: "Cap".into(),
                    quantity: 1
                },
            ]
        );
    }

    #[test]
    fn test_option_definition_keeps_value_order() {
        let option: ProductOption = serde_json::from_value(json!({
            "__typename": "MultipleChoiceOption",
            "entityId": 10,
            "displayName": "Size",
            "isVariantOption": true,
            "values": {"edges": [
                {"node": {"entityId": 102, "label": "Large", "isDefault": false}},
                {"node": {"entityId": 101, "label": "Small", "isDefault": true}}
            ]}
        }))
        .unwrap();

        let definition = option_definition(option);
        assert_eq!(definition.kind, ProductOptionKind::MultipleChoice);
        assert!(definition.is_variant_option);
        let labels: Vec<_> = definition.values.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["Large", "Small"]);
        assert!(definition.values[1].is_default);
    }

    #[test]
    fn test_cart_summary_orders_physical_first() {
        let cart: Cart = serde_json::from_value(json!({
            "entityId": "c0ffee",
            "currencyCode": "USD",
            "amount": {"value": 30, "currencyCode": "USD"},
            "lineItems": {
                "physicalItems": [{"entityId": "a", "productEntityId": 1, "name": "Tee", "quantity": 2}],
                "digitalItems": [{"entityId": "b", "productEntityId": 2, "name": "E-book", "quantity": 1}]
            }
        }))
        .unwrap();

        let summary = cart_summary(cart);
        assert_eq!(summary.items.len(), 2);
        assert_eq!(summary.items[0].product_id, ProductId::new(1));
        assert_eq!(summary.item_count(), 3);
    }

    #[test]
    fn test_wishlist_defaults() {
        let wire: WireWishlist = serde_json::from_value(json!({
            "entityId": 3,
            "items": {"edges": [{"node": {"entityId": 9, "productEntityId": 77}}]}
        }))
        .unwrap();

        let list = wishlist(wire);
        assert_eq!(list.name, "");
        assert!(!list.is_public);
        assert_eq!(list.items[0].product_name, "");
    }
}
