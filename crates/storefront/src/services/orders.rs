//! Order history and order detail.

use std::collections::HashMap;

use cove_core::{OrderId, ProductId};
use tracing::instrument;

use crate::bigcommerce::types::{Order, Product};
use crate::bigcommerce::{CommerceApi, PageRequest, RequestOptions};
use crate::error::AppError;
use crate::models::order::PAYMENT_METHOD_UNSPECIFIED;
use crate::models::{LineItem, OrderDetail, OrdersPage, ProductOptionDefinition, ResolvedOption};
use crate::normalize::{self, remove_edges_and_nodes};
use crate::reconcile::resolve_options;

/// Orders per history page when the request does not say.
pub const DEFAULT_ORDERS_PER_PAGE: i64 = 10;
/// Largest history page a request may ask for.
pub const MAX_ORDERS_PER_PAGE: i64 = 50;

/// Load a page of the customer's order history.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip(commerce, options))]
pub async fn order_history(
    commerce: &dyn CommerceApi,
    first: Option<i64>,
    after: Option<String>,
    options: &RequestOptions,
) -> Result<OrdersPage, AppError> {
    let first = first
        .unwrap_or(DEFAULT_ORDERS_PER_PAGE)
        .clamp(1, MAX_ORDERS_PER_PAGE);
    let page = PageRequest::forward(first, after.filter(|a| !a.is_empty()));

    let connection = commerce.customer_orders(&page, options).await?;
    let page_info = connection.page_info.clone().unwrap_or_default();
    let orders = remove_edges_and_nodes(Some(connection))
        .into_iter()
        .map(normalize::order_summary)
        .collect();

    Ok(OrdersPage { orders, page_info })
}

/// Load an order and reconcile its lines against the current catalog.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the order does not exist, or an error if
/// an API request fails.
#[instrument(skip(commerce, options), fields(order_id = %order_id))]
pub async fn order_detail(
    commerce: &dyn CommerceApi,
    order_id: OrderId,
    options: &RequestOptions,
) -> Result<OrderDetail, AppError> {
    let order = commerce
        .order(order_id, options)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))?;

    let product_ids = line_item_product_ids(&order);
    let products = commerce.product_options(&product_ids, options).await?;

    Ok(build_order_detail(order, products))
}

/// Unique product ids of an order's lines, in first-seen order.
fn line_item_product_ids(order: &Order) -> Vec<ProductId> {
    let mut ids: Vec<ProductId> = Vec::new();
    let consignments = order
        .consignments
        .as_ref()
        .and_then(|c| c.shipping.as_ref())
        .and_then(|s| s.edges.as_ref());

    for consignment in consignments.into_iter().flatten().flatten() {
        let Some(node) = &consignment.node else {
            continue;
        };
        let lines = node.line_items.as_ref().and_then(|l| l.edges.as_ref());
        for line in lines.into_iter().flatten().flatten() {
            if let Some(id) = line.node.as_ref().and_then(|n| n.product_entity_id)
                && !ids.contains(&id)
            {
                ids.push(id);
            }
        }
    }
    ids
}

/// Key identifying a line in a reorder request.
///
/// Lines with at least one selected option are keyed by their value ids,
/// others by product id; both are suffixed with the line name.
#[must_use]
pub fn selection_key(product_id: ProductId, name: &str, value_ids: &str) -> String {
    if value_ids.is_empty() {
        format!("{product_id}-{name}")
    } else {
        format!("{value_ids}-{name}")
    }
}

fn join_value_ids(options: &[ResolvedOption]) -> String {
    options
        .iter()
        .map(|o| o.value_entity_id.map(|id| id.to_string()).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("_")
}

struct CatalogEntry {
    name: String,
    options: Vec<ProductOptionDefinition>,
}

/// Assemble the order detail view from an order and its products' current
/// option definitions.
#[must_use]
pub fn build_order_detail(order: Order, products: Vec<Product>) -> OrderDetail {
    let catalog: HashMap<ProductId, CatalogEntry> = products
        .into_iter()
        .map(|p| {
            (
                p.entity_id,
                CatalogEntry {
                    name: p.name.unwrap_or_default(),
                    options: normalize::option_definitions(p.product_options),
                },
            )
        })
        .collect();

    let total_inc_tax = normalize::money(order.total_inc_tax);
    let consignments = remove_edges_and_nodes(order.consignments.and_then(|c| c.shipping));

    let mut shipping_cost = None;
    let mut shipping_address = None;
    let mut items = Vec::new();

    for (index, consignment) in consignments.into_iter().enumerate() {
        if index == 0 {
            shipping_cost = consignment.shipping_cost;
            shipping_address = consignment.shipping_address;
        }

        for line in remove_edges_and_nodes(consignment.line_items) {
            let Some(product_id) = line.product_entity_id else {
                tracing::debug!(line_item_id = ?line.entity_id, "Skipping line without product id");
                continue;
            };
            let entry = catalog.get(&product_id);
            let definitions = entry.map(|e| e.options.clone()).unwrap_or_default();

            let selected = normalize::selected_options(line.product_options);
            let selected_options = resolve_options(&selected, &definitions);
            let value_ids = join_value_ids(&selected_options);
            let name = line.name.unwrap_or_default();

            items.push(LineItem {
                product_id,
                line_item_id: line.entity_id,
                selection_key: selection_key(product_id, &name, &value_ids),
                name,
                product_name: entry.map(|e| e.name.clone()).unwrap_or_default(),
                quantity: normalize::quantity(line.quantity),
                price: normalize::money(line.sub_total_sale_price),
                image_url: line.image.and_then(|i| i.url_original).unwrap_or_default(),
                selected_options,
                product_options: definitions,
                value_ids,
            });
        }
    }

    OrderDetail {
        id: order.entity_id,
        ordered_at: normalize::timestamp(order.ordered_at),
        updated_at: normalize::timestamp(order.updated_at),
        status: order.status.and_then(|s| s.value).unwrap_or_default(),
        payment_method: PAYMENT_METHOD_UNSPECIFIED.to_string(),
        sub_total: normalize::money(order.sub_total),
        shipping_cost: normalize::money_or_zero_in(shipping_cost, &total_inc_tax.currency_code),
        total_inc_tax,
        items,
        shipping_address: normalize::address(shipping_address),
        billing_address: normalize::address(order.billing_address),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cove_core::{Money, OptionId, OptionValueId};
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn order_fixture() -> Order {
        serde_json::from_value(json!({
            "entityId": 118,
            "orderedAt": {"utc": "2024-05-01T10:00:00Z"},
            "status": {"value": "Shipped"},
            "subTotal": {"value": 60, "currencyCode": "USD"},
            "totalIncTax": {"value": 66.5, "currencyCode": "USD"},
            "consignments": {"shipping": {"edges": [
                {"node": {
                    "shippingCost": {"value": 6.5, "currencyCode": "USD"},
                    "shippingAddress": {"firstName": "Ada", "city": "London"},
                    "lineItems": {"edges": [
                        {"node": {
                            "productEntityId": 77, "entityId": 1, "quantity": 2,
                            "name": "Tee", "image": {"urlOriginal": "https://cdn/tee.jpg"},
                            "productOptions": [{"name": "Size", "value": "Large"}],
                            "subTotalSalePrice": {"value": 20, "currencyCode": "USD"}
                        }},
                        {"node": {
                            "productEntityId": 78, "entityId": 2, "quantity": 1,
                            "name": "Cap",
                            "productOptions": [{"name": "Color", "value": "Blue"}],
                            "subTotalSalePrice": {"value": 20, "currencyCode": "USD"}
                        }},
                        null
                    ]}
                }},
                {"node": {
                    "shippingCost": {"value": 99, "currencyCode": "USD"},
                    "lineItems": {"edges": [
                        {"node": {"productEntityId": 77, "entityId": 3, "quantity": 1, "name": "Tee"}}
                    ]}
                }}
            ]}},
            "billingAddress": {"firstName": "Ada", "lastName": "Lovelace"}
        }))
        .unwrap()
    }

    fn products_fixture() -> Vec<Product> {
        serde_json::from_value(json!([
            {
                "entityId": 77,
                "name": "Classic Tee",
                "productOptions": {"edges": [{"node": {
                    "__typename": "MultipleChoiceOption",
                    "entityId": 10, "displayName": "Size", "isVariantOption": true,
                    "values": {"edges": [
                        {"node": {"entityId": 101, "label": "Small", "isDefault": true}},
                        {"node": {"entityId": 102, "label": "Large", "isDefault": false}}
                    ]}
                }}]}
            },
            {
                "entityId": 78,
                "name": "Cap",
                "productOptions": {"edges": [{"node": {
                    "__typename": "MultipleChoiceOption",
                    "entityId": 20, "displayName": "Colour", "isVariantOption": true,
                    "values": {"edges": [
                        {"node": {"entityId": 201, "label": "Red"}},
                        {"node": {"entityId": 202, "label": "Blue"}}
                    ]}
                }}]}
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_unique_product_ids_in_first_seen_order() {
        let ids = line_item_product_ids(&order_fixture());
        assert_eq!(ids, vec![ProductId::new(77), ProductId::new(78)]);
    }

    #[test]
    fn test_build_order_detail_reconciles_options() {
        let detail = build_order_detail(order_fixture(), products_fixture());

        assert_eq!(detail.items.len(), 3);

        let tee = &detail.items[0];
        assert_eq!(tee.product_name, "Classic Tee");
        assert_eq!(tee.selected_options[0].option_entity_id, Some(OptionId::new(10)));
        assert_eq!(
            tee.selected_options[0].value_entity_id,
            Some(OptionValueId::new(102))
        );
        assert_eq!(tee.value_ids, "102");
        assert_eq!(tee.selection_key, "102-Tee");
        assert_eq!(tee.product_options.len(), 1);

        // "Color" was renamed to "Colour"; the value label still matches.
        let cap = &detail.items[1];
        assert_eq!(cap.selected_options[0].option_entity_id, Some(OptionId::new(20)));
        assert_eq!(
            cap.selected_options[0].value_entity_id,
            Some(OptionValueId::new(202))
        );

        let plain = &detail.items[2];
        assert!(plain.selected_options.is_empty());
        assert_eq!(plain.selection_key, "77-Tee");
    }

    #[test]
    fn test_build_order_detail_defaults() {
        let detail = build_order_detail(order_fixture(), Vec::new());

        assert_eq!(detail.payment_method, "Not specified");
        assert_eq!(detail.updated_at, "");
        assert_eq!(detail.shipping_cost, Money::new(Decimal::new(65, 1), "USD"));
        assert_eq!(detail.shipping_address.city, "London");
        assert_eq!(detail.shipping_address.postal_code, "");
        assert_eq!(detail.billing_address.full_name(), "Ada Lovelace");

        // Without catalog data nothing resolves, but lines still render.
        let tee = &detail.items[0];
        assert_eq!(tee.product_name, "");
        assert_eq!(tee.selected_options[0].option_entity_id, None);
        assert_eq!(tee.selected_options[0].value, "Large");
        assert_eq!(tee.value_ids, "");
        assert_eq!(tee.selection_key, "77-Tee");
    }

    #[test]
    fn test_shipping_cost_falls_back_to_total_currency() {
        let order: Order = serde_json::from_value(json!({
            "entityId": 5,
            "totalIncTax": {"value": 10, "currencyCode": "EUR"}
        }))
        .unwrap();
        let detail = build_order_detail(order, Vec::new());
        assert_eq!(detail.shipping_cost, Money::zero("EUR"));
        assert!(detail.items.is_empty());
        assert_eq!(detail.shipping_address, crate::models::Address::default());
    }

    #[test]
    fn test_selection_key() {
        assert_eq!(selection_key(ProductId::new(77), "Tee", ""), "77-Tee");
        assert_eq!(selection_key(ProductId::new(77), "Tee", "101_"), "101_-Tee");
    }
}
