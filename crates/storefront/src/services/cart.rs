//! Cart actions and shipping destinations.

use cove_core::{CartId, OptionId, OptionValueId, ProductId};
use tracing::instrument;

use crate::bigcommerce::types::Cart;
use crate::bigcommerce::{
    BigCommerceError, CacheTag, CartLineItemInput, CommerceApi, Country, MultipleChoiceSelection,
    RequestOptions, ShippingZone,
};
use crate::error::{AppError, ValidationError, add_breadcrumb};
use crate::models::{ActionResult, CartSummary, ShippingCountry};
use crate::normalize;

/// Message shown when adding to the cart fails for a non-specific reason.
pub const ADD_TO_CART_FAILED: &str = "Failed to add product to cart.";

const ATTRIBUTE_PREFIX: &str = "attribute_";

/// Parse an add-to-cart form.
///
/// Expects `product_id`, an optional `quantity` (missing, zero or
/// unparseable means 1) and any number of `attribute_{optionId}={valueId}`
/// pairs. Malformed attribute pairs are ignored.
///
/// # Errors
///
/// Returns a `ValidationError` if `product_id` is missing or not a number.
pub fn parse_add_to_cart(fields: &[(String, String)]) -> Result<CartLineItemInput, ValidationError> {
    let mut product_id = None;
    let mut quantity = 1;
    let mut selected_options = Vec::new();

    for (key, value) in fields {
        let value = value.trim();
        match key.as_str() {
            "product_id" => {
                product_id = Some(value.parse::<ProductId>().map_err(|_| {
                    ValidationError::Invalid {
                        field: "product_id",
                        reason: "must be a number",
                    }
                })?);
            }
            "quantity" => {
                quantity = value.parse::<u32>().ok().filter(|q| *q > 0).unwrap_or(1);
            }
            _ => {
                if let Some(option_id) = key.strip_prefix(ATTRIBUTE_PREFIX)
                    && let Ok(option_id) = option_id.parse::<OptionId>()
                    && let Ok(value_id) = value.parse::<OptionValueId>()
                {
                    selected_options.push(MultipleChoiceSelection {
                        option_id,
                        value_id,
                    });
                }
            }
        }
    }

    Ok(CartLineItemInput {
        product_id: product_id.ok_or(ValidationError::Missing("product_id"))?,
        quantity,
        selected_options,
    })
}

/// Add a line to the current cart, creating a cart when there is none.
///
/// `cart_id` is updated when a new cart is created, so consecutive calls
/// within one request land in the same cart. A zero quantity is sent as 1.
///
/// # Errors
///
/// Returns an error if any API request fails.
#[instrument(skip(commerce, cart_id, item, options), fields(product_id = %item.product_id))]
pub async fn add_line_item(
    commerce: &dyn CommerceApi,
    cart_id: &mut Option<CartId>,
    mut item: CartLineItemInput,
    options: &RequestOptions,
) -> Result<Cart, BigCommerceError> {
    item.quantity = item.quantity.max(1);

    let existing = match cart_id.as_ref() {
        Some(id) => commerce.cart(id, options).await?,
        None => None,
    };

    let items = [item];
    let cart = match existing {
        Some(cart) => {
            commerce
                .add_cart_line_items(&cart.entity_id, &items, options)
                .await?
        }
        None => commerce.create_cart(&items, options).await?,
    };

    commerce.invalidate(CacheTag::Cart).await;
    *cart_id = Some(cart.entity_id.clone());
    Ok(cart)
}

/// The add-to-cart form action.
pub async fn add_to_cart(
    commerce: &dyn CommerceApi,
    cart_id: &mut Option<CartId>,
    fields: &[(String, String)],
    options: &RequestOptions,
) -> ActionResult<CartSummary> {
    let item = match parse_add_to_cart(fields) {
        Ok(item) => item,
        Err(e) => return ActionResult::error(e.to_string()),
    };
    let product_id = item.product_id.to_string();

    match add_line_item(commerce, cart_id, item, options).await {
        Ok(cart) => {
            add_breadcrumb("cart", "Added product to cart", &[("product_id", &product_id)]);
            ActionResult::success(normalize::cart_summary(cart))
        }
        Err(e) => super::action_error("add_to_cart", &e, ADD_TO_CART_FAILED),
    }
}

/// The current cart, if the cart cookie points at one that still exists.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn cart_summary(
    commerce: &dyn CommerceApi,
    cart_id: Option<&CartId>,
    options: &RequestOptions,
) -> Result<Option<CartSummary>, AppError> {
    let Some(cart_id) = cart_id else {
        return Ok(None);
    };
    let cart = commerce.cart(cart_id, options).await?;
    Ok(cart.map(normalize::cart_summary))
}

// =============================================================================
// Shipping
// =============================================================================

/// Countries covered by at least one shipping zone, in country-list order.
#[must_use]
pub fn countries_in_zones(countries: &[Country], zones: &[ShippingZone]) -> Vec<ShippingCountry> {
    countries
        .iter()
        .filter(|country| {
            zones.iter().any(|zone| {
                zone.locations
                    .iter()
                    .any(|location| location.country_iso2 == country.country_iso2)
            })
        })
        .map(|country| ShippingCountry {
            id: country.id,
            name: country.country.clone(),
            country_code: country.country_iso2.clone(),
        })
        .collect()
}

/// Countries the store ships to.
///
/// Both lists are fetched concurrently. A failed or invalid response is
/// logged and treated as empty, which yields no countries.
#[instrument(skip(commerce))]
pub async fn shipping_countries(commerce: &dyn CommerceApi) -> Vec<ShippingCountry> {
    let (zones, countries) = tokio::join!(commerce.shipping_zones(), commerce.countries());

    let zones = zones.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch shipping zones");
        Vec::new()
    });
    let countries = countries.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch countries");
        Vec::new()
    });

    if zones.is_empty() || countries.is_empty() {
        tracing::warn!(
            zones = zones.len(),
            countries = countries.len(),
            "No shipping destinations available"
        );
        return Vec::new();
    }

    countries_in_zones(&countries, &zones)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_parse_add_to_cart() {
        let item = parse_add_to_cart(&fields(&[
            ("product_id", "77"),
            ("quantity", "3"),
            ("attribute_10", "102"),
            ("attribute_11", "201"),
        ]))
        .unwrap();
        assert_eq!(item.product_id, ProductId::new(77));
        assert_eq!(item.quantity, 3);
        assert_eq!(
            item.selected_options,
            vec![
                MultipleChoiceSelection {
                    option_id: OptionId::new(10),
                    value_id: OptionValueId::new(102)
                },
                MultipleChoiceSelection {
                    option_id: OptionId::new(11),
                    value_id: OptionValueId::new(201)
                },
            ]
        );
    }

    #[test]
    fn test_parse_add_to_cart_quantity_defaults_to_one() {
        for quantity in ["", "0", "abc", "-2"] {
            let item =
                parse_add_to_cart(&fields(&[("product_id", "77"), ("quantity", quantity)])).unwrap();
            assert_eq!(item.quantity, 1, "quantity {quantity:?}");
        }
        let item = parse_add_to_cart(&fields(&[("product_id", "77")])).unwrap();
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_parse_add_to_cart_ignores_malformed_attributes() {
        let item = parse_add_to_cart(&fields(&[
            ("product_id", "77"),
            ("attribute_", "1"),
            ("attribute_x", "1"),
            ("attribute_10", "null"),
            ("color", "red"),
        ]))
        .unwrap();
        assert!(item.selected_options.is_empty());
    }

    #[test]
    fn test_parse_add_to_cart_requires_product() {
        assert!(matches!(
            parse_add_to_cart(&fields(&[("quantity", "1")])),
            Err(ValidationError::Missing("product_id"))
        ));
        assert!(matches!(
            parse_add_to_cart(&fields(&[("product_id", "tee")])),
            Err(ValidationError::Invalid { .. })
        ));
    }

    #[test]
    fn test_countries_in_zones_keeps_country_order() {
        let countries: Vec<Country> = serde_json::from_value(json!([
            {"id": 13, "country": "Australia", "country_iso2": "AU", "country_iso3": "AUS",
             "states": {"url": "", "resource": "/countries/13/states"}},
            {"id": 38, "country": "Canada", "country_iso2": "CA", "country_iso3": "CAN",
             "states": {"url": "", "resource": "/countries/38/states"}},
            {"id": 226, "country": "United States", "country_iso2": "US", "country_iso3": "USA",
             "states": {"url": "", "resource": "/countries/226/states"}}
        ]))
        .unwrap();
        let zones: Vec<ShippingZone> = serde_json::from_value(json!([
            {"id": 1, "name": "US", "type": "country", "enabled": true,
             "locations": [{"id": 1, "country_iso2": "US"}],
             "free_shipping": {"enabled": false, "minimum_sub_total": "0", "exclude_fixed_shipping_products": false}},
            {"id": 2, "name": "Oceania", "type": "country", "enabled": true,
             "locations": [{"id": 2, "country_iso2": "AU"}, {"id": 3, "country_iso2": "AU", "zip": "2000"}],
             "free_shipping": {"enabled": false, "minimum_sub_total": "0", "exclude_fixed_shipping_products": false}}
        ]))
        .unwrap();

        let shipping = countries_in_zones(&countries, &zones);
        let codes: Vec<_> = shipping.iter().map(|c| c.country_code.as_str()).collect();
        assert_eq!(codes, vec!["AU", "US"]);
        assert_eq!(shipping[1].name, "United States");
        assert_eq!(shipping[1].id, 226);
    }
}
