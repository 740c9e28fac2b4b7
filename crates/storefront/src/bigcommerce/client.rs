//! HTTP implementation of [`CommerceApi`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cove_core::{CartId, Email, OrderId, ProductId, WishlistId, WishlistItemId};
use graphql_client::{GraphQLQuery, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use super::api::{
    CachePolicy, CartLineItemInput, CommerceApi, PageRequest, RequestOptions, ReviewInput,
    WishlistInput,
};
use super::cache::{CacheTag, ResponseCache};
use super::management::{Country, ManagementClient, ShippingZone};
use super::queries::{
    AddCartLineItems, AddProductReview, AddWishlistItems, CreateCart, CreateWishlist,
    DeleteWishlistItems, DeleteWishlists, GetCart, GetCustomerOrders, GetOrder, GetProduct,
    GetProductOptions, GetProductsByIds, GetWishlists, Login, Logout, UpdateWishlist,
    add_cart_line_items, add_product_review, add_wishlist_items, cart_input, create_cart,
    create_wishlist, delete_wishlist_items, delete_wishlists, get_cart, get_customer_orders,
    get_order, get_product, get_product_options, get_products_by_ids, login, logout,
    update_wishlist,
};
use super::types::{Cart, Connection, LoginCustomer, Order, Product, ReviewError, Wishlist};
use super::{BigCommerceError, GraphQLError};
use crate::config::BigCommerceConfig;
use crate::normalize::remove_edges_and_nodes;

/// Header carrying the impersonated customer's id.
const CUSTOMER_ID_HEADER: &str = "X-Bc-Customer-Id";

// =============================================================================
// BigCommerceClient
// =============================================================================

/// Client for the BigCommerce Storefront GraphQL API and the management API.
///
/// Requests authenticate with a customer impersonation token, so any
/// customer's data can be read by sending their id alongside.
#[derive(Clone)]
pub struct BigCommerceClient {
    inner: Arc<BigCommerceClientInner>,
}

struct BigCommerceClientInner {
    client: reqwest::Client,
    endpoint: String,
    impersonation_token: SecretString,
    cache: ResponseCache,
    management: ManagementClient,
}

impl BigCommerceClient {
    /// Create a client. Public reads are cached for `revalidate`.
    #[must_use]
    pub fn new(config: &BigCommerceConfig, revalidate: Duration) -> Self {
        let client = reqwest::Client::new();
        let management = ManagementClient::new(
            client.clone(),
            config.rest_base_url(),
            config.access_token.clone(),
        );

        Self {
            inner: Arc::new(BigCommerceClientInner {
                client,
                endpoint: config.graphql_endpoint(),
                impersonation_token: config.customer_impersonation_token.clone(),
                cache: ResponseCache::new(revalidate),
                management,
            }),
        }
    }

    /// Execute a GraphQL operation.
    ///
    /// When `options` allow caching, the `data` payload is served from and
    /// stored in the response cache under `tags`.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
        options: &RequestOptions,
        tags: &[CacheTag],
    ) -> Result<Q::ResponseData, BigCommerceError> {
        let request_body = Q::build_query(variables);

        let cache_key = match options.cache {
            CachePolicy::Revalidate => Some(ResponseCache::key(
                request_body.operation_name,
                &request_body.variables,
            )?),
            CachePolicy::NoStore => None,
        };

        if let Some(key) = &cache_key
            && let Some(data) = self.inner.cache.get(key).await
        {
            debug!(operation = request_body.operation_name, "Cache hit");
            return Ok(serde_json::from_value(data)?);
        }

        let mut request = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.inner.impersonation_token.expose_secret()),
            )
            .header(CONTENT_TYPE, "application/json");
        if let Some(customer_id) = options.customer_id {
            request = request.header(CUSTOMER_ID_HEADER, customer_id.to_string());
        }

        let response = request.json(&request_body).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BigCommerceError::RateLimited(retry_after));
        }

        let response_text = response.text().await?;
        let data = read_response(status, &response_text, request_body.operation_name)?;

        if let Some(key) = cache_key {
            self.inner
                .cache
                .insert(key, tags.to_vec(), data.clone())
                .await;
        }

        Ok(serde_json::from_value(data)?)
    }
}

/// Turn a GraphQL HTTP response into its `data` payload.
///
/// Non-2xx statuses and a non-empty `errors` array become
/// [`BigCommerceError::GraphQL`]; unparseable bodies become
/// [`BigCommerceError::Parse`].
fn read_response(
    status: reqwest::StatusCode,
    body: &str,
    operation: &str,
) -> Result<serde_json::Value, BigCommerceError> {
    if !status.is_success() {
        tracing::error!(
            status = %status,
            operation,
            body = %body.chars().take(500).collect::<String>(),
            "BigCommerce API returned non-success status"
        );
        return Err(BigCommerceError::message(format!(
            "HTTP {status}: {}",
            body.chars().take(200).collect::<String>()
        )));
    }

    let response: Response<serde_json::Value> = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(
                error = %e,
                operation,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse BigCommerce GraphQL response"
            );
            return Err(BigCommerceError::Parse(e));
        }
    };

    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        debug!(errors = ?errors, "GraphQL errors in response");
        return Err(BigCommerceError::GraphQL(
            errors.into_iter().map(GraphQLError::from).collect(),
        ));
    }

    response.data.ok_or_else(|| {
        tracing::error!(operation, "BigCommerce GraphQL response has no data and no errors");
        BigCommerceError::message("No data in response")
    })
}

fn line_items(items: &[CartLineItemInput]) -> Vec<cart_input::LineItem> {
    items.iter().map(cart_input::LineItem::from).collect()
}

fn product_tags(product_ids: &[ProductId]) -> Vec<CacheTag> {
    product_ids.iter().copied().map(CacheTag::Product).collect()
}

#[async_trait]
impl CommerceApi for BigCommerceClient {
    // =========================================================================
    // Orders
    // =========================================================================

    #[instrument(skip(self, options), fields(order_id = %order_id))]
    async fn order(
        &self,
        order_id: OrderId,
        options: &RequestOptions,
    ) -> Result<Option<Order>, BigCommerceError> {
        let variables = get_order::Variables {
            filter: get_order::OrderFilter {
                entity_id: order_id,
            },
        };
        let data = self
            .execute::<GetOrder>(variables, options, &[CacheTag::Orders])
            .await?;
        Ok(data.site.order)
    }

    #[instrument(skip(self, options), fields(count = product_ids.len()))]
    async fn product_options(
        &self,
        product_ids: &[ProductId],
        options: &RequestOptions,
    ) -> Result<Vec<Product>, BigCommerceError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let variables = get_product_options::Variables {
            product_ids: product_ids.to_vec(),
        };
        let data = self
            .execute::<GetProductOptions>(variables, options, &product_tags(product_ids))
            .await?;
        Ok(remove_edges_and_nodes(data.site.products))
    }

    #[instrument(skip(self, options))]
    async fn customer_orders(
        &self,
        page: &PageRequest,
        options: &RequestOptions,
    ) -> Result<Connection<Order>, BigCommerceError> {
        let variables = get_customer_orders::Variables {
            after: page.after.clone(),
            first: page.first,
        };
        let data = self
            .execute::<GetCustomerOrders>(variables, options, &[CacheTag::Orders])
            .await?;
        Ok(data
            .customer
            .and_then(|c| c.orders)
            .unwrap_or_default())
    }

    // =========================================================================
    // Products
    // =========================================================================

    #[instrument(skip(self, options), fields(product_id = %product_id))]
    async fn product(
        &self,
        product_id: ProductId,
        options: &RequestOptions,
    ) -> Result<Option<Product>, BigCommerceError> {
        let variables = get_product::Variables {
            entity_id: product_id,
        };
        let data = self
            .execute::<GetProduct>(variables, options, &[CacheTag::Product(product_id)])
            .await?;
        Ok(data.site.product)
    }

    #[instrument(skip(self, options), fields(count = product_ids.len()))]
    async fn products_by_ids(
        &self,
        product_ids: &[ProductId],
        options: &RequestOptions,
    ) -> Result<Vec<Product>, BigCommerceError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let variables = get_products_by_ids::Variables {
            product_ids: product_ids.to_vec(),
            first: i64::try_from(product_ids.len()).unwrap_or(i64::MAX),
        };
        let data = self
            .execute::<GetProductsByIds>(variables, options, &product_tags(product_ids))
            .await?;
        Ok(remove_edges_and_nodes(data.site.products))
    }

    #[instrument(skip(self, review, recaptcha_token, options), fields(product_id = %product_id))]
    async fn add_product_review(
        &self,
        product_id: ProductId,
        review: &ReviewInput,
        recaptcha_token: Option<&str>,
        options: &RequestOptions,
    ) -> Result<Vec<ReviewError>, BigCommerceError> {
        let variables = add_product_review::Variables {
            input: review.clone(),
            product_entity_id: product_id,
            re_captcha_v2: recaptcha_token.map(|token| add_product_review::ReCaptchaV2Input {
                token: token.to_string(),
            }),
        };
        let data = self
            .execute::<AddProductReview>(variables, options, &[])
            .await?;
        data.catalog
            .and_then(|c| c.add_product_review)
            .map(|r| r.errors)
            .ok_or_else(|| BigCommerceError::message("Failed to submit review"))
    }

    // =========================================================================
    // Cart
    // =========================================================================

    #[instrument(skip(self, options), fields(cart_id = %cart_id))]
    async fn cart(
        &self,
        cart_id: &CartId,
        options: &RequestOptions,
    ) -> Result<Option<Cart>, BigCommerceError> {
        let variables = get_cart::Variables {
            cart_id: cart_id.clone(),
        };
        let data = self
            .execute::<GetCart>(variables, options, &[CacheTag::Cart])
            .await?;
        Ok(data.site.cart)
    }

    #[instrument(skip(self, line_items_input, options), fields(lines = line_items_input.len()))]
    async fn create_cart(
        &self,
        line_items_input: &[CartLineItemInput],
        options: &RequestOptions,
    ) -> Result<Cart, BigCommerceError> {
        let variables = create_cart::Variables {
            create_cart_input: create_cart::CreateCartInput {
                line_items: line_items(line_items_input),
            },
        };
        let data = self.execute::<CreateCart>(variables, options, &[]).await?;
        data.cart
            .and_then(|c| c.create_cart)
            .and_then(|p| p.cart)
            .ok_or_else(|| BigCommerceError::message("Failed to create cart"))
    }

    #[instrument(skip(self, line_items_input, options), fields(cart_id = %cart_id))]
    async fn add_cart_line_items(
        &self,
        cart_id: &CartId,
        line_items_input: &[CartLineItemInput],
        options: &RequestOptions,
    ) -> Result<Cart, BigCommerceError> {
        let variables = add_cart_line_items::Variables {
            add_cart_line_items_input: add_cart_line_items::AddCartLineItemsInput {
                cart_entity_id: cart_id.clone(),
                data: add_cart_line_items::AddCartLineItemsData {
                    line_items: line_items(line_items_input),
                },
            },
        };
        let data = self
            .execute::<AddCartLineItems>(variables, options, &[])
            .await?;
        data.cart
            .and_then(|c| c.add_cart_line_items)
            .and_then(|p| p.cart)
            .ok_or_else(|| BigCommerceError::message("Failed to add items to cart"))
    }

    // =========================================================================
    // Wishlists
    // =========================================================================

    #[instrument(skip(self, options))]
    async fn wishlists(
        &self,
        page: &PageRequest,
        options: &RequestOptions,
    ) -> Result<Connection<Wishlist>, BigCommerceError> {
        let data = self
            .execute::<GetWishlists>(page.clone(), options, &[CacheTag::Wishlists])
            .await?;
        Ok(data
            .customer
            .and_then(|c| c.wishlists)
            .unwrap_or_default())
    }

    #[instrument(skip(self, options), fields(name = %input.name))]
    async fn create_wishlist(
        &self,
        input: &WishlistInput,
        options: &RequestOptions,
    ) -> Result<Wishlist, BigCommerceError> {
        let variables = create_wishlist::Variables {
            input: input.clone(),
        };
        let data = self
            .execute::<CreateWishlist>(variables, options, &[])
            .await?;
        data.wishlist
            .and_then(|w| w.create_wishlist)
            .and_then(|r| r.result)
            .ok_or_else(|| BigCommerceError::message("Failed to create wishlist"))
    }

    #[instrument(skip(self, input, options), fields(wishlist_id = %wishlist_id))]
    async fn update_wishlist(
        &self,
        wishlist_id: WishlistId,
        input: &WishlistInput,
        options: &RequestOptions,
    ) -> Result<Wishlist, BigCommerceError> {
        let variables = update_wishlist::Variables {
            input: update_wishlist::UpdateWishlistInput {
                entity_id: wishlist_id,
                data: input.clone(),
            },
        };
        let data = self
            .execute::<UpdateWishlist>(variables, options, &[])
            .await?;
        data.wishlist
            .and_then(|w| w.update_wishlist)
            .and_then(|r| r.result)
            .ok_or_else(|| BigCommerceError::message("Failed to update wishlist"))
    }

    #[instrument(skip(self, options), fields(count = wishlist_ids.len()))]
    async fn delete_wishlists(
        &self,
        wishlist_ids: &[WishlistId],
        options: &RequestOptions,
    ) -> Result<(), BigCommerceError> {
        let variables = delete_wishlists::Variables {
            input: delete_wishlists::DeleteWishlistsInput {
                entity_ids: wishlist_ids.to_vec(),
            },
        };
        let data = self
            .execute::<DeleteWishlists>(variables, options, &[])
            .await?;
        data.wishlist
            .and_then(|w| w.delete_wishlists)
            .and_then(|r| r.result)
            .map(|_| ())
            .ok_or_else(|| BigCommerceError::message("Failed to delete wishlist"))
    }

    #[instrument(skip(self, options), fields(wishlist_id = %wishlist_id))]
    async fn add_wishlist_items(
        &self,
        wishlist_id: WishlistId,
        product_ids: &[ProductId],
        options: &RequestOptions,
    ) -> Result<Wishlist, BigCommerceError> {
        let variables = add_wishlist_items::Variables {
            input: add_wishlist_items::AddWishlistItemsInput {
                entity_id: wishlist_id,
                items: product_ids
                    .iter()
                    .map(|&product_entity_id| add_wishlist_items::WishlistItemInput {
                        product_entity_id,
                    })
                    .collect(),
            },
        };
        let data = self
            .execute::<AddWishlistItems>(variables, options, &[])
            .await?;
        data.wishlist
            .and_then(|w| w.add_wishlist_items)
            .and_then(|r| r.result)
            .ok_or_else(|| BigCommerceError::message("Failed to add item to wishlist"))
    }

    #[instrument(skip(self, options), fields(wishlist_id = %wishlist_id))]
    async fn delete_wishlist_items(
        &self,
        wishlist_id: WishlistId,
        item_ids: &[WishlistItemId],
        options: &RequestOptions,
    ) -> Result<Wishlist, BigCommerceError> {
        let variables = delete_wishlist_items::Variables {
            input: delete_wishlist_items::DeleteWishlistItemsInput {
                entity_id: wishlist_id,
                item_entity_ids: item_ids.to_vec(),
            },
        };
        let data = self
            .execute::<DeleteWishlistItems>(variables, options, &[])
            .await?;
        data.wishlist
            .and_then(|w| w.delete_wishlist_items)
            .and_then(|r| r.result)
            .ok_or_else(|| BigCommerceError::message("Failed to remove item from wishlist"))
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    #[instrument(skip(self, email, password))]
    async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginCustomer, BigCommerceError> {
        let variables = login::Variables {
            email: email.as_str().to_string(),
            password: password.expose_secret().to_string(),
        };
        let data = self
            .execute::<Login>(variables, &RequestOptions::write(None), &[])
            .await?;
        data.login
            .and_then(|l| l.customer)
            .ok_or_else(|| BigCommerceError::UserError("Invalid email or password.".to_string()))
    }

    #[instrument(skip(self, options))]
    async fn logout(&self, options: &RequestOptions) -> Result<(), BigCommerceError> {
        let data = self
            .execute::<Logout>(logout::Variables {}, options, &[])
            .await?;
        debug!(result = ?data.logout.and_then(|l| l.result), "Logged out");
        Ok(())
    }

    // =========================================================================
    // Management API
    // =========================================================================

    #[instrument(skip(self))]
    async fn countries(&self) -> Result<Vec<Country>, BigCommerceError> {
        self.inner.management.countries().await
    }

    #[instrument(skip(self))]
    async fn shipping_zones(&self) -> Result<Vec<ShippingZone>, BigCommerceError> {
        self.inner.management.shipping_zones().await
    }

    async fn invalidate(&self, tag: CacheTag) {
        self.inner.cache.invalidate(tag);
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_read_response_returns_data() {
        let body = r#"{"data": {"site": {"product": {"entityId": 77}}}}"#;
        let data = read_response(StatusCode::OK, body, "GetProduct").ok();
        assert_eq!(data, Some(json!({"site": {"product": {"entityId": 77}}})));
    }

    #[test]
    fn test_read_response_maps_errors_array() {
        let body = r#"{
            "data": null,
            "errors": [{"message": "Product is out of stock", "path": ["cart", 0]}]
        }"#;
        match read_response(StatusCode::OK, body, "AddCartLineItems") {
            Err(BigCommerceError::GraphQL(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].message, "Product is out of stock");
                assert_eq!(errors[0].path, vec![json!("cart"), json!(0)]);
            }
            other => panic!("expected GraphQL error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_response_ignores_empty_errors_array() {
        let body = r#"{"data": {"ok": true}, "errors": []}"#;
        assert!(read_response(StatusCode::OK, body, "Logout").is_ok());
    }

    #[test]
    fn test_read_response_non_success_status() {
        let err = read_response(StatusCode::UNAUTHORIZED, "invalid token", "GetOrder")
            .expect_err("401 must fail");
        assert_eq!(
            err.to_string(),
            "GraphQL errors: HTTP 401 Unauthorized: invalid token"
        );
    }

    #[test]
    fn test_read_response_parse_failure() {
        let err = read_response(StatusCode::OK, "<html>", "GetOrder").expect_err("not JSON");
        assert!(matches!(err, BigCommerceError::Parse(_)));
    }

    #[test]
    fn test_read_response_without_data_or_errors() {
        let err = read_response(StatusCode::OK, "{}", "GetOrder").expect_err("no data");
        assert_eq!(err.user_message(), "No data in response");
    }

    #[test]
    fn test_product_tags() {
        let tags = product_tags(&[ProductId::new(1), ProductId::new(2)]);
        assert_eq!(
            tags,
            vec![
                CacheTag::Product(ProductId::new(1)),
                CacheTag::Product(ProductId::new(2))
            ]
        );
    }
}
