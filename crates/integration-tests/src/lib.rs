//! Integration tests for the Cove storefront.
//!
//! Tests drive the full router in-process with `tower::ServiceExt::oneshot`
//! against [`FakeCommerce`], an in-memory [`CommerceApi`] seeded with a small
//! catalog, one past order, a cart store and wishlists. No network or
//! BigCommerce credentials are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cove-integration-tests
//! ```
//!
//! # Fixtures
//!
//! - Order 118 for customer 7: `Tee` (Size: Large), `Cap` (Color: Blue,
//!   while the catalog now calls the option "Colour") and `Socks`
//! - Product 79 (`Socks`) can be marked unavailable so cart adds fail
//! - `ada@example.com` / `correct horse` logs in as customer 7

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use cove_core::{
    CartId, CustomerId, Email, OrderId, ProductId, WishlistId, WishlistItemId,
};
use cove_storefront::bigcommerce::types::{
    Cart, Connection, LoginCustomer, Order, Product, ReviewError, Wishlist,
};
use cove_storefront::bigcommerce::{
    BigCommerceError, CacheTag, CartLineItemInput, CommerceApi, Country, PageRequest,
    RequestOptions, ReviewInput, ShippingZone, WishlistInput,
};
use cove_storefront::config::{BigCommerceConfig, StorefrontConfig};
use cove_storefront::routes;
use cove_storefront::state::AppState;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Customer the fixture order belongs to.
pub const CUSTOMER_ID: i64 = 7;
/// The fixture order.
pub const ORDER_ID: i64 = 118;
pub const LOGIN_EMAIL: &str = "ada@example.com";
pub const LOGIN_PASSWORD: &str = "correct horse";

// =============================================================================
// FakeCommerce
// =============================================================================

#[derive(Debug, Clone)]
struct FakeCartLine {
    product_id: ProductId,
    quantity: u32,
}

#[derive(Debug, Clone)]
struct FakeWishlist {
    id: i64,
    name: String,
    is_public: bool,
    items: Vec<(i64, ProductId)>,
}

#[derive(Debug, Default)]
struct FakeState {
    carts: Vec<(String, Vec<FakeCartLine>)>,
    wishlists: Vec<FakeWishlist>,
    unavailable: HashSet<ProductId>,
    review_errors: Vec<String>,
    order_quantities: Vec<(i64, u32)>,
    next_id: i64,
    calls: Vec<String>,
    invalidated: Vec<CacheTag>,
}

/// In-memory commerce backend.
#[derive(Debug, Default)]
pub struct FakeCommerce {
    state: Mutex<FakeState>,
}

impl FakeCommerce {
    /// A backend seeded with the fixture catalog and order.
    #[must_use]
    pub fn new() -> Self {
        let fake = Self::default();
        fake.lock().next_id = 1000;
        fake
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake state poisoned")
    }

    fn record(&self, call: impl Into<String>) {
        self.lock().calls.push(call.into());
    }

    /// Make adding `product_id` to a cart fail upstream.
    pub fn make_unavailable(&self, product_id: ProductId) {
        self.lock().unavailable.insert(product_id);
    }

    /// Make the next review submissions fail with typed errors.
    pub fn reject_reviews(&self, message: &str) {
        self.lock().review_errors.push(message.to_string());
    }

    /// Override the quantity of a fixture order line.
    pub fn set_order_line_quantity(&self, line_entity_id: i64, quantity: u32) {
        self.lock().order_quantities.push((line_entity_id, quantity));
    }

    /// Seed a wishlist and return its id.
    pub fn add_wishlist(&self, name: &str, product_ids: &[i64]) -> WishlistId {
        let mut state = self.lock();
        state.next_id += 1;
        let id = state.next_id;
        let mut items = Vec::new();
        for product_id in product_ids {
            state.next_id += 1;
            items.push((state.next_id, ProductId::new(*product_id)));
        }
        state.wishlists.push(FakeWishlist {
            id,
            name: name.to_string(),
            is_public: false,
            items,
        });
        WishlistId::new(id)
    }

    /// Product ids in a wishlist.
    #[must_use]
    pub fn wishlist_products(&self, wishlist_id: WishlistId) -> Option<Vec<ProductId>> {
        self.lock()
            .wishlists
            .iter()
            .find(|w| w.id == wishlist_id.as_i64())
            .map(|w| w.items.iter().map(|(_, p)| *p).collect())
    }

    #[must_use]
    pub fn wishlist_count(&self) -> usize {
        self.lock().wishlists.len()
    }

    /// Product ids and quantities in a cart, in insertion order.
    #[must_use]
    pub fn cart_lines(&self, cart_id: &str) -> Option<Vec<(ProductId, u32)>> {
        self.lock()
            .carts
            .iter()
            .find(|(id, _)| id == cart_id)
            .map(|(_, lines)| lines.iter().map(|l| (l.product_id, l.quantity)).collect())
    }

    #[must_use]
    pub fn cart_count(&self) -> usize {
        self.lock().carts.len()
    }

    /// Names of the API methods called so far.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Cache tags invalidated so far.
    #[must_use]
    pub fn invalidated(&self) -> Vec<CacheTag> {
        self.lock().invalidated.clone()
    }

    fn cart_json(id: &str, lines: &[FakeCartLine]) -> Value {
        let items: Vec<Value> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                json!({
                    "entityId": format!("line-{i}"),
                    "productEntityId": line.product_id,
                    "name": product_name(line.product_id),
                    "quantity": line.quantity,
                })
            })
            .collect();
        json!({
            "entityId": id,
            "currencyCode": "USD",
            "amount": {"value": 10 * lines.len(), "currencyCode": "USD"},
            "lineItems": {"physicalItems": items, "digitalItems": []},
        })
    }

    fn wishlist_json(wishlist: &FakeWishlist) -> Value {
        let edges: Vec<Value> = wishlist
            .items
            .iter()
            .map(|(id, product_id)| {
                json!({"node": {
                    "entityId": id,
                    "productEntityId": product_id,
                    "product": {"name": product_name(*product_id)},
                }})
            })
            .collect();
        json!({
            "entityId": wishlist.id,
            "name": wishlist.name,
            "isPublic": wishlist.is_public,
            "token": format!("token-{}", wishlist.id),
            "items": {"edges": edges},
        })
    }

    fn check_lines(&self, lines: &[CartLineItemInput]) -> Result<(), BigCommerceError> {
        let state = self.lock();
        if lines.iter().any(|l| state.unavailable.contains(&l.product_id)) {
            return Err(BigCommerceError::message("Product is out of stock"));
        }
        Ok(())
    }

    fn wishlist_mut<'a>(
        state: &'a mut FakeState,
        wishlist_id: WishlistId,
    ) -> Result<&'a mut FakeWishlist, BigCommerceError> {
        state
            .wishlists
            .iter_mut()
            .find(|w| w.id == wishlist_id.as_i64())
            .ok_or_else(|| BigCommerceError::message("Wishlist not found"))
    }
}

fn parse<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, BigCommerceError> {
    Ok(serde_json::from_value(value)?)
}

fn product_name(product_id: ProductId) -> &'static str {
    match product_id.as_i64() {
        77 => "Classic Tee",
        78 => "Cap",
        79 => "Socks",
        _ => "Unknown",
    }
}

fn product_json(product_id: ProductId) -> Option<Value> {
    let options = match product_id.as_i64() {
        77 => json!({"edges": [{"node": {
            "__typename": "MultipleChoiceOption",
            "entityId": 10, "displayName": "Size", "isVariantOption": true,
            "values": {"edges": [
                {"node": {"entityId": 101, "label": "Small", "isDefault": true}},
                {"node": {"entityId": 102, "label": "Large", "isDefault": false}}
            ]}
        }}]}),
        78 => json!({"edges": [{"node": {
            "__typename": "MultipleChoiceOption",
            "entityId": 20, "displayName": "Colour", "isVariantOption": true,
            "values": {"edges": [
                {"node": {"entityId": 201, "label": "Red"}},
                {"node": {"entityId": 202, "label": "Blue"}}
            ]}
        }}]}),
        79 => json!({"edges": []}),
        _ => return None,
    };
    Some(json!({
        "entityId": product_id,
        "name": product_name(product_id),
        "path": format!("/{}/", product_name(product_id).to_lowercase().replace(' ', "-")),
        "prices": {"price": {"value": 20, "currencyCode": "USD"}},
        "defaultImage": {"urlOriginal": format!("https://cdn.example.com/{product_id}.jpg"), "altText": product_name(product_id)},
        "productOptions": options,
    }))
}

/// The fixture order: three lines across one consignment.
#[must_use]
pub fn order_json() -> Value {
    json!({
        "entityId": ORDER_ID,
        "orderedAt": {"utc": "2024-05-01T10:00:00Z"},
        "updatedAt": {"utc": "2024-05-03T08:30:00Z"},
        "status": {"value": "Shipped"},
        "subTotal": {"value": 50, "currencyCode": "USD"},
        "totalIncTax": {"value": 56.5, "currencyCode": "USD"},
        "consignments": {"shipping": {"edges": [{"node": {
            "shippingCost": {"value": 6.5, "currencyCode": "USD"},
            "shippingAddress": {
                "firstName": "Ada", "lastName": "Lovelace", "address1": "12 St James's Square",
                "city": "London", "postalCode": "SW1Y 4JH", "country": "United Kingdom"
            },
            "lineItems": {"edges": [
                {"node": {
                    "productEntityId": 77, "entityId": 1, "quantity": 2, "name": "Tee",
                    "image": {"urlOriginal": "https://cdn.example.com/77.jpg"},
                    "productOptions": [{"name": "Size", "value": "Large"}],
                    "subTotalSalePrice": {"value": 20, "currencyCode": "USD"}
                }},
                {"node": {
                    "productEntityId": 78, "entityId": 2, "quantity": 1, "name": "Cap",
                    "productOptions": [{"name": "Color", "value": "Blue"}],
                    "subTotalSalePrice": {"value": 20, "currencyCode": "USD"}
                }},
                {"node": {
                    "productEntityId": 79, "entityId": 3, "quantity": 1, "name": "Socks",
                    "subTotalSalePrice": {"value": 10, "currencyCode": "USD"}
                }}
            ]}
        }}]}},
        "billingAddress": {"firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com"}
    })
}

#[async_trait]
impl CommerceApi for FakeCommerce {
    async fn order(
        &self,
        order_id: OrderId,
        options: &RequestOptions,
    ) -> Result<Option<Order>, BigCommerceError> {
        self.record("order");
        if order_id.as_i64() != ORDER_ID || options.customer_id != Some(CustomerId::new(CUSTOMER_ID))
        {
            return Ok(None);
        }
        let mut order = order_json();
        let quantities = self.lock().order_quantities.clone();
        if let Some(lines) = order
            .pointer_mut("/consignments/shipping/edges/0/node/lineItems/edges")
            .and_then(Value::as_array_mut)
        {
            for line in lines {
                let node = &mut line["node"];
                if let Some((_, quantity)) = quantities.iter().find(|(id, _)| node["entityId"] == *id) {
                    node["quantity"] = json!(quantity);
                }
            }
        }
        parse(order).map(Some)
    }

    async fn product_options(
        &self,
        product_ids: &[ProductId],
        _options: &RequestOptions,
    ) -> Result<Vec<Product>, BigCommerceError> {
        self.record("product_options");
        product_ids
            .iter()
            .filter_map(|id| product_json(*id))
            .map(parse)
            .collect()
    }

    async fn customer_orders(
        &self,
        _page: &PageRequest,
        options: &RequestOptions,
    ) -> Result<Connection<Order>, BigCommerceError> {
        self.record("customer_orders");
        if options.customer_id != Some(CustomerId::new(CUSTOMER_ID)) {
            return Ok(Connection::default());
        }
        parse(json!({
            "edges": [{"node": order_json()}],
            "pageInfo": {"hasNextPage": false, "hasPreviousPage": false, "endCursor": "YXJyYXljb25uZWN0aW9uOjA="}
        }))
    }

    async fn product(
        &self,
        product_id: ProductId,
        _options: &RequestOptions,
    ) -> Result<Option<Product>, BigCommerceError> {
        self.record("product");
        product_json(product_id).map(parse).transpose()
    }

    async fn products_by_ids(
        &self,
        product_ids: &[ProductId],
        _options: &RequestOptions,
    ) -> Result<Vec<Product>, BigCommerceError> {
        self.record("products_by_ids");
        // Reverse to prove callers restore their own order.
        product_ids
            .iter()
            .rev()
            .filter_map(|id| product_json(*id))
            .map(parse)
            .collect()
    }

    async fn cart(
        &self,
        cart_id: &CartId,
        _options: &RequestOptions,
    ) -> Result<Option<Cart>, BigCommerceError> {
        self.record("cart");
        let cart = {
            let state = self.lock();
            state
                .carts
                .iter()
                .find(|(id, _)| id == cart_id.as_str())
                .map(|(id, lines)| Self::cart_json(id, lines))
        };
        cart.map(parse).transpose()
    }

    async fn create_cart(
        &self,
        line_items: &[CartLineItemInput],
        _options: &RequestOptions,
    ) -> Result<Cart, BigCommerceError> {
        self.record("create_cart");
        self.check_lines(line_items)?;
        let cart = {
            let mut state = self.lock();
            state.next_id += 1;
            let id = format!("cart-{}", state.next_id);
            let lines: Vec<FakeCartLine> = line_items
                .iter()
                .map(|l| FakeCartLine {
                    product_id: l.product_id,
                    quantity: l.quantity,
                })
                .collect();
            let cart = Self::cart_json(&id, &lines);
            state.carts.push((id, lines));
            cart
        };
        parse(cart)
    }

    async fn add_cart_line_items(
        &self,
        cart_id: &CartId,
        line_items: &[CartLineItemInput],
        _options: &RequestOptions,
    ) -> Result<Cart, BigCommerceError> {
        self.record("add_cart_line_items");
        self.check_lines(line_items)?;
        let cart = {
            let mut state = self.lock();
            let (id, lines) = state
                .carts
                .iter_mut()
                .find(|(id, _)| id == cart_id.as_str())
                .ok_or_else(|| BigCommerceError::NotFound(format!("cart {cart_id}")))?;
            lines.extend(line_items.iter().map(|l| FakeCartLine {
                product_id: l.product_id,
                quantity: l.quantity,
            }));
            Self::cart_json(id, lines)
        };
        parse(cart)
    }

    async fn wishlists(
        &self,
        page: &PageRequest,
        _options: &RequestOptions,
    ) -> Result<Connection<Wishlist>, BigCommerceError> {
        self.record("wishlists");
        let limit = usize::try_from(page.first.or(page.last).unwrap_or(50)).unwrap_or(50);
        // Cursors are the index just past the page's last wishlist.
        let start = page
            .after
            .as_deref()
            .and_then(|c| c.parse::<usize>().ok())
            .unwrap_or(0);
        let connection = {
            let state = self.lock();
            let edges: Vec<Value> = state
                .wishlists
                .iter()
                .skip(start)
                .take(limit)
                .map(|w| json!({"node": Self::wishlist_json(w)}))
                .collect();
            let end = start + edges.len();
            json!({
                "edges": edges,
                "pageInfo": {
                    "hasNextPage": state.wishlists.len() > end,
                    "hasPreviousPage": start > 0,
                    "endCursor": end.to_string(),
                }
            })
        };
        parse(connection)
    }

    async fn create_wishlist(
        &self,
        input: &WishlistInput,
        _options: &RequestOptions,
    ) -> Result<Wishlist, BigCommerceError> {
        self.record("create_wishlist");
        let wishlist = {
            let mut state = self.lock();
            state.next_id += 1;
            let wishlist = FakeWishlist {
                id: state.next_id,
                name: input.name.clone(),
                is_public: input.is_public,
                items: Vec::new(),
            };
            let json = Self::wishlist_json(&wishlist);
            state.wishlists.push(wishlist);
            json
        };
        parse(wishlist)
    }

    async fn update_wishlist(
        &self,
        wishlist_id: WishlistId,
        input: &WishlistInput,
        _options: &RequestOptions,
    ) -> Result<Wishlist, BigCommerceError> {
        self.record("update_wishlist");
        let wishlist = {
            let mut state = self.lock();
            let wishlist = Self::wishlist_mut(&mut state, wishlist_id)?;
            wishlist.name.clone_from(&input.name);
            wishlist.is_public = input.is_public;
            Self::wishlist_json(wishlist)
        };
        parse(wishlist)
    }

    async fn delete_wishlists(
        &self,
        wishlist_ids: &[WishlistId],
        _options: &RequestOptions,
    ) -> Result<(), BigCommerceError> {
        self.record("delete_wishlists");
        self.lock()
            .wishlists
            .retain(|w| !wishlist_ids.contains(&WishlistId::new(w.id)));
        Ok(())
    }

    async fn add_wishlist_items(
        &self,
        wishlist_id: WishlistId,
        product_ids: &[ProductId],
        _options: &RequestOptions,
    ) -> Result<Wishlist, BigCommerceError> {
        self.record("add_wishlist_items");
        let wishlist = {
            let mut state = self.lock();
            let mut next_id = state.next_id;
            let wishlist = Self::wishlist_mut(&mut state, wishlist_id)?;
            for product_id in product_ids {
                next_id += 1;
                wishlist.items.push((next_id, *product_id));
            }
            let json = Self::wishlist_json(wishlist);
            state.next_id = next_id;
            json
        };
        parse(wishlist)
    }

    async fn delete_wishlist_items(
        &self,
        wishlist_id: WishlistId,
        item_ids: &[WishlistItemId],
        _options: &RequestOptions,
    ) -> Result<Wishlist, BigCommerceError> {
        self.record("delete_wishlist_items");
        let wishlist = {
            let mut state = self.lock();
            let wishlist = Self::wishlist_mut(&mut state, wishlist_id)?;
            wishlist
                .items
                .retain(|(id, _)| !item_ids.contains(&WishlistItemId::new(*id)));
            Self::wishlist_json(wishlist)
        };
        parse(wishlist)
    }

    async fn add_product_review(
        &self,
        _product_id: ProductId,
        _review: &ReviewInput,
        _recaptcha_token: Option<&str>,
        _options: &RequestOptions,
    ) -> Result<Vec<ReviewError>, BigCommerceError> {
        self.record("add_product_review");
        let messages = std::mem::take(&mut self.lock().review_errors);
        messages
            .into_iter()
            .map(|message| parse(json!({"__typename": "InvalidInputFieldsError", "message": message})))
            .collect()
    }

    async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginCustomer, BigCommerceError> {
        self.record("login");
        if email.as_str() != LOGIN_EMAIL || password.expose_secret() != LOGIN_PASSWORD {
            return Err(BigCommerceError::UserError(
                "Invalid email or password.".to_string(),
            ));
        }
        parse(json!({
            "entityId": CUSTOMER_ID,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": LOGIN_EMAIL,
        }))
    }

    async fn logout(&self, _options: &RequestOptions) -> Result<(), BigCommerceError> {
        self.record("logout");
        Ok(())
    }

    async fn countries(&self) -> Result<Vec<Country>, BigCommerceError> {
        self.record("countries");
        parse(json!([
            {"id": 13, "country": "Australia", "country_iso2": "AU", "country_iso3": "AUS",
             "states": {"url": "https://api.bigcommerce.com/countries/13/states", "resource": "/countries/13/states"}},
            {"id": 38, "country": "Canada", "country_iso2": "CA", "country_iso3": "CAN",
             "states": {"url": "https://api.bigcommerce.com/countries/38/states", "resource": "/countries/38/states"}},
            {"id": 226, "country": "United States", "country_iso2": "US", "country_iso3": "USA",
             "states": {"url": "https://api.bigcommerce.com/countries/226/states", "resource": "/countries/226/states"}}
        ]))
    }

    async fn shipping_zones(&self) -> Result<Vec<ShippingZone>, BigCommerceError> {
        self.record("shipping_zones");
        parse(json!([
            {"id": 1, "name": "Domestic", "type": "country", "enabled": true,
             "locations": [{"id": 4, "country_iso2": "US"}],
             "free_shipping": {"enabled": true, "minimum_sub_total": "100.0000", "exclude_fixed_shipping_products": false}},
            {"id": 2, "name": "Down Under", "type": "country", "enabled": true,
             "locations": [{"id": 5, "country_iso2": "AU"}],
             "free_shipping": {"enabled": false, "minimum_sub_total": "0.0000", "exclude_fixed_shipping_products": false}}
        ]))
    }

    async fn invalidate(&self, tag: CacheTag) {
        self.lock().invalidated.push(tag);
    }
}

// =============================================================================
// Test application
// =============================================================================

/// Configuration for tests. No value is used to reach the network.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        cookie_secret: SecretString::from("kV9#pQ2$wL7!zR4&mN8*tY3^bH6@cJ1%".to_string()),
        revalidate: Duration::from_secs(60),
        bigcommerce: BigCommerceConfig {
            store_hash: "abc123".to_string(),
            channel_id: 1,
            customer_impersonation_token: SecretString::from("impersonation".to_string()),
            access_token: SecretString::from("management".to_string()),
            graphql_domain: "mybigcommerce.test".to_string(),
            api_host: "api.bigcommerce.test".to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// The full router over a shared [`FakeCommerce`].
pub struct TestApp {
    pub commerce: Arc<FakeCommerce>,
    router: Router,
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        let commerce = Arc::new(FakeCommerce::new());
        let state = AppState::with_commerce(test_config(), commerce.clone());
        Self {
            commerce,
            router: routes::app(state),
        }
    }

    /// Send a request through a fresh clone of the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Log in as the fixture customer and return the `Cookie` header value.
    pub async fn sign_in(&self) -> String {
        let response = self
            .send(form_post(
                "/login",
                &format!("email={LOGIN_EMAIL}&password=correct+horse"),
                None,
            ))
            .await;
        cookie_header(&response)
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// A GET request with an optional `Cookie` header.
#[must_use]
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("valid request")
}

/// A url-encoded form POST.
#[must_use]
pub fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("valid request")
}

/// A JSON POST.
#[must_use]
pub fn json_post(uri: &str, body: &Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("valid request")
}

/// Read a JSON response body.
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    serde_json::from_slice(&bytes).expect("JSON body")
}

/// Read a text response body.
pub async fn text_body(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8(bytes.to_vec()).expect("UTF-8 body")
}

/// `Set-Cookie` headers of a response, as `name=value` pairs.
#[must_use]
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(str::to_string)
        .collect()
}

/// Join a response's cookies into a request `Cookie` header value.
#[must_use]
pub fn cookie_header(response: &Response<Body>) -> String {
    set_cookies(response).join("; ")
}
