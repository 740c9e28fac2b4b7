//! The commerce API seam used by services and route handlers.

use async_trait::async_trait;
use cove_core::{CartId, CustomerId, Email, OptionId, OptionValueId, OrderId, ProductId};
use cove_core::{WishlistId, WishlistItemId};
use secrecy::SecretString;
use serde::Serialize;

use super::management::{Country, ShippingZone};
use super::types::{Cart, Connection, LoginCustomer, Order, Product, ReviewError, Wishlist};
use super::{BigCommerceError, CacheTag};

/// Whether a read may be answered from, and stored in, the shared cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Always go to the API and never store the response.
    NoStore,
    /// Serve from cache until the configured revalidation interval passes.
    Revalidate,
}

/// Per-call context: who is asking, and how the response may be cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Customer the request impersonates (`X-Bc-Customer-Id`).
    pub customer_id: Option<CustomerId>,
    /// Cache directive for this call.
    pub cache: CachePolicy,
}

impl RequestOptions {
    /// Options for a read. Customer-scoped reads are never shared.
    #[must_use]
    pub const fn read(customer_id: Option<CustomerId>) -> Self {
        let cache = if customer_id.is_some() {
            CachePolicy::NoStore
        } else {
            CachePolicy::Revalidate
        };
        Self { customer_id, cache }
    }

    /// Options for a mutation.
    #[must_use]
    pub const fn write(customer_id: Option<CustomerId>) -> Self {
        Self {
            customer_id,
            cache: CachePolicy::NoStore,
        }
    }
}

/// Cursor window for paginated reads.
///
/// Moving backwards uses `last`/`before`, forwards uses `first`/`after`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub first: Option<i64>,
    pub last: Option<i64>,
    pub after: Option<String>,
    pub before: Option<String>,
}

impl PageRequest {
    /// A page of `limit` items after the optional cursor.
    #[must_use]
    pub fn forward(limit: i64, after: Option<String>) -> Self {
        Self {
            first: Some(limit),
            after,
            ..Self::default()
        }
    }

    /// A page of `limit` items around the given cursors. `before` wins when
    /// both are present.
    #[must_use]
    pub fn from_cursors(limit: i64, before: Option<String>, after: Option<String>) -> Self {
        match before.filter(|b| !b.is_empty()) {
            Some(before) => Self {
                last: Some(limit),
                before: Some(before),
                ..Self::default()
            },
            None => Self::forward(limit, after.filter(|a| !a.is_empty())),
        }
    }
}

/// A chosen value for a multiple-choice option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceSelection {
    pub option_id: OptionId,
    pub value_id: OptionValueId,
}

/// A product to put in a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineItemInput {
    pub product_id: ProductId,
    pub quantity: u32,
    pub selected_options: Vec<MultipleChoiceSelection>,
}

/// Name and visibility of a wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistInput {
    pub name: String,
    pub is_public: bool,
}

/// A validated product review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewInput {
    pub rating: u8,
    pub author: String,
    pub email: Email,
    pub title: String,
    pub text: String,
}

/// Operations the storefront needs from the commerce platform.
///
/// Reads take [`RequestOptions::read`], mutations [`RequestOptions::write`].
/// Methods returning `Option` yield `None` when the platform reports no such
/// resource.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// Fetch one order with its consignments and line items.
    async fn order(
        &self,
        order_id: OrderId,
        options: &RequestOptions,
    ) -> Result<Option<Order>, BigCommerceError>;

    /// Fetch the option definitions of several products.
    async fn product_options(
        &self,
        product_ids: &[ProductId],
        options: &RequestOptions,
    ) -> Result<Vec<Product>, BigCommerceError>;

    /// Fetch a page of the signed-in customer's orders.
    async fn customer_orders(
        &self,
        page: &PageRequest,
        options: &RequestOptions,
    ) -> Result<Connection<Order>, BigCommerceError>;

    /// Fetch one product with its option definitions.
    async fn product(
        &self,
        product_id: ProductId,
        options: &RequestOptions,
    ) -> Result<Option<Product>, BigCommerceError>;

    /// Fetch product cards for the given ids, in whatever order the API returns.
    async fn products_by_ids(
        &self,
        product_ids: &[ProductId],
        options: &RequestOptions,
    ) -> Result<Vec<Product>, BigCommerceError>;

    /// Fetch a cart.
    async fn cart(
        &self,
        cart_id: &CartId,
        options: &RequestOptions,
    ) -> Result<Option<Cart>, BigCommerceError>;

    /// Create a cart holding the given line items.
    async fn create_cart(
        &self,
        line_items: &[CartLineItemInput],
        options: &RequestOptions,
    ) -> Result<Cart, BigCommerceError>;

    /// Add line items to an existing cart.
    async fn add_cart_line_items(
        &self,
        cart_id: &CartId,
        line_items: &[CartLineItemInput],
        options: &RequestOptions,
    ) -> Result<Cart, BigCommerceError>;

    /// Fetch a page of the signed-in customer's wishlists.
    async fn wishlists(
        &self,
        page: &PageRequest,
        options: &RequestOptions,
    ) -> Result<Connection<Wishlist>, BigCommerceError>;

    /// Create a wishlist.
    async fn create_wishlist(
        &self,
        input: &WishlistInput,
        options: &RequestOptions,
    ) -> Result<Wishlist, BigCommerceError>;

    /// Rename a wishlist or change its visibility.
    async fn update_wishlist(
        &self,
        wishlist_id: WishlistId,
        input: &WishlistInput,
        options: &RequestOptions,
    ) -> Result<Wishlist, BigCommerceError>;

    /// Delete wishlists.
    async fn delete_wishlists(
        &self,
        wishlist_ids: &[WishlistId],
        options: &RequestOptions,
    ) -> Result<(), BigCommerceError>;

    /// Add products to a wishlist.
    async fn add_wishlist_items(
        &self,
        wishlist_id: WishlistId,
        product_ids: &[ProductId],
        options: &RequestOptions,
    ) -> Result<Wishlist, BigCommerceError>;

    /// Remove items from a wishlist.
    async fn delete_wishlist_items(
        &self,
        wishlist_id: WishlistId,
        item_ids: &[WishlistItemId],
        options: &RequestOptions,
    ) -> Result<Wishlist, BigCommerceError>;

    /// Submit a product review. Returns the typed errors the API reported,
    /// which is empty on success.
    async fn add_product_review(
        &self,
        product_id: ProductId,
        review: &ReviewInput,
        recaptcha_token: Option<&str>,
        options: &RequestOptions,
    ) -> Result<Vec<ReviewError>, BigCommerceError>;

    /// Log a customer in.
    async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginCustomer, BigCommerceError>;

    /// Log the customer out.
    async fn logout(&self, options: &RequestOptions) -> Result<(), BigCommerceError>;

    /// Countries the store knows about (management API).
    async fn countries(&self) -> Result<Vec<Country>, BigCommerceError>;

    /// Shipping zones (management API).
    async fn shipping_zones(&self) -> Result<Vec<ShippingZone>, BigCommerceError>;

    /// Drop cached reads carrying `tag`.
    async fn invalidate(&self, tag: CacheTag);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_options_bypass_cache_for_customers() {
        let anonymous = RequestOptions::read(None);
        assert_eq!(anonymous.cache, CachePolicy::Revalidate);

        let customer = RequestOptions::read(Some(CustomerId::new(7)));
        assert_eq!(customer.cache, CachePolicy::NoStore);
    }

    #[test]
    fn test_write_options_never_cache() {
        assert_eq!(RequestOptions::write(None).cache, CachePolicy::NoStore);
    }

    #[test]
    fn test_page_request_prefers_before() {
        let page = PageRequest::from_cursors(4, Some("b".into()), Some("a".into()));
        assert_eq!(page.last, Some(4));
        assert_eq!(page.before.as_deref(), Some("b"));
        assert!(page.first.is_none());
        assert!(page.after.is_none());
    }

    #[test]
    fn test_page_request_ignores_empty_cursors() {
        let page = PageRequest::from_cursors(4, Some(String::new()), Some(String::new()));
        assert_eq!(page, PageRequest::forward(4, None));
    }
}
