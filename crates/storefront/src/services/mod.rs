//! Page loads and form actions.
//!
//! # Services
//!
//! - `orders` - order history and the reconciled order detail
//! - `reorder` - re-adding order lines to the cart
//! - `cart` - add to cart, cart summary, shipping countries
//! - `wishlist` - wishlist pages and mutations
//! - `products` - product page, recently viewed, reviews
//! - `auth` - customer login and logout
//!
//! Services take the [`CommerceApi`](crate::bigcommerce::CommerceApi) and the
//! request's [`RequestOptions`](crate::bigcommerce::RequestOptions)
//! explicitly. Page loads return `Result<_, AppError>`; form actions return
//! an [`ActionResult`](crate::models::ActionResult) and never fail the request.

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod reorder;
pub mod wishlist;

use crate::bigcommerce::BigCommerceError;
use crate::models::ActionResult;

/// Map an upstream failure to an action error.
///
/// GraphQL and mutation messages reach the shopper; transport and parsing
/// failures are replaced by `fallback`.
fn action_error<T>(action: &'static str, err: &BigCommerceError, fallback: &str) -> ActionResult<T> {
    tracing::warn!(error = %err, action, "Action failed");
    match err {
        BigCommerceError::GraphQL(_) | BigCommerceError::UserError(_) => {
            ActionResult::error(err.user_message())
        }
        _ => ActionResult::error(fallback),
    }
}
