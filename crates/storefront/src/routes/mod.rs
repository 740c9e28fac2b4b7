//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//!
//! # Account (requires customer)
//! GET  /account/orders                  - Order history (?after=&first=)
//! GET  /account/orders/{id}             - Order detail with reconciled options
//! POST /account/orders/{id}/reorder     - Re-add selected lines to the cart (JSON)
//! GET  /account/orders/{id}/invoice     - Printable invoice (HTML)
//! GET  /account/wishlists               - Wishlists (?before=&after=)
//! POST /account/wishlists               - Create wishlist
//! POST /account/wishlists/{id}          - Update wishlist
//! POST /account/wishlists/delete        - Delete wishlists
//! GET  /account/recently-viewed         - Recently viewed products
//!
//! # Cart
//! GET  /cart                            - Cart summary
//! POST /cart/add                        - Add to cart
//! GET  /cart/shipping-countries         - Countries with a shipping zone
//!
//! # Catalog
//! GET  /product/{id}                    - Product with option definitions
//! POST /product/{id}/reviews            - Submit a review
//! POST /wishlist/toggle                 - Add or remove a product (requires customer)
//!
//! # Auth
//! POST /login                           - Log in
//! POST /logout                          - Log out
//! ```

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod wishlists;

use axum::{
    Router,
    extract::Request,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders::history))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/reorder", post(orders::reorder))
        .route("/orders/{id}/invoice", get(orders::invoice))
        .route(
            "/wishlists",
            get(wishlists::index).post(wishlists::create),
        )
        .route("/wishlists/delete", post(wishlists::delete))
        .route("/wishlists/{id}", post(wishlists::update))
        .route("/recently-viewed", get(products::recently_viewed))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/shipping-countries", get(cart::shipping_countries))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/product/{id}", get(products::show))
        .route("/product/{id}/reviews", post(products::review))
        .route("/wishlist/toggle", post(wishlists::toggle))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .nest("/cart", cart_routes())
        .nest("/account", account_routes())
}

/// The complete application: routes, state, request ids, tracing and Sentry.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check BigCommerce.
async fn health() -> &'static str {
    "ok"
}
