//! Cart route handlers.
//!
//! The cart lives in BigCommerce; the browser only holds its id in the
//! `cartId` cookie.

use axum::{Form, Json, extract::State};

use crate::error::AppError;
use crate::middleware::{CookieUpdates, RequestContext};
use crate::models::{ActionResult, CartSummary, ShippingCountry};
use crate::services::cart;
use crate::state::AppState;

/// Add a product to the cart, creating the cart on first use.
pub async fn add(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(fields): Form<Vec<(String, String)>>,
) -> (CookieUpdates, Json<ActionResult<CartSummary>>) {
    let mut cart_id = ctx.cart_id.clone();
    let result = cart::add_to_cart(state.commerce(), &mut cart_id, &fields, &ctx.write_options())
        .await;

    let mut cookies = CookieUpdates::for_state(&state);
    if let Some(cart_id) = cart_id
        && ctx.cart_id.as_ref() != Some(&cart_id)
    {
        cookies.set_cart(&cart_id);
    }

    (cookies, Json(result))
}

/// The current cart, or `null` when there is none.
pub async fn show(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Option<CartSummary>>, AppError> {
    let summary =
        cart::cart_summary(state.commerce(), ctx.cart_id.as_ref(), &ctx.read_options()).await?;
    Ok(Json(summary))
}

/// Countries the store ships to.
pub async fn shipping_countries(State(state): State<AppState>) -> Json<Vec<ShippingCountry>> {
    Json(cart::shipping_countries(state.commerce()).await)
}
