//! Login and logout handlers.
//!
//! A successful login signs the customer id into the `customer` cookie.
//! Logout clears the customer and the cart they were building.

use axum::{Form, Json, extract::State};

use crate::middleware::{CART_COOKIE, CUSTOMER_COOKIE, CookieUpdates, RequestContext};
use crate::models::ActionResult;
use crate::services::auth::{self, LoginForm, SignedIn};
use crate::state::AppState;

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> (CookieUpdates, Json<ActionResult<SignedIn>>) {
    let result = auth::login(state.commerce(), &form).await;

    let mut cookies = CookieUpdates::for_state(&state);
    if let ActionResult::Success {
        data: Some(signed_in),
    } = &result
    {
        cookies.set_customer(signed_in.customer_id, state.cookie_key());
    }

    (cookies, Json(result))
}

/// Log out and clear the customer and cart cookies.
pub async fn logout(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> (CookieUpdates, Json<ActionResult<()>>) {
    auth::logout(state.commerce(), ctx.customer_id).await;

    let mut cookies = CookieUpdates::for_state(&state);
    cookies.remove(CUSTOMER_COOKIE);
    cookies.remove(CART_COOKIE);

    (cookies, Json(ActionResult::done()))
}
