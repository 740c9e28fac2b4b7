//! Product page, recently viewed products and review submission.

use axum::{
    Form, Json,
    extract::{Path, State},
};
use cove_core::ProductId;

use crate::bigcommerce::RequestOptions;
use crate::error::AppError;
use crate::middleware::{CookieUpdates, RequestContext};
use crate::models::{ActionResult, ProductCard, ProductView};
use crate::services::products::{self, ReviewForm};
use crate::state::AppState;

/// A product with its options. Records the view in the recently-viewed
/// cookie.
pub async fn show(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(product_id): Path<ProductId>,
) -> Result<(CookieUpdates, Json<ProductView>), AppError> {
    let view = products::product_view(state.commerce(), product_id, &ctx.read_options()).await?;

    let mut cookies = CookieUpdates::for_state(&state);
    cookies.set_recently_viewed(&products::record_recently_viewed(
        &ctx.recently_viewed,
        product_id,
    ));

    Ok((cookies, Json(view)))
}

/// Products from the recently-viewed cookie, most recent first.
pub async fn recently_viewed(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<ProductCard>>, AppError> {
    let customer_id = ctx.require_customer()?;
    let cards = products::recently_viewed(
        state.commerce(),
        &ctx.recently_viewed,
        &RequestOptions::read(Some(customer_id)),
    )
    .await?;
    Ok(Json(cards))
}

/// Submit a review for a product.
pub async fn review(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(product_id): Path<ProductId>,
    Form(form): Form<ReviewForm>,
) -> Json<ActionResult<String>> {
    Json(products::submit_review(state.commerce(), product_id, &form, &ctx.write_options()).await)
}
