//! Order history, order detail, reorder and invoice handlers.
//!
//! All routes require a signed-in customer.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use cove_core::OrderId;
use serde::Deserialize;

use crate::bigcommerce::RequestOptions;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{CookieUpdates, RequestContext, RequireCustomer};
use crate::models::{OrderDetail, OrdersPage, ReorderSummary};
use crate::services::orders;
use crate::services::reorder::{self, ReorderRequest};
use crate::state::AppState;

/// Query parameters for the order history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub after: Option<String>,
    pub first: Option<i64>,
}

/// Printable invoice.
#[derive(Template, WebTemplate)]
#[template(path = "orders/invoice.html")]
pub struct InvoiceTemplate {
    pub order: OrderDetail,
}

/// A page of the customer's orders.
pub async fn history(
    State(state): State<AppState>,
    RequireCustomer(customer_id): RequireCustomer,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<OrdersPage>, AppError> {
    let options = RequestOptions::read(Some(customer_id));
    let page = orders::order_history(state.commerce(), query.first, query.after, &options).await?;
    Ok(Json(page))
}

/// One order with reconciled options.
pub async fn show(
    State(state): State<AppState>,
    RequireCustomer(customer_id): RequireCustomer,
    Path(order_id): Path<OrderId>,
) -> Result<Json<OrderDetail>, AppError> {
    let options = RequestOptions::read(Some(customer_id));
    let order = orders::order_detail(state.commerce(), order_id, &options).await?;
    Ok(Json(order))
}

/// Re-add selected lines of an order to the cart.
///
/// Sets the cart cookie when a new cart had to be created.
pub async fn reorder(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(order_id): Path<OrderId>,
    Json(request): Json<ReorderRequest>,
) -> Result<(CookieUpdates, Json<ReorderSummary>), AppError> {
    ctx.require_customer()?;
    if request.items.is_empty() {
        return Err(AppError::BadRequest("no items selected".to_string()));
    }

    let order = orders::order_detail(state.commerce(), order_id, &ctx.read_options()).await?;

    let mut cart_id = ctx.cart_id.clone();
    let summary = reorder::reorder(
        state.commerce(),
        &order,
        &request,
        &mut cart_id,
        &ctx.write_options(),
    )
    .await;

    let mut cookies = CookieUpdates::for_state(&state);
    if let Some(cart_id) = cart_id
        && ctx.cart_id.as_ref() != Some(&cart_id)
    {
        cookies.set_cart(&cart_id);
    }

    Ok((cookies, Json(summary)))
}

/// Render the printable invoice.
pub async fn invoice(
    State(state): State<AppState>,
    RequireCustomer(customer_id): RequireCustomer,
    Path(order_id): Path<OrderId>,
) -> Result<impl IntoResponse, AppError> {
    let options = RequestOptions::read(Some(customer_id));
    let order = orders::order_detail(state.commerce(), order_id, &options).await?;
    Ok(InvoiceTemplate { order })
}
