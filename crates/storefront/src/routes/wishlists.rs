//! Wishlist route handlers.
//!
//! All routes require a signed-in customer. Mutations answer with an
//! [`ActionResult`] so validation and upstream failures reach the form.

use axum::{
    Form, Json,
    extract::{Path, Query, State},
};
use cove_core::{ProductId, WishlistId};
use serde::Deserialize;

use crate::bigcommerce::RequestOptions;
use crate::error::AppError;
use crate::middleware::RequireCustomer;
use crate::models::{ActionResult, Wishlist, WishlistsPage};
use crate::services::wishlist::{self, WishlistToggle};
use crate::state::AppState;

/// Cursor query for the wishlist page.
#[derive(Debug, Deserialize)]
pub struct WishlistsQuery {
    pub before: Option<String>,
    pub after: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    #[serde(default)]
    pub name: String,
    /// Checkbox value; absent means private.
    pub is_public: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub wishlist_ids: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    #[serde(default)]
    pub product_id: String,
    pub wishlist_id: Option<String>,
}

fn checked(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("on" | "true" | "1"))
}

/// A page of the customer's wishlists.
pub async fn index(
    State(state): State<AppState>,
    RequireCustomer(customer_id): RequireCustomer,
    Query(query): Query<WishlistsQuery>,
) -> Result<Json<WishlistsPage>, AppError> {
    let options = RequestOptions::read(Some(customer_id));
    let page =
        wishlist::wishlists_page(state.commerce(), query.before, query.after, &options).await?;
    Ok(Json(page))
}

pub async fn create(
    State(state): State<AppState>,
    RequireCustomer(customer_id): RequireCustomer,
    Form(form): Form<CreateForm>,
) -> Json<ActionResult<Wishlist>> {
    let options = RequestOptions::write(Some(customer_id));
    Json(wishlist::create(state.commerce(), &form.name, &options).await)
}

pub async fn update(
    State(state): State<AppState>,
    RequireCustomer(customer_id): RequireCustomer,
    Path(wishlist_id): Path<WishlistId>,
    Form(form): Form<UpdateForm>,
) -> Json<ActionResult<Wishlist>> {
    let options = RequestOptions::write(Some(customer_id));
    let is_public = checked(form.is_public.as_deref());
    Json(wishlist::update(state.commerce(), wishlist_id, &form.name, is_public, &options).await)
}

pub async fn delete(
    State(state): State<AppState>,
    RequireCustomer(customer_id): RequireCustomer,
    Form(form): Form<DeleteForm>,
) -> Json<ActionResult<()>> {
    let options = RequestOptions::write(Some(customer_id));
    Json(wishlist::delete(state.commerce(), &form.wishlist_ids, &options).await)
}

/// Add a product to a wishlist, or remove it if already present.
pub async fn toggle(
    State(state): State<AppState>,
    RequireCustomer(customer_id): RequireCustomer,
    Form(form): Form<ToggleForm>,
) -> Json<ActionResult<WishlistToggle>> {
    let Ok(product_id) = form.product_id.trim().parse::<ProductId>() else {
        return Json(ActionResult::error("product_id is required"));
    };
    let wishlist_id = match form.wishlist_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<WishlistId>() {
            Ok(id) => Some(id),
            Err(_) => return Json(ActionResult::error("wishlist_id must be a number")),
        },
    };

    let options = RequestOptions::write(Some(customer_id));
    Json(wishlist::toggle_product(state.commerce(), product_id, wishlist_id, &options).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked() {
        assert!(checked(Some("on")));
        assert!(checked(Some("true")));
        assert!(!checked(Some("off")));
        assert!(!checked(None));
    }
}
