//! Wishlist page and mutations.
//!
//! Every mutation invalidates [`CacheTag::Wishlists`] on success.

use cove_core::{ProductId, WishlistId};
use serde::Serialize;
use tracing::instrument;

use crate::bigcommerce::{
    BigCommerceError, CacheTag, CommerceApi, PageRequest, RequestOptions, WishlistInput,
};
use crate::error::{AppError, ValidationError, add_breadcrumb};
use crate::models::{ActionResult, Wishlist, WishlistsPage};
use crate::normalize;

/// Wishlists shown per account page.
pub const WISHLISTS_PER_PAGE: i64 = 4;

/// Name of the wishlist created on first toggle.
pub const DEFAULT_WISHLIST_NAME: &str = "My Wishlist";

/// Page size used while the toggle looks for the target wishlist.
const TOGGLE_LOOKUP_LIMIT: i64 = 50;

/// The wishlist after a toggle, and whether the product is now in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistToggle {
    pub wishlist: Wishlist,
    pub added: bool,
}

/// A page of the customer's wishlists.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn wishlists_page(
    commerce: &dyn CommerceApi,
    before: Option<String>,
    after: Option<String>,
    options: &RequestOptions,
) -> Result<WishlistsPage, AppError> {
    let page = PageRequest::from_cursors(WISHLISTS_PER_PAGE, before, after);
    let mut connection = commerce.wishlists(&page, options).await?;
    let page_info = connection.page_info.take().unwrap_or_default();

    Ok(WishlistsPage {
        wishlists: normalize::remove_edges_and_nodes(Some(connection))
            .into_iter()
            .map(normalize::wishlist)
            .collect(),
        page_info,
    })
}

fn required_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Missing("name"));
    }
    Ok(name.to_string())
}

/// Parse a comma separated id list. Blank entries are skipped.
///
/// # Errors
///
/// Returns a `ValidationError` if an entry is not a number or the list is
/// empty.
pub fn parse_wishlist_ids(value: &str) -> Result<Vec<WishlistId>, ValidationError> {
    let ids = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<WishlistId>().map_err(|_| ValidationError::Invalid {
                field: "wishlist_ids",
                reason: "must be a comma separated list of numbers",
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        return Err(ValidationError::Missing("wishlist_ids"));
    }
    Ok(ids)
}

/// Create a public wishlist.
#[instrument(skip(commerce, options))]
pub async fn create(
    commerce: &dyn CommerceApi,
    name: &str,
    options: &RequestOptions,
) -> ActionResult<Wishlist> {
    let name = match required_name(name) {
        Ok(name) => name,
        Err(e) => return ActionResult::error(e.to_string()),
    };
    let input = WishlistInput {
        name,
        is_public: true,
    };

    match commerce.create_wishlist(&input, options).await {
        Ok(wishlist) => {
            commerce.invalidate(CacheTag::Wishlists).await;
            ActionResult::success(normalize::wishlist(wishlist))
        }
        Err(e) => super::action_error("create_wishlist", &e, "Failed to create wishlist."),
    }
}

/// Rename a wishlist or change its visibility.
#[instrument(skip(commerce, options))]
pub async fn update(
    commerce: &dyn CommerceApi,
    wishlist_id: WishlistId,
    name: &str,
    is_public: bool,
    options: &RequestOptions,
) -> ActionResult<Wishlist> {
    let name = match required_name(name) {
        Ok(name) => name,
        Err(e) => return ActionResult::error(e.to_string()),
    };
    let input = WishlistInput { name, is_public };

    match commerce.update_wishlist(wishlist_id, &input, options).await {
        Ok(wishlist) => {
            commerce.invalidate(CacheTag::Wishlists).await;
            ActionResult::success(normalize::wishlist(wishlist))
        }
        Err(e) => super::action_error("update_wishlist", &e, "Failed to update wishlist."),
    }
}

/// Delete the wishlists named by a comma separated id list.
#[instrument(skip(commerce, options))]
pub async fn delete(
    commerce: &dyn CommerceApi,
    wishlist_ids: &str,
    options: &RequestOptions,
) -> ActionResult<()> {
    let ids = match parse_wishlist_ids(wishlist_ids) {
        Ok(ids) => ids,
        Err(e) => return ActionResult::error(e.to_string()),
    };

    match commerce.delete_wishlists(&ids, options).await {
        Ok(()) => {
            commerce.invalidate(CacheTag::Wishlists).await;
            ActionResult::done()
        }
        Err(e) => super::action_error("delete_wishlists", &e, "Failed to delete wishlist."),
    }
}

async fn find_wishlist(
    commerce: &dyn CommerceApi,
    wishlist_id: WishlistId,
    options: &RequestOptions,
) -> Result<Wishlist, BigCommerceError> {
    let mut after = None;
    loop {
        let page = PageRequest::forward(TOGGLE_LOOKUP_LIMIT, after.take());
        let mut connection = commerce.wishlists(&page, options).await?;
        let page_info = connection.page_info.take().unwrap_or_default();

        if let Some(found) = normalize::remove_edges_and_nodes(Some(connection))
            .into_iter()
            .find(|w| w.entity_id == wishlist_id)
        {
            return Ok(normalize::wishlist(found));
        }

        match page_info.end_cursor {
            Some(cursor) if page_info.has_next_page => after = Some(cursor),
            _ => break,
        }
    }

    Err(BigCommerceError::UserError("Wishlist not found".to_string()))
}

/// Add the product to the wishlist, or remove it if it is already there.
///
/// Without a wishlist id a private [`DEFAULT_WISHLIST_NAME`] list is created
/// to hold the product.
#[instrument(skip(commerce, options))]
pub async fn toggle_product(
    commerce: &dyn CommerceApi,
    product_id: ProductId,
    wishlist_id: Option<WishlistId>,
    options: &RequestOptions,
) -> ActionResult<WishlistToggle> {
    let wishlist = match wishlist_id {
        Some(id) => match find_wishlist(commerce, id, options).await {
            Ok(wishlist) => wishlist,
            Err(e) => {
                return super::action_error(
                    "toggle_wishlist",
                    &e,
                    "Failed to add product to wishlist.",
                );
            }
        },
        None => {
            let input = WishlistInput {
                name: DEFAULT_WISHLIST_NAME.to_string(),
                is_public: false,
            };
            match commerce.create_wishlist(&input, options).await {
                Ok(wishlist) => normalize::wishlist(wishlist),
                Err(e) => {
                    return super::action_error(
                        "toggle_wishlist",
                        &e,
                        "Failed to add product to wishlist.",
                    );
                }
            }
        }
    };

    let result = match wishlist.item_for_product(product_id) {
        Some(item) => commerce
            .delete_wishlist_items(wishlist.id, &[item.id], options)
            .await
            .map(|w| (w, false))
            .map_err(|e| (e, "Failed to remove product from wishlist.")),
        None => commerce
            .add_wishlist_items(wishlist.id, &[product_id], options)
            .await
            .map(|w| (w, true))
            .map_err(|e| (e, "Failed to add product to wishlist.")),
    };

    // A newly created list must not be served stale even if the item call failed.
    commerce.invalidate(CacheTag::Wishlists).await;

    match result {
        Ok((updated, added)) => {
            let product = product_id.to_string();
            let message = if added {
                "Added product to wishlist"
            } else {
                "Removed product from wishlist"
            };
            add_breadcrumb("wishlist", message, &[("product_id", &product)]);
            ActionResult::success(WishlistToggle {
                wishlist: normalize::wishlist(updated),
                added,
            })
        }
        Err((e, fallback)) => super::action_error("toggle_wishlist", &e, fallback),
    }
}
