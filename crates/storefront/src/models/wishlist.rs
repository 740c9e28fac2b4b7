//! Wishlist view models.

use cove_core::{ProductId, WishlistId, WishlistItemId};
use serde::Serialize;

use crate::bigcommerce::types::PageInfo;

/// An item in a wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub product_id: ProductId,
    pub product_name: String,
}

/// A customer wishlist with its items in server order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    pub id: WishlistId,
    pub name: String,
    pub is_public: bool,
    pub token: String,
    pub items: Vec<WishlistItem>,
}

impl Wishlist {
    /// The item holding `product_id`, if the product is already saved.
    #[must_use]
    pub fn item_for_product(&self, product_id: ProductId) -> Option<&WishlistItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }
}

/// A page of wishlists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistsPage {
    pub wishlists: Vec<Wishlist>,
    pub page_info: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wishlist(items: &[(i64, i64)]) -> Wishlist {
        Wishlist {
            id: WishlistId::new(1),
            name: "My Wishlist".into(),
            is_public: false,
            token: String::new(),
            items: items
                .iter()
                .map(|&(item, product)| WishlistItem {
                    id: WishlistItemId::new(item),
                    product_id: ProductId::new(product),
                    product_name: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_item_for_product_returns_matching_item_id() {
        let list = wishlist(&[(10, 77), (11, 78)]);
        let item = list.item_for_product(ProductId::new(78));
        assert_eq!(item.map(|i| i.id), Some(WishlistItemId::new(11)));
    }

    #[test]
    fn test_item_for_product_absent() {
        let list = wishlist(&[(10, 77)]);
        assert!(list.item_for_product(ProductId::new(99)).is_none());
        assert!(wishlist(&[]).item_for_product(ProductId::new(77)).is_none());
    }
}
