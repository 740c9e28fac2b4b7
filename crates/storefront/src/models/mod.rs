//! View models returned by services and serialized by route handlers.
//!
//! Every field here is already defaulted: nullable upstream data has been
//! resolved by [`crate::normalize`], so templates and JSON consumers never see
//! a missing address line or amount.

pub mod action;
pub mod cart;
pub mod order;
pub mod product;
pub mod wishlist;

pub use action::{ActionResult, Notification, NotificationLevel, ReorderSummary};
pub use cart::{CartLine, CartSummary, ShippingCountry};
pub use order::{
    Address, LineItem, OrderDetail, OrderItemPreview, OrderSummary, OrdersPage, ResolvedOption,
    SelectedOption,
};
pub use product::{OptionValue, ProductCard, ProductOptionDefinition, ProductView};
pub use wishlist::{Wishlist, WishlistItem, WishlistsPage};
