//! Product view models.

use cove_core::{Money, OptionId, OptionValueId, ProductId};
use serde::Serialize;

pub use crate::bigcommerce::types::ProductOptionKind;

/// A selectable value of a multiple-choice option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionValue {
    pub id: OptionValueId,
    pub label: String,
    pub is_default: bool,
}

/// A product's option definition, as currently configured in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOptionDefinition {
    pub id: OptionId,
    pub display_name: String,
    pub kind: ProductOptionKind,
    pub is_variant_option: bool,
    /// Empty for every kind except multiple-choice.
    pub values: Vec<OptionValue>,
}

/// A product tile: enough to render a link with a price and an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub path: String,
    pub price: Money,
    pub image_url: String,
    pub image_alt: String,
}

/// The product page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub card: ProductCard,
    pub options: Vec<ProductOptionDefinition>,
}
