//! Re-adding lines of a past order to the cart.

use std::collections::HashMap;

use cove_core::{CartId, OptionId, OptionValueId};
use serde::Deserialize;
use tracing::instrument;

use super::cart::add_line_item;
use crate::bigcommerce::{CartLineItemInput, CommerceApi, MultipleChoiceSelection, RequestOptions};
use crate::models::{
    LineItem, Notification, NotificationLevel, OrderDetail, ReorderSummary, ResolvedOption,
};

/// Lines to re-add, by selection key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub items: Vec<ReorderItem>,
}

/// One selected line, optionally with the options to use instead of the
/// ones recorded on the order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderItem {
    pub key: String,
    #[serde(default)]
    pub options: Option<Vec<OptionOverride>>,
}

/// An option/value id pair chosen by the shopper. Either id may be absent.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionOverride {
    pub option_entity_id: Option<OptionId>,
    pub value_entity_id: Option<OptionValueId>,
}

impl From<&ResolvedOption> for OptionOverride {
    fn from(option: &ResolvedOption) -> Self {
        Self {
            option_entity_id: option.option_entity_id,
            value_entity_id: option.value_entity_id,
        }
    }
}

/// Build the cart input for a line. Options missing either id are dropped.
fn line_input(item: &LineItem, overrides: Option<&[OptionOverride]>) -> CartLineItemInput {
    let options: Vec<OptionOverride> = overrides.map_or_else(
        || item.selected_options.iter().map(OptionOverride::from).collect(),
        <[OptionOverride]>::to_vec,
    );

    CartLineItemInput {
        product_id: item.product_id,
        quantity: item.quantity,
        selected_options: options
            .into_iter()
            .filter_map(|o| {
                Some(MultipleChoiceSelection {
                    option_id: o.option_entity_id?,
                    value_id: o.value_entity_id?,
                })
            })
            .collect(),
    }
}

/// The single notification summarizing a reorder.
#[must_use]
pub fn reorder_notification(success_count: usize, error_count: usize) -> Notification {
    if success_count > 0 && error_count == 0 {
        Notification {
            level: NotificationLevel::Success,
            title: format!("Successfully added {success_count} item(s) to cart"),
            description: format!(
                "All {success_count} selected items have been added to your cart."
            ),
        }
    } else if success_count > 0 {
        Notification {
            level: NotificationLevel::Warning,
            title: "Partially added to cart".to_string(),
            description: format!(
                "{success_count} item(s) added successfully, {error_count} item(s) failed."
            ),
        }
    } else {
        Notification {
            level: NotificationLevel::Error,
            title: "Failed to add items to cart".to_string(),
            description: "None of the selected items could be added to the cart.".to_string(),
        }
    }
}

/// Re-add the selected lines of `order`, one at a time, in order-line order.
///
/// Each line succeeds or fails independently; failures are counted, not
/// propagated. Keys that match no line are ignored.
#[instrument(skip_all, fields(order_id = %order.id, selected = request.items.len()))]
pub async fn reorder(
    commerce: &dyn CommerceApi,
    order: &OrderDetail,
    request: &ReorderRequest,
    cart_id: &mut Option<CartId>,
    options: &RequestOptions,
) -> ReorderSummary {
    let selected: HashMap<&str, Option<&[OptionOverride]>> = request
        .items
        .iter()
        .map(|i| (i.key.as_str(), i.options.as_deref()))
        .collect();

    let mut success_count = 0;
    let mut error_count = 0;

    for item in &order.items {
        let Some(overrides) = selected.get(item.selection_key.as_str()) else {
            continue;
        };

        match add_line_item(commerce, cart_id, line_input(item, *overrides), options).await {
            Ok(_) => success_count += 1,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    product_id = %item.product_id,
                    key = %item.selection_key,
                    "Failed to re-add order line"
                );
                error_count += 1;
            }
        }
    }

    tracing::info!(success_count, error_count, "Reorder finished");

    ReorderSummary {
        success_count,
        error_count,
        notification: reorder_notification(success_count, error_count),
    }
}
