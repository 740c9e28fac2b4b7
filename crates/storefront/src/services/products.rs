//! Product page, recently viewed products and reviews.

use std::collections::HashMap;

use cove_core::{Email, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::bigcommerce::{CacheTag, CommerceApi, RequestOptions, ReviewInput};
use crate::error::{AppError, ValidationError, add_breadcrumb};
use crate::models::{ActionResult, ProductCard, ProductView};
use crate::normalize;

/// Most product ids kept in the recently-viewed cookie.
pub const RECENTLY_VIEWED_LIMIT: usize = 15;

/// Confirmation returned after a review is accepted.
pub const REVIEW_SUBMITTED: &str = "Review submitted successfully.";

const REVIEW_FAILED: &str = "Failed to submit review.";

/// A product with its option definitions.
///
/// # Errors
///
/// Returns `NotFound` if the product does not exist, or an error if the API
/// request fails.
pub async fn product_view(
    commerce: &dyn CommerceApi,
    product_id: ProductId,
    options: &RequestOptions,
) -> Result<ProductView, AppError> {
    let mut product = commerce
        .product(product_id, options)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let definitions = normalize::option_definitions(product.product_options.take());
    Ok(ProductView {
        card: normalize::product_card(product),
        options: definitions,
    })
}

/// Move `product_id` to the front of the list, dropping any earlier
/// occurrence and anything past [`RECENTLY_VIEWED_LIMIT`].
#[must_use]
pub fn record_recently_viewed(ids: &[ProductId], product_id: ProductId) -> Vec<ProductId> {
    std::iter::once(product_id)
        .chain(ids.iter().copied().filter(|id| *id != product_id))
        .take(RECENTLY_VIEWED_LIMIT)
        .collect()
}

/// Cards for the recently viewed products, in cookie order.
///
/// Ids the API does not return (deleted or hidden products) are dropped.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip(commerce, ids, options), fields(count = ids.len()))]
pub async fn recently_viewed(
    commerce: &dyn CommerceApi,
    ids: &[ProductId],
    options: &RequestOptions,
) -> Result<Vec<ProductCard>, AppError> {
    let ids = &ids[..ids.len().min(RECENTLY_VIEWED_LIMIT)];
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut by_id: HashMap<ProductId, ProductCard> = commerce
        .products_by_ids(ids, options)
        .await?
        .into_iter()
        .map(|p| (p.entity_id, normalize::product_card(p)))
        .collect();

    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

// =============================================================================
// Reviews
// =============================================================================

/// The review form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub rating: String,
    #[serde(default, alias = "name")]
    pub author: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "subject")]
    pub title: String,
    #[serde(default, alias = "comments")]
    pub text: String,
    #[serde(default, alias = "g-recaptcha-response")]
    pub recaptcha_token: Option<String>,
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(value.to_string())
}

impl ReviewForm {
    /// Validate the form into an API input.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a missing field, a rating outside
    /// 1-5 or a malformed email.
    pub fn validate(&self) -> Result<ReviewInput, ValidationError> {
        let rating = required(&self.rating, "rating")?
            .parse::<u8>()
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or(ValidationError::Invalid {
                field: "rating",
                reason: "must be between 1 and 5",
            })?;

        Ok(ReviewInput {
            rating,
            author: required(&self.author, "author")?,
            email: Email::parse(&required(&self.email, "email")?)?,
            title: required(&self.title, "title")?,
            text: required(&self.text, "text")?,
        })
    }

    fn recaptcha_token(&self) -> Option<&str> {
        self.recaptcha_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Submit a product review.
///
/// The form is validated before any upstream call. The first error the API
/// reports becomes the action error.
#[instrument(skip(commerce, form, options))]
pub async fn submit_review(
    commerce: &dyn CommerceApi,
    product_id: ProductId,
    form: &ReviewForm,
    options: &RequestOptions,
) -> ActionResult<String> {
    let review = match form.validate() {
        Ok(review) => review,
        Err(e) => return ActionResult::error(e.to_string()),
    };

    let errors = match commerce
        .add_product_review(product_id, &review, form.recaptcha_token(), options)
        .await
    {
        Ok(errors) => errors,
        Err(e) => return super::action_error("submit_review", &e, REVIEW_FAILED),
    };

    if let Some(error) = errors.first() {
        tracing::warn!(
            product_id = %product_id,
            kind = %error.typename,
            "Review rejected"
        );
        let message = error
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(REVIEW_FAILED);
        return ActionResult::error(message);
    }

    commerce.invalidate(CacheTag::Product(product_id)).await;
    add_breadcrumb(
        "review",
        "Submitted product review",
        &[("product_id", &product_id.to_string())],
    );
    ActionResult::success(REVIEW_SUBMITTED.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(raw: &[i64]) -> Vec<ProductId> {
        raw.iter().copied().map(ProductId::new).collect()
    }

    fn valid_form() -> ReviewForm {
        ReviewForm {
            rating: "4".into(),
            author: " Ada ".into(),
            email: "ada@example.com".into(),
            title: "Soft".into(),
            text: "Fits well.".into(),
            recaptcha_token: None,
        }
    }

    #[test]
    fn test_record_recently_viewed_moves_to_front() {
        assert_eq!(record_recently_viewed(&ids(&[1, 2, 3]), ProductId::new(2)), ids(&[2, 1, 3]));
        assert_eq!(record_recently_viewed(&[], ProductId::new(9)), ids(&[9]));
    }

    #[test]
    fn test_record_recently_viewed_caps_length() {
        let full: Vec<i64> = (1..=15).collect();
        let updated = record_recently_viewed(&ids(&full), ProductId::new(99));
        assert_eq!(updated.len(), RECENTLY_VIEWED_LIMIT);
        assert_eq!(updated[0], ProductId::new(99));
        assert_eq!(updated[14], ProductId::new(14));
    }

    #[test]
    fn test_review_form_validates() {
        let review = valid_form().validate().unwrap();
        assert_eq!(review.rating, 4);
        assert_eq!(review.author, "Ada");
        assert_eq!(review.email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_review_form_rejects_rating_out_of_range() {
        for rating in ["0", "6", "four", ""] {
            let form = ReviewForm {
                rating: rating.into(),
                ..valid_form()
            };
            assert!(form.validate().is_err(), "rating {rating:?}");
        }
    }

    #[test]
    fn test_review_form_requires_fields() {
        let form = ReviewForm {
            title: "  ".into(),
            ..valid_form()
        };
        assert!(matches!(form.validate(), Err(ValidationError::Missing("title"))));

        let form = ReviewForm {
            email: "not-an-email".into(),
            ..valid_form()
        };
        assert!(matches!(form.validate(), Err(ValidationError::Email(_))));
    }

    #[test]
    fn test_review_form_accepts_aliases() {
        let form: ReviewForm = serde_json::from_value(serde_json::json!({
            "rating": "5",
            "name": "Ada",
            "email": "ada@example.com",
            "subject": "Great",
            "comments": "Would buy again."
        }))
        .unwrap();
        let review = form.validate().unwrap();
        assert_eq!(review.title, "Great");
        assert_eq!(review.text, "Would buy again.");
    }

    #[test]
    fn test_blank_recaptcha_token_is_omitted() {
        let form = ReviewForm {
            recaptcha_token: Some("  ".into()),
            ..valid_form()
        };
        assert_eq!(form.recaptcha_token(), None);
    }
}
