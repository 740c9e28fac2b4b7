//! HTTP boundary errors with Sentry integration.
//!
//! Page handlers return `Result<T, AppError>`. Form actions report failures
//! inside an [`ActionResult`](crate::models::ActionResult) instead, so only
//! page loads and malformed requests surface here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cove_core::EmailError;
use thiserror::Error;

use crate::bigcommerce::BigCommerceError;

/// Form input rejected before any upstream call.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    #[error("invalid email: {0}")]
    Email(#[from] EmailError),
}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// BigCommerce API call failed.
    #[error("BigCommerce error: {0}")]
    BigCommerce(#[from] BigCommerceError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No signed-in customer.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed path or query.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Form input failed validation.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The customer must sign in first.
    #[must_use]
    pub fn sign_in_required() -> Self {
        Self::Unauthorized("sign in required".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::BigCommerce(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::BigCommerce(BigCommerceError::NotFound(_)) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::BigCommerce(_) => StatusCode::BAD_GATEWAY,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Upstream and internal details stay in the logs.
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::BigCommerce(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Associate subsequent Sentry events with a customer.
pub fn set_sentry_user(customer_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(customer_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Stop associating Sentry events with the customer.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Record a customer action as a Sentry breadcrumb.
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product to cart", &[("product_id", "77")]);
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb.data.insert(
            (*key).to_string(),
            serde_json::Value::String((*value).to_string()),
        );
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 118".to_string());
        assert_eq!(err.to_string(), "Not found: order 118");

        let err = AppError::from(ValidationError::Missing("product_id"));
        assert_eq!(err.to_string(), "Invalid input: product_id is required");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            status_of(AppError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(AppError::sign_in_required()), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AppError::BadRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ValidationError::Invalid {
                field: "rating",
                reason: "must be between 1 and 5"
            }
            .into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(BigCommerceError::RateLimited(3).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(BigCommerceError::NotFound("product 9".into()).into()),
            StatusCode::NOT_FOUND
        );
    }
}
