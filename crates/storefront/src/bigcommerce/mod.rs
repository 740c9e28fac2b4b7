//! BigCommerce Storefront (GraphQL) and management (REST) API clients.
//!
//! # Architecture
//!
//! - Operations implement `graphql_client::GraphQLQuery` with hand-written
//!   documents; responses deserialize into the wire types in [`types`]
//! - BigCommerce is the source of truth; nothing is persisted locally
//! - Public reads are cached in memory via `moka` for the configured
//!   revalidation interval, tagged so mutations can invalidate them
//! - Customer-scoped reads and every mutation bypass the cache
//!
//! Route handlers and services only see the [`CommerceApi`] trait, so tests
//! can swap the HTTP client for an in-memory fake.
//!
//! # Example
//!
//! ```rust,ignore
//! use cove_storefront::bigcommerce::{BigCommerceClient, CommerceApi, RequestOptions};
//!
//! let client = BigCommerceClient::new(&config.bigcommerce, config.revalidate);
//! let order = client.order(OrderId::new(118), &RequestOptions::read(Some(customer_id))).await?;
//! ```

mod api;
mod cache;
mod client;
mod management;
pub mod queries;
pub mod types;

pub use api::{
    CachePolicy, CartLineItemInput, CommerceApi, MultipleChoiceSelection, PageRequest,
    RequestOptions, ReviewInput, WishlistInput,
};
pub use cache::{CacheTag, ResponseCache};
pub use client::BigCommerceClient;
pub use management::{Country, CountryStates, FreeShipping, ShippingZone, ZoneLocation};

use thiserror::Error;

/// Message shown to shoppers when the failure has no safe, specific text.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors that can occur when interacting with BigCommerce APIs.
#[derive(Debug, Error)]
pub enum BigCommerceError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by BigCommerce.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// REST response had the right shape but failed validation.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),
}

impl BigCommerceError {
    /// A GraphQL error carrying only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::GraphQL(vec![GraphQLError::new(message)])
    }

    /// Text that is safe to show to a shopper.
    ///
    /// Upstream GraphQL and mutation messages are passed through; transport
    /// and parsing failures collapse to a generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::GraphQL(errors) => errors
                .iter()
                .map(|e| e.message.trim())
                .find(|m| !m.is_empty())
                .unwrap_or(GENERIC_FAILURE_MESSAGE)
                .to_string(),
            Self::UserError(message) | Self::NotFound(message) => message.clone(),
            Self::Http(_) | Self::Parse(_) | Self::RateLimited(_) | Self::InvalidResponse(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

/// A GraphQL error returned by the Storefront API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error with a message and no location or path.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
        }
    }
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(e: graphql_client::Error) -> Self {
        Self {
            message: e.message,
            locations: e.locations.map_or_else(Vec::new, |locs| {
                locs.into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: i64::from(l.line),
                        column: i64::from(l.column),
                    })
                    .collect()
            }),
            path: e.path.map_or_else(Vec::new, |p| {
                p.into_iter()
                    .map(|fragment| match fragment {
                        graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                        graphql_client::PathFragment::Index(i) => {
                            serde_json::Value::Number(i.into())
                        }
                    })
                    .collect()
            }),
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = BigCommerceError::NotFound("order 118".to_string());
        assert_eq!(err.to_string(), "Not found: order 118");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let err = BigCommerceError::GraphQL(vec![
            GraphQLError::new("Field not found"),
            GraphQLError::new("Invalid ID"),
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_graphql_error_path_and_location() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 5, column: 10 }],
            path: vec![
                serde_json::Value::String("site".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }];
        let err = BigCommerceError::GraphQL(errors);
        assert_eq!(err.to_string(), "GraphQL errors: path: site.0 at line 5:10");
    }

    #[test]
    fn test_graphql_error_no_details() {
        let err = BigCommerceError::GraphQL(vec![GraphQLError::new("")]);
        assert_eq!(err.to_string(), "GraphQL errors: [error 1]: (no details)");

        let err = BigCommerceError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_user_message_passes_upstream_text() {
        let err = BigCommerceError::GraphQL(vec![
            GraphQLError::new(" "),
            GraphQLError::new("Invalid credentials"),
        ]);
        assert_eq!(err.user_message(), "Invalid credentials");

        let err = BigCommerceError::UserError("Wishlist not found".to_string());
        assert_eq!(err.user_message(), "Wishlist not found");
    }

    #[test]
    fn test_user_message_hides_transport_details() {
        let err = BigCommerceError::RateLimited(60);
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        let err = BigCommerceError::GraphQL(vec![]);
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }
}
