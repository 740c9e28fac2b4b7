//! Application state shared across handlers.

use std::sync::Arc;

use secrecy::ExposeSecret;
use sha2::{Digest, Sha512};
use tower_sessions::cookie::Key;

use crate::bigcommerce::{BigCommerceClient, CommerceApi};
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable. Holds no per-customer data: customers and carts are
/// identified by cookies on each request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    commerce: Arc<dyn CommerceApi>,
    cookie_key: Key,
}

impl AppState {
    /// Create state backed by the BigCommerce HTTP client.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let client = BigCommerceClient::new(&config.bigcommerce, config.revalidate);
        Self::with_commerce(config, Arc::new(client))
    }

    /// Create state backed by any commerce implementation.
    #[must_use]
    pub fn with_commerce(config: StorefrontConfig, commerce: Arc<dyn CommerceApi>) -> Self {
        let cookie_key = derive_cookie_key(config.cookie_secret.expose_secret());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                commerce,
                cookie_key,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The commerce API.
    #[must_use]
    pub fn commerce(&self) -> &dyn CommerceApi {
        self.inner.commerce.as_ref()
    }

    /// Key used to sign the customer cookie.
    #[must_use]
    pub fn cookie_key(&self) -> &Key {
        &self.inner.cookie_key
    }
}

/// Stretch the configured secret to the 64 bytes a cookie key needs.
fn derive_cookie_key(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_key_is_deterministic() {
        let a = derive_cookie_key("a-long-and-random-cookie-secret-value!");
        let b = derive_cookie_key("a-long-and-random-cookie-secret-value!");
        let c = derive_cookie_key("another-long-and-random-cookie-secret!!");
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }
}
