//! Request-scoped customer and cart state, carried in cookies.
//!
//! There is no server-side session store. Each request rebuilds its context
//! from three cookies:
//!
//! - `customer`: the signed-in customer's id, signed with the cookie key
//! - `cartId`: the BigCommerce cart id
//! - `recentlyViewedProducts`: url-encoded JSON array of product ids
//!
//! Handlers that change any of them return a [`CookieUpdates`] response part.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap, HeaderValue,
        header::{ACCEPT_LANGUAGE, COOKIE, SET_COOKIE},
        request::Parts,
    },
    response::{IntoResponseParts, ResponseParts},
};
use cove_core::{CartId, CustomerId, ProductId};
use tower_sessions::cookie::{Cookie, CookieJar, Key, SameSite, time::Duration};

use crate::bigcommerce::RequestOptions;
use crate::error::AppError;
use crate::state::AppState;

/// Cookie holding the signed customer id.
pub const CUSTOMER_COOKIE: &str = "customer";
/// Cookie holding the cart id.
pub const CART_COOKIE: &str = "cartId";
/// Cookie holding recently viewed product ids.
pub const RECENTLY_VIEWED_COOKIE: &str = "recentlyViewedProducts";

const DEFAULT_LOCALE: &str = "en-US";
const LONG_LIVED: Duration = Duration::days(30);

/// Customer, cart and browsing state of the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Verified customer id. `None` if absent or the signature does not match.
    pub customer_id: Option<CustomerId>,
    pub cart_id: Option<CartId>,
    /// Most recent first.
    pub recently_viewed: Vec<ProductId>,
    pub locale: String,
}

impl RequestContext {
    /// Build the context from request headers.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, key: &Key) -> Self {
        let jar = parse_cookies(headers);

        let customer_id = jar
            .signed(key)
            .get(CUSTOMER_COOKIE)
            .and_then(|c| c.value().parse().ok());

        let cart_id = jar
            .get(CART_COOKIE)
            .map(Cookie::value)
            .filter(|v| !v.is_empty())
            .map(CartId::new);

        let recently_viewed = jar
            .get(RECENTLY_VIEWED_COOKIE)
            .map(|c| decode_recently_viewed(c.value()))
            .unwrap_or_default();

        let locale = headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(first_language_tag)
            .unwrap_or(DEFAULT_LOCALE)
            .to_string();

        Self {
            customer_id,
            cart_id,
            recently_viewed,
            locale,
        }
    }

    /// The signed-in customer, or 401.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` when no customer is signed in.
    pub fn require_customer(&self) -> Result<CustomerId, AppError> {
        self.customer_id.ok_or_else(AppError::sign_in_required)
    }

    /// Options for reads made on behalf of this request.
    #[must_use]
    pub const fn read_options(&self) -> RequestOptions {
        RequestOptions::read(self.customer_id)
    }

    /// Options for mutations made on behalf of this request.
    #[must_use]
    pub const fn write_options(&self) -> RequestOptions {
        RequestOptions::write(self.customer_id)
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers, state.cookie_key()))
    }
}

/// Extractor that requires a signed-in customer.
///
/// Rejects with 401 when the `customer` cookie is missing or forged.
///
/// ```rust,ignore
/// async fn orders(RequireCustomer(customer_id): RequireCustomer) -> impl IntoResponse {
///     format!("Orders for {customer_id}")
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireCustomer(pub CustomerId);

impl FromRequestParts<AppState> for RequireCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        RequestContext::from_headers(&parts.headers, state.cookie_key())
            .require_customer()
            .map(Self)
    }
}

fn parse_cookies(headers: &HeaderMap) -> CookieJar {
    let mut jar = CookieJar::new();
    for header in headers.get_all(COOKIE) {
        let Ok(header) = header.to_str() else {
            continue;
        };
        for cookie in Cookie::split_parse(header).flatten() {
            jar.add_original(cookie.into_owned());
        }
    }
    jar
}

fn first_language_tag(header: &str) -> Option<&str> {
    header
        .split(',')
        .next()
        .and_then(|tag| tag.split(';').next())
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && *tag != "*")
}

/// Decode the recently viewed cookie. Malformed values read as empty.
#[must_use]
pub fn decode_recently_viewed(value: &str) -> Vec<ProductId> {
    urlencoding::decode(value)
        .ok()
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

/// Encode product ids for the recently viewed cookie.
#[must_use]
pub fn encode_recently_viewed(ids: &[ProductId]) -> String {
    let json = serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string());
    urlencoding::encode(&json).into_owned()
}

// =============================================================================
// CookieUpdates
// =============================================================================

/// `Set-Cookie` headers to attach to a response.
#[derive(Debug, Default)]
pub struct CookieUpdates {
    secure: bool,
    cookies: Vec<Cookie<'static>>,
}

impl CookieUpdates {
    /// Start an empty set of updates. `secure` sets the `Secure` attribute.
    #[must_use]
    pub fn new(secure: bool) -> Self {
        Self {
            secure,
            cookies: Vec::new(),
        }
    }

    /// Start an empty set of updates configured for this deployment.
    #[must_use]
    pub fn for_state(state: &AppState) -> Self {
        Self::new(state.config().secure_cookies())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    fn base(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }

    /// Remember the cart for the rest of the browser session.
    pub fn set_cart(&mut self, cart_id: &CartId) {
        let cookie = self.base(CART_COOKIE, cart_id.as_str().to_string());
        self.cookies.push(cookie);
    }

    /// Sign the customer in.
    pub fn set_customer(&mut self, customer_id: CustomerId, key: &Key) {
        let mut cookie = self.base(CUSTOMER_COOKIE, customer_id.to_string());
        cookie.set_max_age(LONG_LIVED);

        let mut jar = CookieJar::new();
        jar.signed_mut(key).add(cookie);
        if let Some(signed) = jar.get(CUSTOMER_COOKIE) {
            self.cookies.push(signed.clone());
        }
    }

    /// Replace the recently viewed list.
    pub fn set_recently_viewed(&mut self, ids: &[ProductId]) {
        let mut cookie = self.base(RECENTLY_VIEWED_COOKIE, encode_recently_viewed(ids));
        cookie.set_max_age(LONG_LIVED);
        self.cookies.push(cookie);
    }

    /// Expire a cookie.
    pub fn remove(&mut self, name: &'static str) {
        let mut cookie = self.base(name, String::new());
        cookie.set_max_age(Duration::ZERO);
        self.cookies.push(cookie);
    }
}

impl IntoResponseParts for CookieUpdates {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        for cookie in self.cookies {
            match HeaderValue::from_str(&cookie.to_string()) {
                Ok(value) => {
                    res.headers_mut().append(SET_COOKIE, value);
                }
                Err(e) => {
                    tracing::warn!(error = %e, cookie = cookie.name(), "Dropping unencodable cookie");
                }
            }
        }
        Ok(res)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::response::{IntoResponse, Response};

    use super::*;

    fn key() -> Key {
        Key::from(&[7u8; 64][..])
    }

    fn set_cookie_headers(updates: CookieUpdates) -> Vec<String> {
        let response: Response = (updates, "ok").into_response();
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    /// Turn `Set-Cookie` values into a request `Cookie` header.
    fn as_request(set_cookies: &[String]) -> HeaderMap {
        let pairs: Vec<&str> = set_cookies
            .iter()
            .map(|c| c.split(';').next().unwrap())
            .collect();
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(&pairs.join("; ")).unwrap());
        headers
    }

    #[test]
    fn test_empty_request() {
        let ctx = RequestContext::from_headers(&HeaderMap::new(), &key());
        assert_eq!(ctx.customer_id, None);
        assert_eq!(ctx.cart_id, None);
        assert!(ctx.recently_viewed.is_empty());
        assert_eq!(ctx.locale, "en-US");
        assert!(ctx.require_customer().is_err());
    }

    #[test]
    fn test_signed_customer_round_trip() {
        let mut updates = CookieUpdates::new(true);
        updates.set_customer(CustomerId::new(42), &key());
        updates.set_cart(&CartId::new("c0ffee"));
        updates.set_recently_viewed(&[ProductId::new(3), ProductId::new(1)]);
        let set_cookies = set_cookie_headers(updates);

        assert_eq!(set_cookies.len(), 3);
        assert!(set_cookies.iter().all(|c| c.contains("HttpOnly")));
        assert!(set_cookies.iter().all(|c| c.contains("Secure")));
        assert!(set_cookies.iter().all(|c| c.contains("SameSite=Lax")));

        let ctx = RequestContext::from_headers(&as_request(&set_cookies), &key());
        assert_eq!(ctx.customer_id, Some(CustomerId::new(42)));
        assert_eq!(ctx.cart_id, Some(CartId::new("c0ffee")));
        assert_eq!(ctx.recently_viewed, vec![ProductId::new(3), ProductId::new(1)]);
    }

    #[test]
    fn test_forged_customer_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("customer=42"));
        let ctx = RequestContext::from_headers(&headers, &key());
        assert_eq!(ctx.customer_id, None);

        let mut updates = CookieUpdates::new(false);
        updates.set_customer(CustomerId::new(42), &Key::from(&[9u8; 64][..]));
        let headers = as_request(&set_cookie_headers(updates));
        assert_eq!(RequestContext::from_headers(&headers, &key()).customer_id, None);
    }

    #[test]
    fn test_remove_expires_cookie() {
        let mut updates = CookieUpdates::new(false);
        updates.remove(CART_COOKIE);
        let set_cookies = set_cookie_headers(updates);
        assert!(set_cookies[0].starts_with("cartId=;"));
        assert!(set_cookies[0].contains("Max-Age=0"));
    }

    #[test]
    fn test_malformed_recently_viewed_reads_empty() {
        assert!(decode_recently_viewed("not-json").is_empty());
        assert!(decode_recently_viewed("%5B%22a%22%5D").is_empty());
        assert_eq!(
            decode_recently_viewed("%5B77%2C78%5D"),
            vec![ProductId::new(77), ProductId::new(78)]
        );
    }

    #[test]
    fn test_locale_from_accept_language() {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("fr-CA;q=0.9, en;q=0.8"),
        );
        let ctx = RequestContext::from_headers(&headers, &key());
        assert_eq!(ctx.locale, "fr-CA");
    }
}
