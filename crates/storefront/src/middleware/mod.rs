//! HTTP middleware and request extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with an empty `request_id` field)
//! 3. Request ID (fills the span field, tags Sentry, echoes the header)
//!
//! Customer and cart state are not middleware: handlers take a
//! [`RequestContext`] or [`RequireCustomer`] argument.

pub mod context;
pub mod request_id;

pub use context::{
    CART_COOKIE, CUSTOMER_COOKIE, CookieUpdates, RECENTLY_VIEWED_COOKIE, RequestContext,
    RequireCustomer,
};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
