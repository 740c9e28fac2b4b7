//! Cove Storefront library.
//!
//! Customer account pages and shopping actions for a BigCommerce store:
//! order history and detail with option reconciliation, reorder, invoices,
//! cart, wishlists, recently viewed products, reviews and login.
//!
//! The binary in `main.rs` wires configuration, tracing and Sentry around
//! [`routes::app`]; everything else lives here so it can be tested.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bigcommerce;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod normalize;
pub mod reconcile;
pub mod routes;
pub mod services;
pub mod state;
