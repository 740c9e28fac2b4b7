//! Cove Core - Shared types library.
//!
//! This crate provides the domain types used by the storefront and its tests:
//! - type-safe entity ids for the commerce platform's numeric `entityId`s
//! - [`Money`], an amount that always travels with its currency code
//! - [`Email`], a validated email address
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps it
//! lightweight and allows it to be used anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
