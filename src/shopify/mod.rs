//! Shopify Storefront API client.
//!
//! Implements [`heedless_core::CatalogFetcher`] over the Storefront GraphQL
//! API:
//! - [`queries`] - query documents and their variables
//! - [`conversions`] - edges/nodes wire types into catalog entities
//! - [`StorefrontClient`] - request execution

pub mod conversions;
pub mod queries;

mod client;

pub use client::StorefrontClient;
