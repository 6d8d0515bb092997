//! Heedless: a headless Shopify storefront rendered in the browser.
//!
//! The catalog cache, view router and templates live in `heedless-core`.
//! This crate is their browser side:
//! - [`app`] - Leptos page shell and event wiring
//! - [`browser`] - `localStorage`, history and DOM adapters
//! - [`shopify`] - Storefront GraphQL client
//! - [`utils`] - fetch with timeout, DOM helpers, console logging

pub mod app;
pub mod browser;
pub mod config;
pub mod shopify;
pub mod utils;

pub use app::App;
