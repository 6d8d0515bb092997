//! Data models for the storefront.
//!
//! - [`CatalogHandle`] - validated cache key
//! - [`CollectionEntity`], [`ProductSummary`] - homepage data
//! - [`ProductEntity`], [`ProductImage`], [`Variant`], [`Money`] - product page data
//! - [`ViewState`] - the currently rendered view and its URL form

mod catalog;
mod view;

pub use catalog::{
    CatalogHandle, CollectionEntity, Money, ProductEntity, ProductImage, ProductSummary, Variant,
};
pub use view::ViewState;
