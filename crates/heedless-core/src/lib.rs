//! Catalog cache and view-state engine for the Heedless storefront.
//!
//! This crate holds everything that does not touch the browser directly:
//! - [`CatalogCache`] and [`PersistentCacheStore`] - cache-or-fetch storage
//! - [`ViewRouter`] - the `Home` / `Product(handle)` state machine
//! - [`render`] - pure entity → markup templates
//! - [`EventBus`] and [`PageClick`] - click classification and dispatch
//!
//! Browser APIs are reached through the [`KeyValueStore`], [`CatalogFetcher`],
//! [`BrowserHistory`] and [`RenderSurface`] traits, implemented by the web crate.

pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod fetcher;
pub mod history;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod models;
pub mod render;
pub mod router;
pub mod storage;

pub use cache::{CatalogCache, CatalogEntry};
pub use error::{CacheError, FetchError, HandleError, NavigationError, RenderError, StorageError};
pub use events::{EventBus, ListenerId, PageAction, PageClick, PageEvent};
pub use fetcher::CatalogFetcher;
pub use history::{BrowserHistory, HistoryEntry};
pub use models::{
    CatalogHandle, CollectionEntity, Money, ProductEntity, ProductImage, ProductSummary, Variant,
    ViewState,
};
pub use render::{Mount, RenderSurface, render_collection, render_product};
pub use router::{NavOutcome, RouterConfig, ViewRouter};
pub use storage::{CacheNamespace, KeyValueStore, Namespace, PersistentCacheStore};
