//! Remote catalog boundary.

use std::future::Future;

use crate::error::FetchError;
use crate::models::{CatalogHandle, CollectionEntity, ProductEntity};

/// Read-only access to the remote catalog.
///
/// Both operations are idempotent reads. A structurally absent entity is a
/// failure ([`FetchError::NotFound`]), never an empty value. Callers do not
/// retry.
pub trait CatalogFetcher {
    /// Fetch a collection with its first `page_size` products.
    fn fetch_collection(
        &self,
        handle: &CatalogHandle,
        page_size: u32,
    ) -> impl Future<Output = Result<CollectionEntity, FetchError>>;

    /// Fetch a single product.
    fn fetch_product(
        &self,
        handle: &CatalogHandle,
    ) -> impl Future<Output = Result<ProductEntity, FetchError>>;
}
