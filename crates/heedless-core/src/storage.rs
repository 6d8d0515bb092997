//! Persistent cache store.
//!
//! Mirrors the two cache namespaces into a durable key/value string store
//! (localStorage in the browser). Every save rewrites the whole namespace
//! entry; callers merge into the in-memory map first.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::storage_keys;
use crate::error::StorageError;
use crate::models::CatalogHandle;

/// Durable string store backing the cache.
pub trait KeyValueStore {
    /// Read a raw value. Absent keys and unavailable storage both yield `None`.
    fn load(&self, key: &str) -> Option<String>;

    /// Overwrite a raw value.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

// ============================================================================
// Namespaces
// ============================================================================

/// The two cache namespaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    Collections,
    Products,
}

impl Namespace {
    /// Key of this namespace in the persistent store.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Collections => storage_keys::COLLECTIONS,
            Self::Products => storage_keys::PRODUCTS,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collections => write!(f, "collections"),
            Self::Products => write!(f, "products"),
        }
    }
}

/// Handle → entity map for one namespace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheNamespace<T> {
    entries: HashMap<CatalogHandle, T>,
}

impl<T> CacheNamespace<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    #[inline]
    pub fn contains(&self, handle: &CatalogHandle) -> bool {
        self.entries.contains_key(handle)
    }

    #[inline]
    pub fn get(&self, handle: &CatalogHandle) -> Option<&T> {
        self.entries.get(handle)
    }

    /// Insert or replace the entry for `handle`.
    pub fn insert(&mut self, handle: CatalogHandle, entity: T) -> Option<T> {
        self.entries.insert(handle, entity)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for CacheNamespace<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// PersistentCacheStore
// ============================================================================

/// JSON (de)serialization of whole namespaces over a [`KeyValueStore`].
pub struct PersistentCacheStore<S> {
    backend: S,
}

impl<S: KeyValueStore> PersistentCacheStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Load a namespace.
    ///
    /// Returns an empty namespace when nothing is stored or when the stored
    /// value does not parse; corrupt entries are overwritten by the next save.
    pub fn load<T: DeserializeOwned>(&self, namespace: Namespace) -> CacheNamespace<T> {
        let Some(raw) = self.backend.load(namespace.storage_key()) else {
            return CacheNamespace::new();
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(%namespace, error = %e, "discarding unreadable cache namespace");
                CacheNamespace::new()
            }
        }
    }

    /// Serialize and overwrite a whole namespace.
    pub fn save<T: Serialize>(
        &self,
        namespace: Namespace,
        entries: &CacheNamespace<T>,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(entries)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.backend.save(namespace.storage_key(), &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MemoryStore, product};
    use crate::models::ProductEntity;

    fn handle(raw: &str) -> CatalogHandle {
        CatalogHandle::parse(raw).unwrap()
    }

    #[test]
    fn test_load_absent_is_empty() {
        let store = PersistentCacheStore::new(MemoryStore::new());
        let products: CacheNamespace<ProductEntity> = store.load(Namespace::Products);
        assert!(products.is_empty());
    }

    #[test]
    fn test_load_corrupt_is_empty() {
        let backend = MemoryStore::new();
        backend.insert_raw(storage_keys::PRODUCTS, "{not json");
        let store = PersistentCacheStore::new(backend.clone());
        let products: CacheNamespace<ProductEntity> = store.load(Namespace::Products);
        assert!(products.is_empty());

        backend.insert_raw(storage_keys::PRODUCTS, "null");
        let products: CacheNamespace<ProductEntity> = store.load(Namespace::Products);
        assert!(products.is_empty());

        // Valid JSON, wrong shape
        backend.insert_raw(storage_keys::PRODUCTS, r#"{"hat-01": 42}"#);
        let products: CacheNamespace<ProductEntity> = store.load(Namespace::Products);
        assert!(products.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let backend = MemoryStore::new();
        let store = PersistentCacheStore::new(backend.clone());

        let mut products = CacheNamespace::new();
        products.insert(handle("hat-01"), product("hat-01", "Hat"));
        products.insert(handle("blue-shirt"), product("blue-shirt", "Blue Shirt"));
        store.save(Namespace::Products, &products).unwrap();

        assert!(backend.raw(storage_keys::PRODUCTS).is_some());
        assert!(backend.raw(storage_keys::COLLECTIONS).is_none());

        let loaded: CacheNamespace<ProductEntity> = store.load(Namespace::Products);
        assert_eq!(loaded, products);
    }

    #[test]
    fn test_save_reports_backend_failure() {
        let backend = MemoryStore::new();
        backend.fail_writes(true);
        let store = PersistentCacheStore::new(backend);
        let products: CacheNamespace<ProductEntity> = CacheNamespace::new();
        assert!(matches!(
            store.save(Namespace::Products, &products),
            Err(StorageError::WriteFailed { .. })
        ));
    }

    #[test]
    fn test_namespace_keys() {
        assert_eq!(Namespace::Collections.storage_key(), "collectionProducts");
        assert_eq!(Namespace::Products.storage_key(), "singleProducts");
        assert_eq!(Namespace::Products.to_string(), "products");
    }
}
