//! In-memory catalog cache.
//!
//! Source of truth for "do we already have this handle". Loaded once from
//! the [`PersistentCacheStore`] at startup and written through on every put.
//! Nothing is evicted.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{CacheError, StorageError};
use crate::models::{CatalogHandle, CollectionEntity, ProductEntity};
use crate::storage::{CacheNamespace, KeyValueStore, Namespace, PersistentCacheStore};

mod sealed {
    pub trait Sealed {}
    impl Sealed for crate::models::CollectionEntity {}
    impl Sealed for crate::models::ProductEntity {}
}

/// Both namespaces, as held in memory.
#[derive(Debug, Default)]
pub struct Namespaces {
    collections: CacheNamespace<CollectionEntity>,
    products: CacheNamespace<ProductEntity>,
}

/// An entity type with its own cache namespace.
pub trait CatalogEntry: sealed::Sealed + Clone + Serialize + DeserializeOwned {
    const NAMESPACE: Namespace;

    fn select(namespaces: &Namespaces) -> &CacheNamespace<Self>;
    fn select_mut(namespaces: &mut Namespaces) -> &mut CacheNamespace<Self>;
}

impl CatalogEntry for CollectionEntity {
    const NAMESPACE: Namespace = Namespace::Collections;

    fn select(namespaces: &Namespaces) -> &CacheNamespace<Self> {
        &namespaces.collections
    }

    fn select_mut(namespaces: &mut Namespaces) -> &mut CacheNamespace<Self> {
        &mut namespaces.collections
    }
}

impl CatalogEntry for ProductEntity {
    const NAMESPACE: Namespace = Namespace::Products;

    fn select(namespaces: &Namespaces) -> &CacheNamespace<Self> {
        &namespaces.products
    }

    fn select_mut(namespaces: &mut Namespaces) -> &mut CacheNamespace<Self> {
        &mut namespaces.products
    }
}

/// Write-through cache over both namespaces.
pub struct CatalogCache<S> {
    store: PersistentCacheStore<S>,
    namespaces: Namespaces,
}

impl<S: KeyValueStore> CatalogCache<S> {
    /// Build the cache from whatever the store holds.
    pub fn load(backend: S) -> Self {
        let store = PersistentCacheStore::new(backend);
        let namespaces = Namespaces {
            collections: store.load(Namespace::Collections),
            products: store.load(Namespace::Products),
        };
        Self { store, namespaces }
    }

    pub fn has<T: CatalogEntry>(&self, handle: &CatalogHandle) -> bool {
        T::select(&self.namespaces).contains(handle)
    }

    /// Fetch a cached entity. Calling this on a miss is a caller bug and
    /// reported as [`CacheError::Miss`].
    pub fn get<T: CatalogEntry>(&self, handle: &CatalogHandle) -> Result<T, CacheError> {
        T::select(&self.namespaces)
            .get(handle)
            .cloned()
            .ok_or_else(|| CacheError::Miss {
                namespace: T::NAMESPACE,
                handle: handle.to_string(),
            })
    }

    /// Insert or replace an entity, then persist its whole namespace.
    ///
    /// The in-memory entry is kept even when persisting fails.
    pub fn put<T: CatalogEntry>(&mut self, handle: CatalogHandle, entity: T) -> Result<(), CacheError> {
        let namespace = T::select_mut(&mut self.namespaces);
        namespace.insert(handle, entity);
        self.persist::<T>().map_err(CacheError::from)
    }

    /// Number of entries held for `T`.
    pub fn len<T: CatalogEntry>(&self) -> usize {
        T::select(&self.namespaces).len()
    }

    fn persist<T: CatalogEntry>(&self) -> Result<(), StorageError> {
        self.store.save(T::NAMESPACE, T::select(&self.namespaces))
    }
}
