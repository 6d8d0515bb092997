//! In-memory implementations of the browser boundaries, plus catalog fixtures.
//!
//! Available to unit tests and, through the `mock` feature, to integration
//! tests and downstream crates.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use tokio::sync::oneshot;

use crate::error::{FetchError, RenderError, StorageError};
use crate::fetcher::CatalogFetcher;
use crate::history::{BrowserHistory, HistoryEntry};
use crate::models::{
    CatalogHandle, CollectionEntity, Money, ProductEntity, ProductImage, ProductSummary, Variant,
};
use crate::render::{Mount, RenderSurface};
use crate::storage::KeyValueStore;

// ============================================================================
// MemoryStore
// ============================================================================

/// Shared in-memory key/value store. Clones see the same entries, so a test
/// can keep a handle while the cache owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing serialization.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Make every subsequent write fail, as a full quota would.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.raw(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::WriteFailed {
                key: key.to_string(),
            });
        }
        self.insert_raw(key, value);
        Ok(())
    }
}

// ============================================================================
// MockFetcher
// ============================================================================

/// A request the fetcher received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchCall {
    Collection { handle: String, page_size: u32 },
    Product { handle: String },
}

/// Catalog served from memory.
///
/// Unknown handles answer `FetchError::NotFound`. A fetch can be held open
/// with [`MockFetcher::hold`] to interleave navigations.
#[derive(Default)]
pub struct MockFetcher {
    collections: RefCell<HashMap<String, CollectionEntity>>,
    products: RefCell<HashMap<String, ProductEntity>>,
    failures: RefCell<HashMap<String, FetchError>>,
    gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
    calls: RefCell<Vec<FetchCall>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(self, collection: CollectionEntity) -> Self {
        self.add_collection(collection);
        self
    }

    pub fn with_product(self, product: ProductEntity) -> Self {
        self.add_product(product);
        self
    }

    pub fn add_collection(&self, collection: CollectionEntity) {
        self.collections
            .borrow_mut()
            .insert(collection.handle.to_string(), collection);
    }

    pub fn add_product(&self, product: ProductEntity) {
        self.products
            .borrow_mut()
            .insert(product.handle.to_string(), product);
    }

    /// Answer every request for `handle` with `error`.
    pub fn fail(&self, handle: &str, error: FetchError) {
        self.failures.borrow_mut().insert(handle.to_string(), error);
    }

    pub fn clear_failure(&self, handle: &str) {
        self.failures.borrow_mut().remove(handle);
    }

    /// Hold the next request for `handle` open until the sender fires or is
    /// dropped. The answer is decided when the request is made.
    pub fn hold(&self, handle: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(handle.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.borrow().clone()
    }

    pub fn product_fetches(&self, handle: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, FetchCall::Product { handle: h } if h == handle))
            .count()
    }

    pub fn collection_fetches(&self, handle: &str) -> usize {
        self.collection_page_sizes(handle).len()
    }

    /// Page sizes requested for `handle`, in call order.
    pub fn collection_page_sizes(&self, handle: &str) -> Vec<u32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                FetchCall::Collection { handle: h, page_size } if h == handle => Some(*page_size),
                _ => None,
            })
            .collect()
    }

    fn answer<T: Clone>(
        &self,
        kind: &'static str,
        handle: &CatalogHandle,
        entities: &RefCell<HashMap<String, T>>,
    ) -> Result<T, FetchError> {
        if let Some(error) = self.failures.borrow().get(handle.as_str()) {
            return Err(error.clone());
        }
        entities
            .borrow()
            .get(handle.as_str())
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                kind,
                handle: handle.to_string(),
            })
    }

    fn gated<T>(
        &self,
        handle: &CatalogHandle,
        result: Result<T, FetchError>,
    ) -> impl Future<Output = Result<T, FetchError>> + use<T> {
        let gate = self.gates.borrow_mut().remove(handle.as_str());
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            result
        }
    }
}

impl CatalogFetcher for MockFetcher {
    fn fetch_collection(
        &self,
        handle: &CatalogHandle,
        page_size: u32,
    ) -> impl Future<Output = Result<CollectionEntity, FetchError>> {
        self.calls.borrow_mut().push(FetchCall::Collection {
            handle: handle.to_string(),
            page_size,
        });
        let result = self.answer("collection", handle, &self.collections);
        self.gated(handle, result)
    }

    fn fetch_product(
        &self,
        handle: &CatalogHandle,
    ) -> impl Future<Output = Result<ProductEntity, FetchError>> {
        self.calls.borrow_mut().push(FetchCall::Product {
            handle: handle.to_string(),
        });
        let result = self.answer("product", handle, &self.products);
        self.gated(handle, result)
    }
}

// ============================================================================
// RecordingHistory
// ============================================================================

/// Session history with a cursor, like the browser's.
#[derive(Debug)]
pub struct RecordingHistory {
    entries: RefCell<Vec<HistoryEntry>>,
    cursor: Cell<usize>,
    pushes: Cell<usize>,
    title: RefCell<String>,
}

impl RecordingHistory {
    /// History holding one untitled entry at `url`.
    pub fn new(url: &str) -> Self {
        Self {
            entries: RefCell::new(vec![HistoryEntry::new("", url)]),
            cursor: Cell::new(0),
            pushes: Cell::new(0),
            title: RefCell::new(String::new()),
        }
    }

    /// Step back one entry, as the back button does before `popstate`.
    pub fn back(&self) -> bool {
        let cursor = self.cursor.get();
        if cursor == 0 {
            return false;
        }
        self.cursor.set(cursor - 1);
        true
    }

    pub fn forward(&self) -> bool {
        let cursor = self.cursor.get();
        if cursor + 1 >= self.entries.borrow().len() {
            return false;
        }
        self.cursor.set(cursor + 1);
        true
    }

    /// The entry under the cursor.
    pub fn current(&self) -> HistoryEntry {
        self.entries.borrow()[self.cursor.get()].clone()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn push_count(&self) -> usize {
        self.pushes.get()
    }

    /// Title of the document, as last written by push, replace or retitle.
    pub fn document_title(&self) -> String {
        self.title.borrow().clone()
    }
}

impl BrowserHistory for RecordingHistory {
    fn current_url(&self) -> String {
        self.current().url
    }

    fn push(&self, entry: &HistoryEntry) {
        let mut entries = self.entries.borrow_mut();
        entries.truncate(self.cursor.get() + 1);
        entries.push(entry.clone());
        self.cursor.set(entries.len() - 1);
        self.pushes.set(self.pushes.get() + 1);
        self.retitle(&entry.title);
    }

    fn replace(&self, entry: &HistoryEntry) {
        self.entries.borrow_mut()[self.cursor.get()] = entry.clone();
        self.retitle(&entry.title);
    }

    fn retitle(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }
}

// ============================================================================
// RecordingSurface
// ============================================================================

/// Render surface that keeps the last markup per mount.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    markup: RefCell<HashMap<Mount, String>>,
    active: Cell<bool>,
    renders: Cell<usize>,
    toggles: Cell<usize>,
    missing: Cell<Option<Mount>>,
}

impl RecordingSurface {
    /// Make `mount` absent from the page shell.
    pub fn remove_mount(&self, mount: Mount) {
        self.missing.set(Some(mount));
    }

    pub fn homepage_html(&self) -> Option<String> {
        self.markup.borrow().get(&Mount::Homepage).cloned()
    }

    pub fn product_html(&self) -> Option<String> {
        self.markup.borrow().get(&Mount::ProductPage).cloned()
    }

    pub fn is_product_active(&self) -> bool {
        self.active.get()
    }

    /// Number of successful `mount` calls.
    pub fn render_count(&self) -> usize {
        self.renders.get()
    }

    /// Number of successful active-class toggles.
    pub fn toggle_count(&self) -> usize {
        self.toggles.get()
    }

    fn check(&self, mount: Mount) -> Result<(), RenderError> {
        if self.missing.get() == Some(mount) {
            return Err(RenderError::MissingMount(mount.marker()));
        }
        Ok(())
    }
}

impl RenderSurface for RecordingSurface {
    fn mount(&self, mount: Mount, markup: &str) -> Result<(), RenderError> {
        self.check(mount)?;
        self.markup.borrow_mut().insert(mount, markup.to_string());
        self.renders.set(self.renders.get() + 1);
        Ok(())
    }

    fn set_product_active(&self, active: bool) -> Result<(), RenderError> {
        self.check(Mount::ProductPage)?;
        self.active.set(active);
        self.toggles.set(self.toggles.get() + 1);
        Ok(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn fixture_handle(raw: &str) -> CatalogHandle {
    CatalogHandle::parse(raw).expect("fixture handle must be a valid slug")
}

fn fixture_image(handle: &str) -> ProductImage {
    ProductImage {
        alt_text: None,
        small: format!("https://cdn.example.com/{handle}_300x.jpg"),
        medium: format!("https://cdn.example.com/{handle}_600x.jpg"),
        large: format!("https://cdn.example.com/{handle}_900x.jpg"),
    }
}

fn fixture_variant_id(handle: &str) -> String {
    format!("gid://shopify/ProductVariant/{handle}")
}

/// A product with one image and one available variant at £10.00.
pub fn product(handle: &str, title: &str) -> ProductEntity {
    ProductEntity {
        handle: fixture_handle(handle),
        title: title.to_string(),
        description_html: "<p>Made to last.</p>".to_string(),
        images: vec![fixture_image(handle)],
        variants: vec![Variant {
            id: fixture_variant_id(handle),
            title: "Default Title".to_string(),
            price: Money::new("10.00", "GBP"),
            available_for_sale: true,
        }],
    }
}

/// A collection of `(handle, title)` products, in order.
pub fn collection(handle: &str, products: &[(&str, &str)]) -> CollectionEntity {
    CollectionEntity {
        handle: fixture_handle(handle),
        title: handle.to_string(),
        products: products
            .iter()
            .map(|(handle, title)| ProductSummary {
                handle: fixture_handle(handle),
                title: title.to_string(),
                image: Some(fixture_image(handle)),
                default_variant_id: Some(fixture_variant_id(handle)),
                price: Some(Money::new("10.00", "GBP")),
            })
            .collect(),
    }
}
