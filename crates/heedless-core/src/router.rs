//! View router: the `Home` / `Product(handle)` state machine.
//!
//! Every navigation goes through cache-or-fetch:
//! 1. cache hit → render without suspending
//! 2. miss → one fetch per (namespace, handle); a second request for the same
//!    handle while the first is pending returns [`NavOutcome::InFlight`]
//! 3. success → cache put (persisted), then render if the handle is still
//!    the desired target
//! 4. failure → error returned, view state and history untouched
//!
//! History is pushed only when the view state actually changes, never on
//! pop-state, and the page-load entry is replaced rather than pushed.

use std::cell::{Ref, RefCell};
use std::collections::HashSet;
use std::future::Future;

use tracing::{debug, info, warn};

use crate::cache::{CatalogCache, CatalogEntry};
use crate::config::{COLLECTION_PAGE_SIZE, FRONTPAGE_HANDLE};
use crate::error::{FetchError, NavigationError, RenderError};
use crate::events::PageEvent;
use crate::fetcher::CatalogFetcher;
use crate::history::{BrowserHistory, HistoryEntry};
use crate::models::{CatalogHandle, CollectionEntity, ProductEntity, ViewState};
use crate::render::{Mount, RenderSurface, render_collection, render_product};
use crate::storage::{KeyValueStore, Namespace};

/// How a navigation ended, when it did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavOutcome {
    /// The view was rendered and is now the current state.
    Rendered(ViewState),
    /// A fetch for the same handle is pending; it will render on settle.
    InFlight,
    /// Another navigation became the target while this one was fetching.
    /// The fetched entity was cached but not rendered.
    Superseded,
    /// The event does not navigate.
    Ignored,
    /// The fetch failed and was logged; the previous view stays.
    Failed,
}

/// What a transition does to browser history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HistoryMode {
    /// Push a new entry if the view state changes.
    Push,
    /// Overwrite the current entry (page load).
    Replace,
    /// Leave the stack alone (pop-state already moved it), only retitle.
    Keep,
}

/// Router settings.
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Collection rendered on the homepage.
    pub frontpage: CatalogHandle,
    /// Products requested for that collection.
    pub page_size: u32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            frontpage: CatalogHandle::parse(FRONTPAGE_HANDLE)
                .expect("frontpage handle must be a valid slug"),
            page_size: COLLECTION_PAGE_SIZE,
        }
    }
}

type InFlightKey = (Namespace, CatalogHandle);

/// Per-handle in-flight marker, cleared when the fetch settles.
struct InFlightGuard<'a> {
    pending: &'a RefCell<HashSet<InFlightKey>>,
    key: InFlightKey,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(
        pending: &'a RefCell<HashSet<InFlightKey>>,
        namespace: Namespace,
        handle: &CatalogHandle,
    ) -> Option<Self> {
        let key = (namespace, handle.clone());
        if !pending.borrow_mut().insert(key.clone()) {
            return None;
        }
        Some(Self { pending, key })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.pending.borrow_mut().remove(&self.key);
    }
}

// ============================================================================
// ViewRouter
// ============================================================================

/// Owns the catalog cache and keeps the rendered view, the cache and browser
/// history consistent.
///
/// Single-threaded: all methods take `&self` and the router is shared through
/// `Rc` by the event handlers. No `RefCell` borrow is held across an await.
pub struct ViewRouter<F, S, H, D> {
    fetcher: F,
    history: H,
    surface: D,
    config: RouterConfig,
    cache: RefCell<CatalogCache<S>>,
    /// The view currently on screen.
    state: RefCell<ViewState>,
    /// The view the latest navigation asked for.
    target: RefCell<ViewState>,
    in_flight: RefCell<HashSet<InFlightKey>>,
}

impl<F, S, H, D> ViewRouter<F, S, H, D>
where
    F: CatalogFetcher,
    S: KeyValueStore,
    H: BrowserHistory,
    D: RenderSurface,
{
    pub fn new(fetcher: F, cache: CatalogCache<S>, history: H, surface: D) -> Self {
        Self::with_config(fetcher, cache, history, surface, RouterConfig::default())
    }

    pub fn with_config(
        fetcher: F,
        cache: CatalogCache<S>,
        history: H,
        surface: D,
        config: RouterConfig,
    ) -> Self {
        Self {
            fetcher,
            history,
            surface,
            config,
            cache: RefCell::new(cache),
            state: RefCell::new(ViewState::Home),
            target: RefCell::new(ViewState::Home),
            in_flight: RefCell::new(HashSet::new()),
        }
    }

    /// The view currently rendered.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn cache(&self) -> Ref<'_, CatalogCache<S>> {
        self.cache.borrow()
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Render the view addressed by the URL at page load.
    ///
    /// A product URL that cannot be resolved lands on the homepage, with the
    /// entry rewritten to `/`.
    pub async fn start(&self) -> Result<NavOutcome, NavigationError> {
        let intent = ViewState::from_url(&self.history.current_url());
        info!(?intent, "starting storefront");
        let handle = match intent {
            ViewState::Home => return self.go_home(HistoryMode::Replace).await,
            ViewState::Product(handle) => handle,
        };
        match self.go_product(handle.clone(), HistoryMode::Replace).await {
            Err(e @ (NavigationError::Fetch(_) | NavigationError::Cache(_))) => {
                warn!(error = %e, %handle, "product unavailable at load, showing homepage");
                self.go_home(HistoryMode::Replace).await
            }
            other => other,
        }
    }

    /// Show the homepage, closing the product panel if open.
    pub async fn navigate_home(&self) -> Result<NavOutcome, NavigationError> {
        self.go_home(HistoryMode::Push).await
    }

    /// Open the product page for `handle`.
    pub async fn navigate_to_product(
        &self,
        handle: CatalogHandle,
    ) -> Result<NavOutcome, NavigationError> {
        self.go_product(handle, HistoryMode::Push).await
    }

    /// Re-derive the view from the URL after back/forward.
    ///
    /// The state object attached to the entry is ignored; only the URL counts.
    pub async fn on_pop_state(&self) -> Result<NavOutcome, NavigationError> {
        match ViewState::from_url(&self.history.current_url()) {
            ViewState::Home => self.go_home(HistoryMode::Keep).await,
            ViewState::Product(handle) => self.go_product(handle, HistoryMode::Keep).await,
        }
    }

    /// Handle a page event.
    ///
    /// Fetch and cache failures end here: they are logged and reported as
    /// [`NavOutcome::Failed`]. Only a missing mount propagates.
    pub async fn dispatch(&self, event: PageEvent) -> Result<NavOutcome, RenderError> {
        let result = match event {
            PageEvent::ViewProduct(handle) => self.navigate_to_product(handle).await,
            PageEvent::CloseProduct => self.navigate_home().await,
            PageEvent::HistoryPopped => self.on_pop_state().await,
            PageEvent::AddToCart { variant_id } => {
                debug!(?variant_id, "cart not available, ignoring addToCart");
                Ok(NavOutcome::Ignored)
            }
        };

        match result {
            Ok(outcome) => Ok(outcome),
            Err(NavigationError::Render(e)) => Err(e),
            Err(e) => {
                warn!(error = %e, "navigation failed, keeping current view");
                Ok(NavOutcome::Failed)
            }
        }
    }

    async fn go_home(&self, mode: HistoryMode) -> Result<NavOutcome, NavigationError> {
        let view = ViewState::Home;
        self.aim(&view);

        let frontpage = self.config.frontpage.clone();
        let resolved = self
            .resolve::<CollectionEntity, _>(&frontpage, || {
                self.fetcher
                    .fetch_collection(&frontpage, self.config.page_size)
            })
            .await;
        let collection = match resolved {
            Ok(Some(collection)) => collection,
            Ok(None) => return Ok(NavOutcome::InFlight),
            Err(e) => {
                self.abandon(&view);
                return Err(e);
            }
        };

        if !self.is_target(&view) {
            return Ok(NavOutcome::Superseded);
        }

        let previous = self.state();
        if let Err(e) = self.paint_home(&collection, previous.is_product()) {
            self.abandon(&view);
            return Err(e.into());
        }

        self.record(previous != view, HistoryEntry::home(), mode);
        *self.state.borrow_mut() = view.clone();
        Ok(NavOutcome::Rendered(view))
    }

    async fn go_product(
        &self,
        handle: CatalogHandle,
        mode: HistoryMode,
    ) -> Result<NavOutcome, NavigationError> {
        let view = ViewState::Product(handle.clone());
        self.aim(&view);

        let resolved = self
            .resolve::<ProductEntity, _>(&handle, || self.fetcher.fetch_product(&handle))
            .await;
        let product = match resolved {
            Ok(Some(product)) => product,
            Ok(None) => return Ok(NavOutcome::InFlight),
            Err(e) => {
                self.abandon(&view);
                return Err(e);
            }
        };

        if !self.is_target(&view) {
            debug!(%handle, "product resolved after navigating elsewhere");
            return Ok(NavOutcome::Superseded);
        }

        if let Err(e) = self.paint_product(&product) {
            self.abandon(&view);
            return Err(e.into());
        }

        let changed = self.state() != view;
        self.record(changed, HistoryEntry::for_view(&view, &product.title), mode);
        *self.state.borrow_mut() = view.clone();
        Ok(NavOutcome::Rendered(view))
    }

    // ------------------------------------------------------------------------
    // Cache-or-fetch
    // ------------------------------------------------------------------------

    /// Resolve `handle` from the cache, or fetch and cache it.
    ///
    /// `Ok(None)` means a fetch for this handle is already in flight.
    async fn resolve<T, Fut>(
        &self,
        handle: &CatalogHandle,
        fetch: impl FnOnce() -> Fut,
    ) -> Result<Option<T>, NavigationError>
    where
        T: CatalogEntry,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        if self.cache.borrow().has::<T>(handle) {
            debug!(namespace = %T::NAMESPACE, %handle, "serving from cache");
            return Ok(Some(self.cache.borrow().get::<T>(handle)?));
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, T::NAMESPACE, handle) else {
            debug!(namespace = %T::NAMESPACE, %handle, "fetch already in flight");
            return Ok(None);
        };

        debug!(namespace = %T::NAMESPACE, %handle, "cache miss, fetching");
        let entity = fetch().await?;

        if let Err(e) = self.cache.borrow_mut().put(handle.clone(), entity.clone()) {
            warn!(error = %e, %handle, "entry cached for this session only");
        }
        Ok(Some(entity))
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn paint_home(
        &self,
        collection: &CollectionEntity,
        close_product: bool,
    ) -> Result<(), RenderError> {
        self.surface
            .mount(Mount::Homepage, &render_collection(collection))?;
        if close_product {
            self.surface.set_product_active(false)?;
        }
        Ok(())
    }

    fn paint_product(&self, product: &ProductEntity) -> Result<(), RenderError> {
        self.surface
            .mount(Mount::ProductPage, &render_product(product))?;
        self.surface.set_product_active(true)
    }

    fn record(&self, changed: bool, entry: HistoryEntry, mode: HistoryMode) {
        match mode {
            HistoryMode::Push if changed => self.history.push(&entry),
            HistoryMode::Push => {}
            HistoryMode::Replace => self.history.replace(&entry),
            HistoryMode::Keep => self.history.retitle(&entry.title),
        }
    }

    fn aim(&self, view: &ViewState) {
        *self.target.borrow_mut() = view.clone();
    }

    fn is_target(&self, view: &ViewState) -> bool {
        *self.target.borrow() == *view
    }

    /// Fall back to the current view if `view` is still the target.
    fn abandon(&self, view: &ViewState) {
        if self.is_target(view) {
            let current = self.state();
            *self.target.borrow_mut() = current;
        }
    }
}
