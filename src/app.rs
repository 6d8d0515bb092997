//! Root application module.
//!
//! The page shell renders the header and the three `js-page` mounts once;
//! everything inside the mounts is written by the router. The shell owns the
//! [`EventBus`]: the delegated click listener and `popstate` publish on it,
//! and the router is its only subscriber.

use std::rc::Rc;

use heedless_core::{CatalogCache, EventBus, NavigationError, PageEvent, RenderError, ViewRouter};
use leptos::prelude::*;
use tracing::{debug, error, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, MouseEvent};

use crate::browser::{DocumentSurface, LocalStore, WindowHistory};
use crate::config::STORE_NAME;
use crate::shopify::StorefrontClient;
use crate::utils::dom;

/// The router wired to the browser.
pub type StoreRouter = ViewRouter<StorefrontClient, LocalStore, WindowHistory, DocumentSurface>;

fn build_router() -> StoreRouter {
    ViewRouter::new(
        StorefrontClient::from_config(),
        CatalogCache::load(LocalStore),
        WindowHistory,
        DocumentSurface,
    )
}

/// A mount is missing: the shell and the templates disagree.
fn abort(e: &RenderError) -> ! {
    error!(error = %e, "page shell is broken");
    wasm_bindgen::throw_str(&e.to_string())
}

/// Hand every bus event to the router on its own task.
fn connect(bus: &EventBus, router: Rc<StoreRouter>) {
    bus.subscribe(move |event| {
        let router = Rc::clone(&router);
        let event = event.clone();
        spawn_local(async move {
            match router.dispatch(event).await {
                Ok(outcome) => debug!(?outcome, "page event handled"),
                Err(e) => abort(&e),
            }
        });
    });
}

/// Publish back/forward navigation on the bus.
fn listen_pop_state(bus: Rc<EventBus>) {
    let closure = Closure::wrap(Box::new(move || {
        bus.emit(&PageEvent::HistoryPopped);
    }) as Box<dyn Fn()>);

    if let Some(window) = dom::window() {
        let _ = window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
    }

    // Lives as long as the page
    closure.forget();
}

/// Render the view addressed by the page URL once the shell is mounted.
fn start(router: Rc<StoreRouter>) {
    spawn_local(async move {
        match router.start().await {
            Ok(outcome) => info!(?outcome, "storefront ready"),
            Err(NavigationError::Render(e)) => abort(&e),
            Err(e) => warn!(error = %e, "initial view not rendered"),
        }
    });
}

/// Page shell.
///
/// One delegated click listener on the root classifies `js-page` clicks.
/// Links that navigate (`viewProduct`, `closeProduct`) are handled in page,
/// so their default action is cancelled.
#[component]
pub fn App() -> impl IntoView {
    let bus = Rc::new(EventBus::new());
    let router = Rc::new(build_router());
    connect(&bus, Rc::clone(&router));
    listen_pop_state(Rc::clone(&bus));
    start(router);

    let bus = StoredValue::new_local(bus);
    let on_click = move |ev: MouseEvent| {
        let Some(target) = ev.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let click = dom::read_click(&target);
        let event = bus.with_value(|bus| bus.dispatch_click(&click));
        if matches!(
            event,
            Some(PageEvent::ViewProduct(_) | PageEvent::CloseProduct)
        ) {
            ev.prevent_default();
        }
    };

    view! {
        <div class="storefront" on:click=on_click>
            <header class="site-header">
                <a class="site-header__logo" href="/" js-page="closeProduct">
                    {STORE_NAME}
                </a>
            </header>
            <main class="product-grid" js-page="homepage"></main>
            <aside class="product-page" js-page="productPage"></aside>
            <div class="overlay" js-page="overlay"></div>
        </div>
    }
}
