//! Click classification and the page event bus.
//!
//! The page has one delegated click listener. The web layer reads the
//! `js-page` marker and the nearest `data-handle` / `data-id` values off the
//! clicked element into a [`PageClick`]; [`PageClick::classify`] turns that
//! into a typed [`PageEvent`], which is emitted on the [`EventBus`] owned by
//! the application root.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::models::CatalogHandle;

/// Logical actions named by `js-page` markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageAction {
    ViewProduct,
    CloseProduct,
    /// Reserved; the cart is not implemented.
    AddToCart,
}

impl PageAction {
    /// Parse a `js-page` value. Mount and card markers are not actions.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "viewProduct" => Some(Self::ViewProduct),
            "closeProduct" => Some(Self::CloseProduct),
            "addToCart" => Some(Self::AddToCart),
            _ => None,
        }
    }
}

/// What the delegated listener read off a clicked element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageClick {
    /// `js-page` value of the nearest marked ancestor.
    pub marker: Option<String>,
    /// `data-handle` of the nearest ancestor carrying one.
    pub handle: Option<String>,
    /// `data-id` of that same ancestor.
    pub variant_id: Option<String>,
}

/// Events delivered to the router.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageEvent {
    /// Open the product page for `handle`.
    ViewProduct(CatalogHandle),
    /// Close the product page and return home.
    CloseProduct,
    /// Add a variant to the cart (reserved).
    AddToCart { variant_id: Option<String> },
    /// The browser moved through history (back/forward).
    HistoryPopped,
}

impl PageClick {
    /// Turn a click into an event, or `None` when the click is not an action.
    pub fn classify(&self) -> Option<PageEvent> {
        let action = PageAction::from_marker(self.marker.as_deref()?)?;
        match action {
            PageAction::ViewProduct => {
                let Some(raw) = self.handle.as_deref() else {
                    warn!("viewProduct clicked outside an element with a handle");
                    return None;
                };
                match CatalogHandle::parse(raw) {
                    Ok(handle) => Some(PageEvent::ViewProduct(handle)),
                    Err(e) => {
                        warn!(error = %e, "viewProduct clicked with an invalid handle");
                        None
                    }
                }
            }
            PageAction::CloseProduct => Some(PageEvent::CloseProduct),
            PageAction::AddToCart => Some(PageEvent::AddToCart {
                variant_id: self.variant_id.clone(),
            }),
        }
    }
}

// ============================================================================
// EventBus
// ============================================================================

/// Identifies a subscription for [`EventBus::unsubscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&PageEvent)>;

/// Synchronous, single-threaded publish/subscribe bus.
///
/// Listeners run in subscription order. Subscribing or unsubscribing from
/// inside a listener takes effect from the next emit.
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&PageEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Deliver `event` to every listener. Returns how many received it.
    pub fn emit(&self, event: &PageEvent) -> usize {
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        debug!(?event, listeners = listeners.len(), "emitting page event");
        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    /// Classify a click and emit the resulting event, if any.
    pub fn dispatch_click(&self, click: &PageClick) -> Option<PageEvent> {
        let event = click.classify()?;
        self.emit(&event);
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(marker: &str, handle: Option<&str>) -> PageClick {
        PageClick {
            marker: Some(marker.to_string()),
            handle: handle.map(String::from),
            variant_id: handle.map(|h| format!("gid://shopify/ProductVariant/{h}")),
        }
    }

    #[test]
    fn test_action_markers() {
        assert_eq!(
            PageAction::from_marker("viewProduct"),
            Some(PageAction::ViewProduct)
        );
        assert_eq!(
            PageAction::from_marker("closeProduct"),
            Some(PageAction::CloseProduct)
        );
        assert_eq!(PageAction::from_marker("addToCart"), Some(PageAction::AddToCart));
        assert_eq!(PageAction::from_marker("homepage"), None);
        assert_eq!(PageAction::from_marker("productCard"), None);
    }

    #[test]
    fn test_classify_view_product() {
        assert_eq!(
            click("viewProduct", Some("hat-01")).classify(),
            Some(PageEvent::ViewProduct(CatalogHandle::parse("hat-01").unwrap()))
        );
        assert_eq!(click("viewProduct", None).classify(), None);
        assert_eq!(click("viewProduct", Some("not a handle")).classify(), None);
    }

    #[test]
    fn test_classify_other_actions() {
        assert_eq!(
            click("closeProduct", None).classify(),
            Some(PageEvent::CloseProduct)
        );
        assert_eq!(
            click("addToCart", Some("hat-01")).classify(),
            Some(PageEvent::AddToCart {
                variant_id: Some("gid://shopify/ProductVariant/hat-01".to_string()),
            })
        );
        assert_eq!(PageClick::default().classify(), None);
        assert_eq!(click("homepage", None).classify(), None);
    }

    #[test]
    fn test_bus_delivers_in_order() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        bus.subscribe(move |event| first.borrow_mut().push(("first", event.clone())));
        let second = Rc::clone(&seen);
        bus.subscribe(move |event| second.borrow_mut().push(("second", event.clone())));

        assert_eq!(bus.emit(&PageEvent::CloseProduct), 2);
        assert_eq!(
            *seen.borrow(),
            vec![
                ("first", PageEvent::CloseProduct),
                ("second", PageEvent::CloseProduct),
            ]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let id = bus.subscribe(move |_| counter.set(counter.get() + 1));

        bus.emit(&PageEvent::HistoryPopped);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.emit(&PageEvent::HistoryPopped), 0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_subscribe_during_emit() {
        let bus = Rc::new(EventBus::new());
        let inner = Rc::clone(&bus);
        bus.subscribe(move |_| {
            inner.subscribe(|_| {});
        });

        assert_eq!(bus.emit(&PageEvent::CloseProduct), 1);
        assert_eq!(bus.emit(&PageEvent::CloseProduct), 2);
    }

    #[test]
    fn test_dispatch_click() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        bus.subscribe(move |event| *sink.borrow_mut() = Some(event.clone()));

        assert_eq!(bus.dispatch_click(&click("homepage", None)), None);
        assert!(seen.borrow().is_none());

        let event = bus.dispatch_click(&click("viewProduct", Some("hat-01")));
        assert_eq!(event, *seen.borrow());
    }
}
