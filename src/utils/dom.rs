//! DOM and Web API utility functions.
//!
//! Provides safe, consistent access to browser APIs with proper error handling.

use heedless_core::PageClick;
use heedless_core::config::{ACTION_ATTR, HANDLE_ATTR, VARIANT_ATTR};
use web_sys::{Document, Element, Storage, Window};

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get the current document.
#[inline]
pub fn document() -> Option<Document> {
    window()?.document()
}

/// Get localStorage.
///
/// `None` when storage is disabled or throws (private browsing, sandboxed
/// frames).
#[inline]
pub fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

/// Find the element tagged `js-page="<marker>"`.
pub fn find_marked(marker: &str) -> Option<Element> {
    document()?
        .query_selector(&format!(r#"[{ACTION_ATTR}="{marker}"]"#))
        .ok()
        .flatten()
}

/// Nearest inclusive ancestor of `element` carrying `attr`.
fn closest_with(element: &Element, attr: &str) -> Option<Element> {
    element.closest(&format!("[{attr}]")).ok().flatten()
}

/// Read the action marker and product data around a clicked element.
///
/// The marker comes from the nearest `js-page` ancestor; handle and variant
/// id come together from the nearest ancestor carrying `data-handle`.
pub fn read_click(target: &Element) -> PageClick {
    let marker = closest_with(target, ACTION_ATTR).and_then(|e| e.get_attribute(ACTION_ATTR));
    let carrier = closest_with(target, HANDLE_ATTR);

    PageClick {
        marker,
        handle: carrier.as_ref().and_then(|e| e.get_attribute(HANDLE_ATTR)),
        variant_id: carrier.and_then(|e| e.get_attribute(VARIANT_ATTR)),
    }
}

/// Set the document title.
pub fn set_title(title: &str) {
    if let Some(document) = document() {
        document.set_title(title);
    }
}
