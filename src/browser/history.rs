use heedless_core::{BrowserHistory, HistoryEntry};
use serde::Serialize;
use tracing::warn;
use wasm_bindgen::JsValue;

use crate::utils::dom;

/// State object attached to every entry the storefront writes.
///
/// Navigation never reads it back; pop-state re-derives the view from the URL.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryState<'a> {
    page_title: &'a str,
}

/// `window.history` and `window.location`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowHistory;

impl WindowHistory {
    fn write(&self, entry: &HistoryEntry, replace: bool) {
        let Some(history) = dom::window().and_then(|w| w.history().ok()) else {
            warn!("history API not available");
            return;
        };

        let state = serde_wasm_bindgen::to_value(&EntryState {
            page_title: &entry.title,
        })
        .unwrap_or(JsValue::NULL);

        let result = if replace {
            history.replace_state_with_url(&state, &entry.title, Some(entry.url.as_str()))
        } else {
            history.push_state_with_url(&state, &entry.title, Some(entry.url.as_str()))
        };

        match result {
            Ok(()) => dom::set_title(&entry.title),
            Err(e) => warn!(url = %entry.url, error = ?e, "history entry not written"),
        }
    }
}

impl BrowserHistory for WindowHistory {
    fn current_url(&self) -> String {
        dom::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default()
    }

    fn push(&self, entry: &HistoryEntry) {
        self.write(entry, false);
    }

    fn replace(&self, entry: &HistoryEntry) {
        self.write(entry, true);
    }

    fn retitle(&self, title: &str) {
        dom::set_title(title);
    }
}
