//! Browser history boundary.

use crate::config::HOME_TITLE;
use crate::models::ViewState;

/// A history entry: the document title and the URL for a view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub title: String,
    pub url: String,
}

impl HistoryEntry {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Entry for the homepage.
    pub fn home() -> Self {
        Self::new(HOME_TITLE, ViewState::Home.to_url())
    }

    /// Entry for `view`, titled `title`.
    pub fn for_view(view: &ViewState, title: impl Into<String>) -> Self {
        Self::new(title, view.to_url())
    }
}

/// Address bar and session history.
pub trait BrowserHistory {
    /// The full current URL.
    fn current_url(&self) -> String;

    /// Add an entry on top of the stack.
    fn push(&self, entry: &HistoryEntry);

    /// Overwrite the current entry.
    fn replace(&self, entry: &HistoryEntry);

    /// Set the document title without touching the stack.
    fn retitle(&self, title: &str);
}
