//! Query-string addressed views.
//!
//! The URL is the only shareable state: `/` is the homepage and
//! `?product=<handle>` is a product view on the same path.

use tracing::debug;
use url::form_urlencoded;

use super::CatalogHandle;
use crate::config::{HOME_URL, PRODUCT_QUERY_PARAM};

/// The single view currently rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ViewState {
    /// Homepage: the frontpage collection as product cards.
    #[default]
    Home,
    /// Product panel open over the homepage.
    Product(CatalogHandle),
}

impl ViewState {
    /// Derive the view addressed by a URL.
    ///
    /// Accepts absolute URLs, paths and bare query strings. Anything without a
    /// valid `product` parameter is the homepage.
    pub fn from_url(url: &str) -> Self {
        let without_fragment = url.split('#').next().unwrap_or_default();
        let Some((_, query)) = without_fragment.split_once('?') else {
            return Self::Home;
        };

        let Some(raw) = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == PRODUCT_QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
        else {
            return Self::Home;
        };

        match CatalogHandle::parse(raw) {
            Ok(handle) => Self::Product(handle),
            Err(e) => {
                debug!(error = %e, "ignoring product parameter");
                Self::Home
            }
        }
    }

    /// URL to push into history for this view.
    pub fn to_url(&self) -> String {
        match self {
            Self::Home => HOME_URL.to_string(),
            Self::Product(handle) => format!("?{}={}", PRODUCT_QUERY_PARAM, handle),
        }
    }

    #[inline]
    pub fn is_product(&self) -> bool {
        matches!(self, Self::Product(_))
    }

    /// Handle of the open product, if any.
    pub fn product_handle(&self) -> Option<&CatalogHandle> {
        match self {
            Self::Product(handle) => Some(handle),
            Self::Home => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(handle: &str) -> ViewState {
        ViewState::Product(CatalogHandle::parse(handle).unwrap())
    }

    #[test]
    fn test_home_urls() {
        assert_eq!(ViewState::from_url("/"), ViewState::Home);
        assert_eq!(ViewState::from_url(""), ViewState::Home);
        assert_eq!(ViewState::from_url("https://shop.example/"), ViewState::Home);
        assert_eq!(ViewState::from_url("/?ref=newsletter"), ViewState::Home);
        assert_eq!(ViewState::from_url("/?product="), ViewState::Home);
    }

    #[test]
    fn test_product_urls() {
        assert_eq!(ViewState::from_url("?product=hat-01"), product("hat-01"));
        assert_eq!(ViewState::from_url("/?product=hat-01"), product("hat-01"));
        assert_eq!(
            ViewState::from_url("https://shop.example/?utm=x&product=blue-shirt#top"),
            product("blue-shirt")
        );
    }

    #[test]
    fn test_invalid_product_handle_is_home() {
        assert_eq!(
            ViewState::from_url("/?product=%3Cscript%3E"),
            ViewState::Home
        );
        assert_eq!(ViewState::from_url("/?product=a+b"), ViewState::Home);
    }

    #[test]
    fn test_url_round_trip() {
        assert_eq!(ViewState::Home.to_url(), "/");
        let view = product("blue-shirt");
        assert_eq!(view.to_url(), "?product=blue-shirt");
        assert_eq!(ViewState::from_url(&view.to_url()), view);
    }

    #[test]
    fn test_accessors() {
        assert!(!ViewState::Home.is_product());
        assert_eq!(ViewState::Home.product_handle(), None);
        let view = product("hat-01");
        assert!(view.is_product());
        assert_eq!(view.product_handle().map(|h| h.as_str()), Some("hat-01"));
    }
}
