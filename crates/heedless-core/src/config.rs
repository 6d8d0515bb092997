//! Storefront engine configuration.
//!
//! Centralizes the constants shared by the cache, the router and the
//! templates. Browser-specific settings live in the web crate's config.

// =============================================================================
// Catalog
// =============================================================================

/// Handle of the collection shown on the homepage.
pub const FRONTPAGE_HANDLE: &str = "frontpage";

/// Number of products requested for a collection.
pub const COLLECTION_PAGE_SIZE: u32 = 5;

// =============================================================================
// Persistent Storage
// =============================================================================

/// localStorage keys for the two cache namespaces.
pub mod storage_keys {
    /// Collections keyed by collection handle.
    pub const COLLECTIONS: &str = "collectionProducts";
    /// Products keyed by product handle.
    pub const PRODUCTS: &str = "singleProducts";
}

// =============================================================================
// Navigation
// =============================================================================

/// Query parameter that addresses a product view.
pub const PRODUCT_QUERY_PARAM: &str = "product";

/// URL of the homepage view.
pub const HOME_URL: &str = "/";

/// History title of the homepage view.
pub const HOME_TITLE: &str = "Homepage";

// =============================================================================
// DOM Contract
// =============================================================================

/// Marker attribute naming mounts and click actions.
pub const ACTION_ATTR: &str = "js-page";

/// Attribute carrying a product handle on cards and the product meta block.
pub const HANDLE_ATTR: &str = "data-handle";

/// Attribute carrying the default variant id.
pub const VARIANT_ATTR: &str = "data-id";

/// Class toggled on the product panel and overlay while a product is open.
pub const ACTIVE_CLASS: &str = "is-active";

/// Marker of the overlay shown behind the product panel.
pub const OVERLAY_MARKER: &str = "overlay";
