//! Storefront configuration.
//!
//! Browser-side settings. Catalog, storage and DOM constants shared with the
//! engine live in `heedless_core::config`. The shop domain and access token
//! can be overridden at build time through environment variables.

use tracing::Level;

// =============================================================================
// Application Metadata
// =============================================================================

/// Store name shown in the page header.
pub const STORE_NAME: &str = "Heedless";

/// Id of the element the page shell is mounted into.
pub const APP_ROOT_ID: &str = "app";

// =============================================================================
// Shopify Storefront API
// =============================================================================

/// `*.myshopify.com` domain of the shop.
pub const SHOP_DOMAIN: &str = match option_env!("HEEDLESS_SHOP_DOMAIN") {
    Some(domain) => domain,
    None => "heedless-demo.myshopify.com",
};

/// Public Storefront API access token (safe to ship to the browser).
pub const STOREFRONT_TOKEN: &str = match option_env!("HEEDLESS_STOREFRONT_TOKEN") {
    Some(token) => token,
    None => "",
};

/// Storefront API version.
pub const API_VERSION: &str = "2024-01";

/// Header carrying the public access token.
pub const TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// GraphQL endpoint of the shop.
pub fn graphql_endpoint() -> String {
    format!("https://{SHOP_DOMAIN}/api/{API_VERSION}/graphql.json")
}

// =============================================================================
// Network Configuration
// =============================================================================

/// Fetch request timeout in milliseconds.
pub const FETCH_TIMEOUT_MS: i32 = 10000;

// =============================================================================
// Logging
// =============================================================================

/// Most verbose level forwarded to the browser console.
pub const LOG_LEVEL: Level = if cfg!(debug_assertions) {
    Level::DEBUG
} else {
    Level::INFO
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_endpoint() {
        let endpoint = graphql_endpoint();
        assert!(endpoint.starts_with("https://"));
        assert!(endpoint.ends_with("/api/2024-01/graphql.json"));
        assert!(endpoint.contains(SHOP_DOMAIN));
    }
}
