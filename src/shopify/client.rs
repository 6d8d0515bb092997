use heedless_core::{CatalogFetcher, CatalogHandle, CollectionEntity, FetchError, ProductEntity};
use serde::Serialize;
use tracing::debug;

use super::conversions::{collection_from_response, product_from_response};
use super::queries::{
    CollectionVariables, GraphqlRequest, ProductVariables, collection_query, product_query,
};
use crate::config::{STOREFRONT_TOKEN, TOKEN_HEADER, graphql_endpoint};
use crate::utils::post_json;

/// Storefront API client for one shop.
#[derive(Clone, Debug)]
pub struct StorefrontClient {
    endpoint: String,
    token: String,
}

impl StorefrontClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    /// Client for the shop configured at build time.
    pub fn from_config() -> Self {
        Self::new(graphql_endpoint(), STOREFRONT_TOKEN)
    }

    /// POST a query and return the raw response body.
    async fn execute<V: Serialize>(&self, query: &str, variables: V) -> Result<String, FetchError> {
        let body = serde_json::to_string(&GraphqlRequest { query, variables })
            .map_err(|_| FetchError::RequestCreationFailed)?;
        post_json(&self.endpoint, &[(TOKEN_HEADER, self.token.as_str())], &body).await
    }
}

impl CatalogFetcher for StorefrontClient {
    async fn fetch_collection(
        &self,
        handle: &CatalogHandle,
        page_size: u32,
    ) -> Result<CollectionEntity, FetchError> {
        debug!(%handle, page_size, "fetching collection");
        let variables = CollectionVariables {
            handle: handle.as_str(),
            first: page_size,
        };
        let body = self.execute(&collection_query(), variables).await?;
        collection_from_response(&body, handle)
    }

    async fn fetch_product(&self, handle: &CatalogHandle) -> Result<ProductEntity, FetchError> {
        debug!(%handle, "fetching product");
        let variables = ProductVariables {
            handle: handle.as_str(),
        };
        let body = self.execute(&product_query(), variables).await?;
        product_from_response(&body, handle)
    }
}
