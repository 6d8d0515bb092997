//! Storefront API response types and their conversion into catalog entities.
//!
//! The API wraps lists in `edges { node }` connections; entities flatten
//! them. An absent entity (`"collection": null`) is `FetchError::NotFound`,
//! GraphQL `errors` are `FetchError::Graphql`.

use graphql_client::Response;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use heedless_core::{
    CatalogHandle, CollectionEntity, FetchError, Money, ProductEntity, ProductImage,
    ProductSummary, Variant,
};

// =============================================================================
// Envelope
// =============================================================================

#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

impl<T> Connection<T> {
    fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|edge| edge.node)
    }
}

/// Decode the envelope, surfacing GraphQL errors before looking at data.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    let response: Response<T> =
        serde_json::from_str(body).map_err(|e| FetchError::InvalidResponse(e.to_string()))?;

    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
        return Err(FetchError::Graphql(messages.join("; ")));
    }

    response
        .data
        .ok_or_else(|| FetchError::InvalidResponse("response has no data".to_string()))
}

// =============================================================================
// Shared Nodes
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoneyNode {
    amount: String,
    currency_code: String,
}

impl From<MoneyNode> for Money {
    fn from(node: MoneyNode) -> Self {
        Money::new(node.amount, node.currency_code)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageNode {
    alt_text: Option<String>,
    small: String,
    medium: String,
    large: String,
}

impl From<ImageNode> for ProductImage {
    fn from(node: ImageNode) -> Self {
        ProductImage {
            alt_text: node.alt_text.filter(|alt| !alt.is_empty()),
            small: node.small,
            medium: node.medium,
            large: node.large,
        }
    }
}

// =============================================================================
// Collections
// =============================================================================

#[derive(Debug, Deserialize)]
struct CollectionData {
    collection: Option<CollectionNode>,
}

#[derive(Debug, Deserialize)]
struct CollectionNode {
    handle: CatalogHandle,
    title: String,
    products: Connection<SummaryNode>,
}

#[derive(Debug, Deserialize)]
struct SummaryNode {
    handle: CatalogHandle,
    title: String,
    images: Connection<ImageNode>,
    variants: Connection<PricedVariantNode>,
}

#[derive(Debug, Deserialize)]
struct PricedVariantNode {
    id: String,
    price: MoneyNode,
}

impl From<SummaryNode> for ProductSummary {
    fn from(node: SummaryNode) -> Self {
        let variant = node.variants.into_nodes().next();
        ProductSummary {
            handle: node.handle,
            title: node.title,
            image: node.images.into_nodes().next().map(ProductImage::from),
            default_variant_id: variant.as_ref().map(|v| v.id.clone()),
            price: variant.map(|v| v.price.into()),
        }
    }
}

impl From<CollectionNode> for CollectionEntity {
    fn from(node: CollectionNode) -> Self {
        CollectionEntity {
            handle: node.handle,
            title: node.title,
            products: node.products.into_nodes().map(ProductSummary::from).collect(),
        }
    }
}

/// Decode a `CollectionProducts` response for `handle`.
pub fn collection_from_response(
    body: &str,
    handle: &CatalogHandle,
) -> Result<CollectionEntity, FetchError> {
    let data: CollectionData = decode(body)?;
    data.collection
        .map(CollectionEntity::from)
        .ok_or_else(|| FetchError::NotFound {
            kind: "collection",
            handle: handle.to_string(),
        })
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Deserialize)]
struct ProductData {
    product: Option<ProductNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductNode {
    handle: CatalogHandle,
    title: String,
    description_html: String,
    images: Connection<ImageNode>,
    variants: Connection<VariantNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantNode {
    id: String,
    title: String,
    available_for_sale: bool,
    price: MoneyNode,
}

impl From<VariantNode> for Variant {
    fn from(node: VariantNode) -> Self {
        Variant {
            id: node.id,
            title: node.title,
            price: node.price.into(),
            available_for_sale: node.available_for_sale,
        }
    }
}

impl From<ProductNode> for ProductEntity {
    fn from(node: ProductNode) -> Self {
        ProductEntity {
            handle: node.handle,
            title: node.title,
            description_html: node.description_html,
            images: node.images.into_nodes().map(ProductImage::from).collect(),
            variants: node.variants.into_nodes().map(Variant::from).collect(),
        }
    }
}

/// Decode a `SingleProduct` response for `handle`.
pub fn product_from_response(
    body: &str,
    handle: &CatalogHandle,
) -> Result<ProductEntity, FetchError> {
    let data: ProductData = decode(body)?;
    data.product
        .map(ProductEntity::from)
        .ok_or_else(|| FetchError::NotFound {
            kind: "product",
            handle: handle.to_string(),
        })
}
