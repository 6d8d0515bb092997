//! GraphQL documents sent to the Storefront API.

use serde::Serialize;

/// Image fields, requested in the three widths the templates use.
const IMAGE_FIELDS: &str = "altText \
    small: url(transform: { maxWidth: 300 }) \
    medium: url(transform: { maxWidth: 600 }) \
    large: url(transform: { maxWidth: 900 })";

/// A collection and its first `$first` product cards.
pub fn collection_query() -> String {
    format!(
        "query CollectionProducts($handle: String!, $first: Int!) {{ \
           collection(handle: $handle) {{ handle title \
             products(first: $first) {{ edges {{ node {{ handle title \
               images(first: 1) {{ edges {{ node {{ {IMAGE_FIELDS} }} }} }} \
               variants(first: 1) {{ edges {{ node {{ id price {{ amount currencyCode }} }} }} }} \
             }} }} }} \
           }} \
         }}"
    )
}

/// A single product with its images and variants.
pub fn product_query() -> String {
    format!(
        "query SingleProduct($handle: String!) {{ \
           product(handle: $handle) {{ handle title descriptionHtml \
             images(first: 10) {{ edges {{ node {{ {IMAGE_FIELDS} }} }} }} \
             variants(first: 50) {{ edges {{ node {{ id title availableForSale \
               price {{ amount currencyCode }} }} }} }} \
           }} \
         }}"
    )
}

/// JSON body of a GraphQL request.
#[derive(Debug, Serialize)]
pub struct GraphqlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Serialize)]
pub struct CollectionVariables<'a> {
    pub handle: &'a str,
    pub first: u32,
}

#[derive(Debug, Serialize)]
pub struct ProductVariables<'a> {
    pub handle: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braces_balance() {
        for query in [collection_query(), product_query()] {
            let opened = query.matches('{').count();
            let closed = query.matches('}').count();
            assert_eq!(opened, closed, "{query}");
        }
    }

    #[test]
    fn test_collection_request_body() {
        let query = collection_query();
        let body = serde_json::to_value(GraphqlRequest {
            query: &query,
            variables: CollectionVariables {
                handle: "frontpage",
                first: 5,
            },
        })
        .unwrap();

        assert_eq!(body["variables"]["handle"], "frontpage");
        assert_eq!(body["variables"]["first"], 5);
        assert!(body["query"].as_str().unwrap().contains("collection(handle: $handle)"));
    }

    #[test]
    fn test_product_query_fields() {
        let query = product_query();
        assert!(query.contains("descriptionHtml"));
        assert!(query.contains("availableForSale"));
        assert!(query.contains("maxWidth: 900"));
    }
}
