//! Catalog entities as fetched from the remote API and stored in the cache.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::HandleError;

static HANDLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("handle pattern must compile")
});

// ============================================================================
// CatalogHandle
// ============================================================================

/// URL-safe slug identifying a collection or a product.
///
/// Validated on construction, so a handle can be placed in a query string or
/// a `data-handle` attribute as is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CatalogHandle(String);

impl CatalogHandle {
    /// Validate and wrap a handle.
    pub fn parse(raw: impl Into<String>) -> Result<Self, HandleError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(HandleError::Empty);
        }
        if !HANDLE_PATTERN.is_match(&raw) {
            return Err(HandleError::Invalid(raw));
        }
        Ok(Self(raw))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CatalogHandle {
    type Error = HandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CatalogHandle> for String {
    fn from(handle: CatalogHandle) -> Self {
        handle.0
    }
}

impl FromStr for CatalogHandle {
    type Err = HandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Borrow<str> for CatalogHandle {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Money & Images
// ============================================================================

/// Monetary amount with currency code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    pub fn new(amount: impl Into<String>, currency_code: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            currency_code: currency_code.into(),
        }
    }

    /// Format for display (`£12.00`, or `12.00 CHF` for currencies without a symbol).
    pub fn display(&self) -> String {
        let symbol = match self.currency_code.as_str() {
            "GBP" => Some('£'),
            "USD" => Some('$'),
            "EUR" => Some('€'),
            _ => None,
        };
        match symbol {
            Some(symbol) => format!("{}{}", symbol, self.amount),
            None => format!("{} {}", self.amount, self.currency_code),
        }
    }
}

/// Product image in the three sizes the templates use for `srcset`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// 300px wide source.
    pub small: String,
    /// 600px wide source.
    pub medium: String,
    /// 900px wide source.
    pub large: String,
}

// ============================================================================
// Collections
// ============================================================================

/// Product card data carried by a collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub handle: CatalogHandle,
    pub title: String,
    /// First product image, if any.
    pub image: Option<ProductImage>,
    /// Id of the first variant (what "Add To Cart" would add).
    pub default_variant_id: Option<String>,
    /// Price of the first variant.
    pub price: Option<Money>,
}

/// A collection and the first page of its products.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEntity {
    pub handle: CatalogHandle,
    pub title: String,
    pub products: Vec<ProductSummary>,
}

// ============================================================================
// Products
// ============================================================================

/// A purchasable variant of a product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: String,
    /// Variant title (combination of option values).
    pub title: String,
    pub price: Money,
    /// Whether the variant can currently be selected for purchase.
    pub available_for_sale: bool,
}

/// Full product data for the product page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEntity {
    pub handle: CatalogHandle,
    pub title: String,
    /// Description markup as authored in the catalog (unsanitized).
    pub description_html: String,
    pub images: Vec<ProductImage>,
    pub variants: Vec<Variant>,
}

impl ProductEntity {
    #[inline]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.first()
    }

    /// First variant, which the product page offers by default.
    #[inline]
    pub fn default_variant(&self) -> Option<&Variant> {
        self.variants.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_handles() {
        assert!(CatalogHandle::parse("frontpage").is_ok());
        assert!(CatalogHandle::parse("hat-01").is_ok());
        assert!(CatalogHandle::parse("Blue_Shirt-2").is_ok());
        assert!(CatalogHandle::parse("7").is_ok());
    }

    #[test]
    fn test_invalid_handles() {
        assert_eq!(CatalogHandle::parse(""), Err(HandleError::Empty));
        assert!(matches!(
            CatalogHandle::parse("-leading"),
            Err(HandleError::Invalid(_))
        ));
        assert!(matches!(
            CatalogHandle::parse("has space"),
            Err(HandleError::Invalid(_))
        ));
        assert!(matches!(
            CatalogHandle::parse("a\"><script>"),
            Err(HandleError::Invalid(_))
        ));
        assert!(matches!(
            CatalogHandle::parse("hat&x=1"),
            Err(HandleError::Invalid(_))
        ));
    }

    #[test]
    fn test_handle_serde_validates() {
        let handle: CatalogHandle = serde_json::from_str("\"hat-01\"").unwrap();
        assert_eq!(handle.as_str(), "hat-01");
        assert!(serde_json::from_str::<CatalogHandle>("\"bad handle\"").is_err());
        assert_eq!(serde_json::to_string(&handle).unwrap(), "\"hat-01\"");
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new("12.00", "GBP").display(), "£12.00");
        assert_eq!(Money::new("9.50", "USD").display(), "$9.50");
        assert_eq!(Money::new("3.00", "EUR").display(), "€3.00");
        assert_eq!(Money::new("40.00", "CHF").display(), "40.00 CHF");
    }

    #[test]
    fn test_product_defaults() {
        let product = ProductEntity {
            handle: CatalogHandle::parse("hat-01").unwrap(),
            title: "Hat".to_string(),
            description_html: String::new(),
            images: Vec::new(),
            variants: vec![Variant {
                id: "gid://shopify/ProductVariant/1".to_string(),
                title: "Default".to_string(),
                price: Money::new("10.00", "GBP"),
                available_for_sale: true,
            }],
        };
        assert!(product.primary_image().is_none());
        assert_eq!(
            product.default_variant().map(|v| v.id.as_str()),
            Some("gid://shopify/ProductVariant/1")
        );
    }
}
