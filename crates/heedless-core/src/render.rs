//! Markup templates and the render surface boundary.
//!
//! Templates are pure: entity in, markup out. Text and attribute values are
//! escaped; product descriptions come from the catalog as HTML and are
//! sanitized with ammonia instead.

use ammonia::clean_text;

use crate::config::{ACTION_ATTR, HANDLE_ATTR, VARIANT_ATTR};
use crate::error::RenderError;
use crate::models::{CollectionEntity, ProductEntity, ProductImage, ProductSummary};

/// Content mounts of the page shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mount {
    /// Product card grid.
    Homepage,
    /// Product detail panel.
    ProductPage,
}

impl Mount {
    /// Value of the `js-page` attribute tagging this mount.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::ProductPage => "productPage",
        }
    }
}

/// Where rendered markup goes.
///
/// Implementations replace mount content wholesale and never create or
/// destroy the mounts themselves.
pub trait RenderSurface {
    /// Replace the content of `mount`.
    fn mount(&self, mount: Mount, markup: &str) -> Result<(), RenderError>;

    /// Toggle the active class on the product panel and overlay together.
    fn set_product_active(&self, active: bool) -> Result<(), RenderError>;
}

// ============================================================================
// Templates
// ============================================================================

/// Product cards for every product of a collection.
pub fn render_collection(collection: &CollectionEntity) -> String {
    collection.products.iter().map(product_card).collect()
}

fn product_card(product: &ProductSummary) -> String {
    let mut html = format!(r#"<div class="product-card" {ACTION_ATTR}="productCard">"#);

    if let Some(image) = &product.image {
        html.push_str(&format!(
            r#"<div class="product-card__image">{}</div>"#,
            image_tag("product-card__img", image)
        ));
    }

    html.push_str(&format!(
        r#"<div class="product-card__footer" {HANDLE_ATTR}="{}"{}>"#,
        clean_text(product.handle.as_str()),
        variant_attr(product.default_variant_id.as_deref()),
    ));
    html.push_str(&format!("<h2>{}</h2>", clean_text(&product.title)));
    if let Some(price) = &product.price {
        html.push_str(&format!(
            r#"<strong class="product-card__price">{}</strong>"#,
            clean_text(&price.display())
        ));
    }
    html.push_str(&format!(
        r#"<button class="button" {ACTION_ATTR}="addToCart">Add To Cart</button><button class="button button--alt" {ACTION_ATTR}="viewProduct">View Product</button></div></div>"#
    ));
    html
}

/// The product detail panel.
pub fn render_product(product: &ProductEntity) -> String {
    let title = clean_text(&product.title);
    let variant = product.default_variant();

    let mut html = format!(
        r#"<div class="product-page__breadcrumbs breadcrumbs"><a class="breadcrumbs__breadcrumb breadcrumbs__breadcrumb--link" href="/" {ACTION_ATTR}="closeProduct">Home</a><span class="breadcrumbs__breadcrumb">{title}</span></div>"#
    );

    if let Some(image) = product.primary_image() {
        html.push_str(&format!(
            r#"<div class="product-page__image-container">{}</div>"#,
            image_tag("product-page__image", image)
        ));
    }

    html.push_str(&format!(
        r#"<div class="product-page__meta" {HANDLE_ATTR}="{}"{}>"#,
        clean_text(product.handle.as_str()),
        variant_attr(variant.map(|v| v.id.as_str())),
    ));
    html.push_str(&format!(r#"<h1 class="product-page__title">{title}</h1>"#));
    html.push_str(&format!(
        r#"<div class="product-page__description">{}</div>"#,
        ammonia::clean(&product.description_html)
    ));

    if let Some(variant) = variant {
        let disabled = if variant.available_for_sale { "" } else { " disabled" };
        html.push_str(&format!(
            r#"<strong class="product-page__price">{}</strong>"#,
            clean_text(&variant.price.display())
        ));
        html.push_str(&format!(
            r#"<button class="button button--large" {ACTION_ATTR}="addToCart"{disabled}>Add To Cart</button>"#
        ));
    }

    html.push_str(&format!(
        r#"<button class="button button--large button--alt" {ACTION_ATTR}="closeProduct">Close</button></div>"#
    ));
    html
}

fn image_tag(class: &str, image: &ProductImage) -> String {
    format!(
        r#"<img class="{class}" alt="{alt}" src="{small}" srcset="{small} 300w, {medium} 600w, {large} 900w" sizes="auto" loading="lazy">"#,
        alt = clean_text(image.alt_text.as_deref().unwrap_or_default()),
        small = clean_text(&image.small),
        medium = clean_text(&image.medium),
        large = clean_text(&image.large),
    )
}

fn variant_attr(variant_id: Option<&str>) -> String {
    variant_id
        .map(|id| format!(r#" {VARIANT_ATTR}="{}""#, clean_text(id)))
        .unwrap_or_default()
}
