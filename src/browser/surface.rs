use heedless_core::config::{ACTIVE_CLASS, OVERLAY_MARKER};
use heedless_core::{Mount, RenderError, RenderSurface};
use web_sys::Element;

use crate::utils::dom;

/// Writes into the `js-page` mounts rendered by the page shell.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentSurface;

fn require(marker: &'static str) -> Result<Element, RenderError> {
    dom::find_marked(marker).ok_or(RenderError::MissingMount(marker))
}

impl RenderSurface for DocumentSurface {
    fn mount(&self, mount: Mount, markup: &str) -> Result<(), RenderError> {
        require(mount.marker())?.set_inner_html(markup);
        Ok(())
    }

    fn set_product_active(&self, active: bool) -> Result<(), RenderError> {
        let panel = require(Mount::ProductPage.marker())?;
        let overlay = require(OVERLAY_MARKER)?;
        for element in [panel, overlay] {
            let _ = element.class_list().toggle_with_force(ACTIVE_CLASS, active);
        }
        Ok(())
    }
}
