//! Preview overlay in the page.

use scribe_editor_core::{ClickTarget, Display, PreviewSurface};
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget, HtmlElement};

/// The overlay element plus the box inside it that holds the preview.
#[derive(Debug, Clone)]
pub struct DomSurface {
    overlay: HtmlElement,
    content: Element,
}

impl DomSurface {
    pub fn new(overlay: HtmlElement, content: Element) -> Self {
        Self { overlay, content }
    }

    pub fn overlay(&self) -> &HtmlElement {
        &self.overlay
    }

    pub fn content(&self) -> &Element {
        &self.content
    }

    /// Classify a click on the overlay. Only a click on the overlay element
    /// itself counts as the backdrop.
    pub fn click_target(&self, target: Option<&EventTarget>) -> ClickTarget {
        let is_overlay = target
            .and_then(|t| t.dyn_ref::<Element>())
            .is_some_and(|el| el == self.overlay.unchecked_ref::<Element>());
        if is_overlay {
            ClickTarget::Backdrop
        } else {
            ClickTarget::Content
        }
    }
}

impl PreviewSurface for DomSurface {
    fn set_content(&mut self, html: &str) {
        self.content.set_inner_html(html);
    }

    fn set_display(&mut self, display: Display) {
        if let Err(e) = self.overlay.style().set_property("display", display.as_css()) {
            tracing::warn!("failed to toggle preview overlay: {:?}", e);
        }
    }
}
