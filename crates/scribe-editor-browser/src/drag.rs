//! DOM side of image drag-to-move.

use js_sys::Reflect;
use scribe_editor_core::{CaretApi, DropHost, Point};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Node, Range};

// === caretRangeFromPoint binding ===
//
// web-sys only exposes the standard caretPositionFromPoint. WebKit and older
// Chromium have the non-standard caretRangeFromPoint instead.

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = Document)]
    type CaretRangeDocument;

    #[wasm_bindgen(method, js_name = caretRangeFromPoint)]
    fn caret_range_from_point(this: &CaretRangeDocument, x: f32, y: f32) -> Option<Range>;
}

/// [`DropHost`] over the live document. Carets are collapsed DOM ranges
/// inside the editable root.
#[derive(Debug, Clone)]
pub struct DomDropHost {
    document: Document,
    root: Element,
}

impl DomDropHost {
    pub fn new(document: Document, root: Element) -> Self {
        Self { document, root }
    }

    /// The image wrapper a drag started on. The inner `<img>` is natively
    /// draggable, so the event target is often the image, not the wrapper.
    pub fn drag_source(&self, target: &Element) -> Option<Element> {
        let wrapper = target.closest(".img-wrapper").ok().flatten()?;
        let node: &Node = &wrapper;
        self.root.contains(Some(node)).then_some(wrapper)
    }

    fn api_name(api: CaretApi) -> &'static str {
        match api {
            CaretApi::PositionFromPoint => "caretPositionFromPoint",
            CaretApi::RangeFromPoint => "caretRangeFromPoint",
        }
    }

    fn position_range(&self, point: Point) -> Option<Range> {
        let position = self
            .document
            .caret_position_from_point(point.x as f32, point.y as f32)?;
        let node = position.offset_node()?;
        let range = self.document.create_range().ok()?;
        range.set_start(&node, position.offset()).ok()?;
        range.collapse_with_to_start(true);
        Some(range)
    }

    fn try_relocate(&self, element: &Element, caret: &Range, payload: &str) -> Result<bool, JsValue> {
        caret.delete_contents()?;
        let scratch = self.document.create_element("div")?;
        scratch.set_inner_html(payload);
        let Some(node) = scratch.first_child() else {
            return Ok(false);
        };
        caret.insert_node(&node)?;
        element.remove();
        Ok(true)
    }
}

impl DropHost for DomDropHost {
    type Element = Element;
    type Caret = Range;

    fn is_image_wrapper(&self, element: &Element) -> bool {
        element.class_list().contains("img-wrapper")
    }

    fn outer_html(&self, element: &Element) -> String {
        element.outer_html()
    }

    fn supports(&self, api: CaretApi) -> bool {
        Reflect::get(&self.document, &JsValue::from_str(Self::api_name(api)))
            .map(|f| f.is_function())
            .unwrap_or(false)
    }

    fn caret_from_point(&self, api: CaretApi, point: Point) -> Option<Range> {
        let range = match api {
            CaretApi::PositionFromPoint => self.position_range(point),
            CaretApi::RangeFromPoint => self
                .document
                .unchecked_ref::<CaretRangeDocument>()
                .caret_range_from_point(point.x as f32, point.y as f32),
        }?;
        let container = range.start_container().ok()?;
        self.root.contains(Some(&container)).then_some(range)
    }

    fn caret_inside(&self, caret: &Range, element: &Element) -> bool {
        caret
            .start_container()
            .map(|node| element.contains(Some(&node)))
            .unwrap_or(false)
    }

    fn relocate(&mut self, element: &Element, caret: &Range, payload: &str) -> bool {
        match self.try_relocate(element, caret, payload) {
            Ok(moved) => moved,
            Err(e) => {
                tracing::warn!("image drop failed: {:?}", e);
                false
            }
        }
    }
}
