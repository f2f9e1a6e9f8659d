//! `CommandEngine` backed by the browser's native editing engine.

use scribe_editor_core::{CommandEngine, UndoManager};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{HtmlDocument, HtmlElement};

/// Runs commands through `document.execCommand` against a contenteditable
/// root. Selection, layout and undo all belong to the browser.
#[derive(Debug, Clone)]
pub struct BrowserEngine {
    document: HtmlDocument,
    root: HtmlElement,
}

impl BrowserEngine {
    pub fn new(document: HtmlDocument, root: HtmlElement) -> Self {
        Self { document, root }
    }

    /// Engine for the element with `id` in the current document.
    pub fn from_element_id(id: &str) -> Result<Self, JsValue> {
        let document: HtmlDocument = gloo_utils::document().dyn_into()?;
        let root = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{id}")))?
            .dyn_into::<HtmlElement>()?;
        Ok(Self::new(document, root))
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    pub fn document(&self) -> &HtmlDocument {
        &self.document
    }

    fn enabled(&self, command: &str) -> bool {
        self.document.query_command_enabled(command).unwrap_or(false)
    }
}

impl CommandEngine for BrowserEngine {
    fn execute(&mut self, command: &str, value: Option<&str>) -> bool {
        let result = match value {
            Some(value) => self
                .document
                .exec_command_with_show_ui_and_value(command, false, value),
            None => self.document.exec_command(command),
        };
        match result {
            Ok(applied) => applied,
            Err(e) => {
                tracing::debug!(command, "execCommand threw: {:?}", e);
                false
            }
        }
    }

    fn focus(&mut self) {
        if let Err(e) = self.root.focus() {
            tracing::debug!("focus failed: {:?}", e);
        }
    }

    fn html(&self) -> String {
        self.root.inner_html()
    }

    fn set_html(&mut self, html: &str) {
        self.root.set_inner_html(html);
    }
}

impl UndoManager for BrowserEngine {
    fn can_undo(&self) -> bool {
        self.enabled("undo")
    }

    fn can_redo(&self) -> bool {
        self.enabled("redo")
    }

    fn undo(&mut self) -> bool {
        self.execute("undo", None)
    }

    fn redo(&mut self) -> bool {
        self.execute("redo", None)
    }

    fn clear_history(&mut self) {
        // The native history cannot be cleared from script.
    }
}
