//! JsScribe - the mounted editor exposed to JavaScript.

use scribe_editor_browser::{BrowserWorkbench, MountedEditor, PageIds, ToolbarAction};
use wasm_bindgen::prelude::*;

use crate::actions::JsToolbarAction;
use crate::types::{JsDocumentMeta, JsPageIds};

/// A mounted editor page.
///
/// Dropping the handle detaches every listener; call `forget()` to keep
/// them for the lifetime of the page instead.
#[wasm_bindgen]
pub struct JsScribe {
    mounted: Option<MountedEditor>,
}

#[wasm_bindgen]
impl JsScribe {
    /// Attach the editor to the page. `ids` may be omitted to use the
    /// default element ids.
    #[wasm_bindgen(constructor)]
    pub fn new(ids: Option<JsPageIds>) -> Result<JsScribe, JsValue> {
        let ids: PageIds = ids.unwrap_or_default().into();
        let mounted = scribe_editor_browser::mount(&ids)?;
        Ok(Self {
            mounted: Some(mounted),
        })
    }

    /// Run a named formatting command with an optional value.
    pub fn cmd(&self, command: &str, value: Option<String>) -> Result<(), JsError> {
        self.with_bench(|bench| bench.editor.cmd(command, value.as_deref()))
    }

    #[wasm_bindgen(js_name = insertLink)]
    pub fn insert_link(&self, url: &str) -> Result<(), JsError> {
        self.with_bench(|bench| bench.editor.insert_link(url))
    }

    #[wasm_bindgen(js_name = insertImage)]
    pub fn insert_image(&self, url: &str) -> Result<(), JsError> {
        self.with_bench(|bench| bench.editor.insert_image(url))
    }

    #[wasm_bindgen(js_name = insertTable)]
    pub fn insert_table(&self, rows: usize, cols: usize) -> Result<(), JsError> {
        self.with_bench(|bench| bench.editor.insert_table(rows, cols))
    }

    /// Strip inline formatting and links from the selection.
    pub fn clear(&self) -> Result<(), JsError> {
        self.with_bench(|bench| bench.editor.clear())
    }

    /// Empty the document.
    pub fn reset(&self) -> Result<(), JsError> {
        self.with_bench(|bench| bench.editor.reset())
    }

    /// Current editor HTML.
    pub fn html(&self) -> Result<String, JsError> {
        self.with_bench(|bench| bench.editor.html())
    }

    /// Show the composed document in the preview overlay.
    pub fn preview(&self, meta: JsDocumentMeta) -> Result<(), JsError> {
        self.with_bench(|bench| {
            let html = bench.composition_html(&to_meta(&meta));
            bench.modal.show(&html);
        })
    }

    #[wasm_bindgen(js_name = hidePreview)]
    pub fn hide_preview(&self) -> Result<(), JsError> {
        self.with_bench(|bench| bench.modal.hide())
    }

    #[wasm_bindgen(js_name = exportDoc)]
    pub fn export_doc(&self, meta: JsDocumentMeta) -> Result<String, JsError> {
        self.with_bench(|bench| {
            let content = bench.editor.html();
            bench
                .exporter
                .try_export_doc(&meta.title, &meta.author, &content)
        })?
        .map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(js_name = exportPdf)]
    pub fn export_pdf(&self, meta: JsDocumentMeta) -> Result<String, JsError> {
        self.with_bench(|bench| {
            let content = bench.editor.html();
            bench
                .exporter
                .try_export_pdf(&meta.title, &meta.author, &content)
        })?
        .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Run a toolbar action as if its control was clicked. Metadata is
    /// read from the title and author inputs.
    pub fn dispatch(&self, action: JsToolbarAction) -> Result<(), JsError> {
        let action: ToolbarAction = action.into();
        self.mounted()?.dispatch(&action);
        Ok(())
    }

    #[wasm_bindgen(js_name = isDragging)]
    pub fn is_dragging(&self) -> Result<bool, JsError> {
        Ok(self.mounted()?.is_dragging())
    }

    /// Keep the listeners attached after this handle is dropped.
    /// The handle is unusable afterwards.
    pub fn forget(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            mounted.forget();
        }
    }
}

impl JsScribe {
    fn mounted(&self) -> Result<&MountedEditor, JsError> {
        self.mounted
            .as_ref()
            .ok_or_else(|| JsError::new("editor handle was released"))
    }

    fn with_bench<T>(&self, f: impl FnOnce(&mut BrowserWorkbench) -> T) -> Result<T, JsError> {
        let workbench = self.mounted()?.workbench();
        let mut bench = workbench
            .try_borrow_mut()
            .map_err(|_| JsError::new("editor is busy"))?;
        Ok(f(&mut bench))
    }
}

fn to_meta(meta: &JsDocumentMeta) -> scribe_editor_browser::DocumentMeta {
    scribe_editor_browser::DocumentMeta::new(meta.title.clone(), meta.author.clone())
}

/// Mount with the default element ids and keep the listeners for the
/// lifetime of the page.
#[wasm_bindgen(js_name = mountScribe)]
pub fn mount_scribe() -> Result<(), JsValue> {
    let mounted = scribe_editor_browser::mount(&PageIds::default())?;
    mounted.forget();
    Ok(())
}
