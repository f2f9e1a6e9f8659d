//! Types exposed to JavaScript via wasm-bindgen.

use scribe_editor_browser::PageIds;
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// Element ids of the editor page. Omitted fields use the defaults
/// (`editor`, `modalBackdrop`, `previewArea`, `closePreview`, `docTitle`,
/// `docAuthor`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsPageIds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl From<JsPageIds> for PageIds {
    fn from(js: JsPageIds) -> Self {
        let defaults = PageIds::default();
        Self {
            editor: js.editor.unwrap_or(defaults.editor),
            overlay: js.overlay.unwrap_or(defaults.overlay),
            overlay_content: js.overlay_content.unwrap_or(defaults.overlay_content),
            close: js.close.unwrap_or(defaults.close),
            title: js.title.unwrap_or(defaults.title),
            author: js.author.unwrap_or(defaults.author),
        }
    }
}

/// Document metadata used by preview and export.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsDocumentMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
}
