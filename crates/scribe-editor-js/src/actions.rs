//! ToolbarAction conversion for JavaScript.

use scribe_editor_browser::ToolbarAction;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// JavaScript-friendly toolbar action.
///
/// Mirrors `ToolbarAction` from core, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum JsToolbarAction {
    Command {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    InsertLink,
    InsertImage,
    InsertTable,
    ClearFormatting,
    Reset,
    Preview,
    ExportDoc,
    ExportPdf,
    Undo,
}

impl From<JsToolbarAction> for ToolbarAction {
    fn from(action: JsToolbarAction) -> Self {
        match action {
            JsToolbarAction::Command { name, value } => ToolbarAction::Command {
                name: SmolStr::new(name),
                value,
            },
            JsToolbarAction::InsertLink => ToolbarAction::InsertLink,
            JsToolbarAction::InsertImage => ToolbarAction::InsertImage,
            JsToolbarAction::InsertTable => ToolbarAction::InsertTable,
            JsToolbarAction::ClearFormatting => ToolbarAction::ClearFormatting,
            JsToolbarAction::Reset => ToolbarAction::Reset,
            JsToolbarAction::Preview => ToolbarAction::Preview,
            JsToolbarAction::ExportDoc => ToolbarAction::ExportDoc,
            JsToolbarAction::ExportPdf => ToolbarAction::ExportPdf,
            JsToolbarAction::Undo => ToolbarAction::Undo,
        }
    }
}
