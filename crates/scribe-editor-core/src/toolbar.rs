//! Toolbar actions and the services they drive.

use smol_str::SmolStr;

use crate::command::CommandEngine;
use crate::editor::{Editor, parse_dimension};
use crate::export::{ArtifactSink, Composition, Exporter, PdfRenderer};
use crate::modal::{Modal, PreviewSurface};

pub const LINK_PROMPT: &str = "Enter URL:";
pub const IMAGE_PROMPT: &str = "Image URL:";
pub const ROWS_PROMPT: &str = "Rows?";
pub const COLS_PROMPT: &str = "Cols?";

/// Blocking text prompt. `None` means the user cancelled.
pub trait Prompt {
    fn prompt(&mut self, message: &str) -> Option<String>;
}

/// Something the user asked the toolbar to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    /// A `data-cmd` button.
    Command {
        name: SmolStr,
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

impl ToolbarAction {
    pub fn command(name: &str) -> Self {
        Self::Command {
            name: SmolStr::new(name),
            value: None,
        }
    }

    /// Action for a toolbar control id on the editor page.
    pub fn from_control_id(id: &str) -> Option<Self> {
        Some(match id {
            "linkBtn" => Self::InsertLink,
            "imgUrlBtn" => Self::InsertImage,
            "tableBtn" => Self::InsertTable,
            "clearFmt" => Self::ClearFormatting,
            "resetDoc" => Self::Reset,
            "previewBtn" => Self::Preview,
            "exportDoc" => Self::ExportDoc,
            "exportPDF" => Self::ExportPdf,
            "undoing" => Self::Undo,
            _ => return None,
        })
    }

    /// Every control id [`from_control_id`](Self::from_control_id) knows.
    pub const CONTROL_IDS: &'static [&'static str] = &[
        "linkBtn",
        "imgUrlBtn",
        "tableBtn",
        "clearFmt",
        "resetDoc",
        "previewBtn",
        "exportDoc",
        "exportPDF",
        "undoing",
    ];
}

/// Title and author typed next to the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMeta {
    pub title: String,
    pub author: String,
}

impl DocumentMeta {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }
}

/// The editor, preview modal and exporter of one page.
pub struct Workbench<E, S, X, P> {
    pub editor: Editor<E>,
    pub modal: Modal<S>,
    pub exporter: Exporter<X, P>,
}

impl<E, S, X, P> Workbench<E, S, X, P>
where
    E: CommandEngine,
    S: PreviewSurface,
    X: ArtifactSink,
    P: PdfRenderer,
{
    pub fn new(editor: Editor<E>, modal: Modal<S>, exporter: Exporter<X, P>) -> Self {
        Self {
            editor,
            modal,
            exporter,
        }
    }

    /// The preview/export composition of the current content.
    pub fn composition_html(&self, meta: &DocumentMeta) -> String {
        let content = self.editor.html();
        Composition::new(&meta.title, &meta.author, &content).to_html()
    }

    /// Carry out a toolbar action.
    pub fn dispatch(&mut self, action: &ToolbarAction, prompt: &mut dyn Prompt, meta: &DocumentMeta) {
        tracing::debug!(?action, "toolbar action");
        match action {
            ToolbarAction::Command { name, value } => self.editor.cmd(name, value.as_deref()),
            ToolbarAction::InsertLink => {
                if let Some(url) = prompt_value(prompt, LINK_PROMPT) {
                    self.editor.insert_link(&url);
                }
            }
            ToolbarAction::InsertImage => {
                if let Some(url) = prompt_value(prompt, IMAGE_PROMPT) {
                    self.editor.insert_image(&url);
                }
            }
            ToolbarAction::InsertTable => {
                let rows = parse_dimension(prompt.prompt(ROWS_PROMPT).as_deref());
                let cols = parse_dimension(prompt.prompt(COLS_PROMPT).as_deref());
                self.editor.insert_table(rows, cols);
            }
            ToolbarAction::ClearFormatting => self.editor.clear(),
            ToolbarAction::Reset => self.editor.reset(),
            ToolbarAction::Preview => {
                let html = self.composition_html(meta);
                self.modal.show(&html);
            }
            ToolbarAction::ExportDoc => {
                let content = self.editor.html();
                self.exporter
                    .export_doc(&meta.title, &meta.author, &content);
            }
            ToolbarAction::ExportPdf => {
                let content = self.editor.html();
                self.exporter
                    .export_pdf(&meta.title, &meta.author, &content);
            }
            ToolbarAction::Undo => self.editor.cmd("undo", None),
        }
    }
}

/// Prompt for a URL. Cancelled or blank input gives `None`.
fn prompt_value(prompt: &mut dyn Prompt, message: &str) -> Option<String> {
    let answer = prompt.prompt(message)?;
    let answer = answer.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}
