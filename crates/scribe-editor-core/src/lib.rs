//! scribe-editor-core: platform-free logic for the scribe rich-text editor.
//!
//! This crate provides:
//! - `CommandEngine` trait for the rich-text editing capability
//! - `ModelEngine` - native engine over `RichDocument` with undo history
//! - `Editor`, `Modal`, `Exporter` - the services behind the toolbar
//! - `DragReposition` - drag-to-move for embedded images
//! - `Workbench` + `ToolbarAction` - toolbar dispatch

pub mod command;
pub mod config;
pub mod document;
pub mod dom;
pub mod drag;
pub mod editor;
pub mod engine;
pub mod error;
pub mod export;
pub mod history;
pub mod modal;
pub mod pdf;
pub mod selection;
pub mod toolbar;

pub use command::{Command, CommandEngine};
pub use config::{PdfConfig, ScribeConfig};
pub use document::RichDocument;
pub use drag::{
    CaretApi, CaretResolver, DragReposition, DragState, DropHost, DropOutcome, ModelDropHost,
    Point, resolve_caret,
};
pub use editor::{Editor, image_wrapper_html, link_href, parse_dimension, table_html};
pub use engine::ModelEngine;
pub use error::ExportError;
pub use export::{
    Artifact, ArtifactSink, Composition, DirectorySink, ExportFormat, Exporter, MemorySink,
    PdfRenderer, export_file_name,
};
pub use history::{History, UndoManager};
pub use modal::{ClickTarget, Display, MemorySurface, Modal, PreviewSurface};
pub use pdf::TextPdfRenderer;
pub use selection::{Position, Selection};
pub use smol_str::SmolStr;
pub use toolbar::{DocumentMeta, Prompt, ToolbarAction, Workbench};
