//! Browser DOM layer for the scribe rich-text editor.
//!
//! This crate backs the core services with the live page. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `engine`: `CommandEngine` over `document.execCommand`
//! - `modal`: preview overlay surface
//! - `export`: Blob downloads and html2pdf.js rendering
//! - `drag`: `DropHost` with caret-from-point lookup
//! - `bind`: toolbar, overlay and drag listeners
//!
//! # Re-exports
//!
//! This crate re-exports `scribe-editor-core` for convenience, so consumers
//! only need to depend on `scribe-editor-browser`.

// Re-export core crate
pub use scribe_editor_core;
pub use scribe_editor_core::*;

pub mod bind;
pub mod drag;
pub mod engine;
pub mod export;
pub mod modal;
pub mod prompt;

pub use bind::{BrowserWorkbench, MountedEditor, PageIds, mount};
pub use drag::DomDropHost;
pub use engine::BrowserEngine;
pub use export::{BlobDownload, Html2PdfRenderer};
pub use modal::DomSurface;
pub use prompt::WindowPrompt;
