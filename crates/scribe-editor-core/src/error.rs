use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Failures while producing or delivering an export artifact.
#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("failed to write {}", path.display())]
    #[diagnostic(code(export::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("pdf rendering failed: {0}")]
    #[diagnostic(code(export::render))]
    Render(String),

    #[error("could not deliver {file_name}: {reason}")]
    #[diagnostic(code(export::delivery))]
    Delivery { file_name: String, reason: String },
}
