//! Document export: `.doc` (HTML served as a Word document) and PDF.
//!
//! The exporter composes the title, author line and editor content into one
//! HTML snapshot and hands it to a backend. Where the bytes end up is the
//! [`ArtifactSink`]'s business (a browser download, a directory), and PDF
//! conversion is delegated to a [`PdfRenderer`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::dom::escaped_text;
use crate::error::ExportError;

/// File stem used when the title is empty.
pub const DEFAULT_FILE_STEM: &str = "document";

/// Export targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Doc,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Doc => "doc",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Doc => "application/msword",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

/// `"<title>.<ext>"`, or `"document.<ext>"` for an empty title.
pub fn export_file_name(title: &str, format: ExportFormat) -> String {
    let stem = if title.is_empty() {
        DEFAULT_FILE_STEM
    } else {
        title
    };
    format!("{stem}.{}", format.extension())
}

/// Title, author and content of one export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Composition<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub content: &'a str,
}

impl<'a> Composition<'a> {
    pub fn new(title: &'a str, author: &'a str, content: &'a str) -> Self {
        Self {
            title,
            author,
            content,
        }
    }

    /// Heading, italic author line, rule, then the content as-is.
    pub fn to_html(&self) -> String {
        format!(
            "<h1>{}</h1><p><em>Author: {}</em></p><hr>{}",
            escaped_text(self.title),
            escaped_text(self.author),
            self.content
        )
    }

    /// Full HTML document for the `.doc` export.
    pub fn to_doc_html(&self) -> String {
        format!(
            "<html><head><meta charset=\"utf-8\"><title>{}</title></head><body>{}</body></html>",
            escaped_text(self.title),
            self.to_html()
        )
    }
}

/// A finished export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Delivers finished artifacts somewhere.
pub trait ArtifactSink {
    fn deliver(&mut self, artifact: Artifact) -> Result<(), ExportError>;
}

/// Converts a composition to PDF and saves it under `file_name`.
///
/// Renderers that produce bytes pass them to `sink`; renderers that save on
/// their own (the browser's html2pdf) ignore it.
pub trait PdfRenderer {
    fn render(
        &mut self,
        composition: &Composition<'_>,
        file_name: &str,
        sink: &mut dyn ArtifactSink,
    ) -> Result<(), ExportError>;
}

/// Collects artifacts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub artifacts: Vec<Artifact>,
}

impl ArtifactSink for MemorySink {
    fn deliver(&mut self, artifact: Artifact) -> Result<(), ExportError> {
        self.artifacts.push(artifact);
        Ok(())
    }
}

/// Writes artifacts into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, oldest first.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ArtifactSink for DirectorySink {
    fn deliver(&mut self, artifact: Artifact) -> Result<(), ExportError> {
        // Titles are user text; keep them from naming other directories.
        let name: String = artifact
            .file_name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        let path = self.dir.join(name);
        fs::create_dir_all(&self.dir).map_err(|source| ExportError::Io {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, &artifact.bytes).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = artifact.bytes.len(), "wrote export");
        self.written.push(path);
        Ok(())
    }
}

/// Produces `.doc` and PDF exports.
#[derive(Debug, Clone, Default)]
pub struct Exporter<S, P> {
    sink: S,
    renderer: P,
}

impl<S: ArtifactSink, P: PdfRenderer> Exporter<S, P> {
    pub fn new(sink: S, renderer: P) -> Self {
        Self { sink, renderer }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn renderer(&self) -> &P {
        &self.renderer
    }

    /// Export as `.doc`, returning the file name.
    pub fn try_export_doc(
        &mut self,
        title: &str,
        author: &str,
        content: &str,
    ) -> Result<String, ExportError> {
        let composition = Composition::new(title, author, content);
        let file_name = export_file_name(title, ExportFormat::Doc);
        self.sink.deliver(Artifact {
            file_name: file_name.clone(),
            mime: ExportFormat::Doc.mime(),
            bytes: composition.to_doc_html().into_bytes(),
        })?;
        Ok(file_name)
    }

    /// Export as PDF, returning the file name.
    pub fn try_export_pdf(
        &mut self,
        title: &str,
        author: &str,
        content: &str,
    ) -> Result<String, ExportError> {
        let composition = Composition::new(title, author, content);
        let file_name = export_file_name(title, ExportFormat::Pdf);
        self.renderer
            .render(&composition, &file_name, &mut self.sink)?;
        Ok(file_name)
    }

    /// Fire-and-forget `.doc` export. Failures are logged.
    pub fn export_doc(&mut self, title: &str, author: &str, content: &str) {
        if let Err(err) = self.try_export_doc(title, author, content) {
            tracing::warn!(error = %err, "doc export failed");
        }
    }

    /// Fire-and-forget PDF export. Failures are logged.
    pub fn export_pdf(&mut self, title: &str, author: &str, content: &str) {
        if let Err(err) = self.try_export_pdf(title, author, content) {
            tracing::warn!(error = %err, "pdf export failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Renderer that "renders" the composition HTML verbatim.
    #[derive(Default)]
    struct EchoRenderer;

    impl PdfRenderer for EchoRenderer {
        fn render(
            &mut self,
            composition: &Composition<'_>,
            file_name: &str,
            sink: &mut dyn ArtifactSink,
        ) -> Result<(), ExportError> {
            sink.deliver(Artifact {
                file_name: file_name.to_string(),
                mime: ExportFormat::Pdf.mime(),
                bytes: composition.to_html().into_bytes(),
            })
        }
    }

    struct FailingRenderer;

    impl PdfRenderer for FailingRenderer {
        fn render(
            &mut self,
            _: &Composition<'_>,
            _: &str,
            _: &mut dyn ArtifactSink,
        ) -> Result<(), ExportError> {
            Err(ExportError::Render("no fonts".into()))
        }
    }

    #[test]
    fn file_names_default_to_document() {
        assert_eq!(export_file_name("", ExportFormat::Doc), "document.doc");
        assert_eq!(export_file_name("", ExportFormat::Pdf), "document.pdf");
        assert_eq!(export_file_name("Notes", ExportFormat::Doc), "Notes.doc");
        assert_eq!(export_file_name("Notes", ExportFormat::Pdf), "Notes.pdf");
    }

    #[test]
    fn composition_escapes_metadata_only() {
        let composition = Composition::new("A & B", "<me>", "<p>body</p>");
        insta::assert_snapshot!(
            composition.to_html(),
            @"<h1>A &amp; B</h1><p><em>Author: &lt;me&gt;</em></p><hr><p>body</p>"
        );
    }

    #[test]
    fn doc_export_reaches_the_sink() {
        let mut exporter = Exporter::new(MemorySink::default(), EchoRenderer);
        let name = exporter
            .try_export_doc("", "me", "<p>x</p>")
            .expect("export");
        assert_eq!(name, "document.doc");

        let artifact = &exporter.sink().artifacts[0];
        assert_eq!(artifact.mime, "application/msword");
        let body = String::from_utf8(artifact.bytes.clone()).expect("utf8");
        assert!(body.starts_with("<html>"));
        assert!(body.contains("<p><em>Author: me</em></p><hr><p>x</p>"));
    }

    #[test]
    fn pdf_export_goes_through_renderer() {
        let mut exporter = Exporter::new(MemorySink::default(), EchoRenderer);
        exporter.export_pdf("Report", "", "");
        let artifact = &exporter.sink().artifacts[0];
        assert_eq!(artifact.file_name, "Report.pdf");
        assert_eq!(artifact.mime, "application/pdf");
    }

    #[test]
    fn failures_are_swallowed_by_fire_and_forget() {
        let mut exporter = Exporter::new(MemorySink::default(), FailingRenderer);
        exporter.export_pdf("x", "y", "z");
        assert!(exporter.sink().artifacts.is_empty());
        assert!(matches!(
            exporter.try_export_pdf("x", "y", "z"),
            Err(ExportError::Render(_))
        ));
    }

    #[test]
    fn directory_sink_writes_files() {
        let dir = std::env::temp_dir().join(format!("scribe-export-{}", std::process::id()));
        let mut sink = DirectorySink::new(&dir);
        sink.deliver(Artifact {
            file_name: "a/b.doc".into(),
            mime: ExportFormat::Doc.mime(),
            bytes: b"hi".to_vec(),
        })
        .expect("write");

        let written = sink.written()[0].clone();
        assert_eq!(written, dir.join("a_b.doc"));
        assert_eq!(fs::read(&written).expect("read"), b"hi");
        let _ = fs::remove_dir_all(&dir);
    }
}
