//! Downloads and client-side PDF rendering.

use js_sys::{Array, Object, Reflect, Uint8Array};
use scribe_editor_core::{Artifact, ArtifactSink, Composition, ExportError, PdfRenderer};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

// === html2pdf.js binding ===
//
// html2pdf is loaded by the page as a global. Its worker API is a chain:
// html2pdf().set(options).from(element).save(), where save() returns a
// thenable.

#[wasm_bindgen]
extern "C" {
    type Html2PdfWorker;

    #[wasm_bindgen(catch, js_name = html2pdf)]
    fn html2pdf() -> Result<Html2PdfWorker, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn set(this: &Html2PdfWorker, options: &JsValue) -> Result<Html2PdfWorker, JsValue>;

    #[wasm_bindgen(method, catch, js_name = from)]
    fn from_element(
        this: &Html2PdfWorker,
        element: &web_sys::Element,
    ) -> Result<Html2PdfWorker, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn save(this: &Html2PdfWorker) -> Result<JsValue, JsValue>;
}

fn delivery_error(file_name: &str, e: JsValue) -> ExportError {
    ExportError::Delivery {
        file_name: file_name.to_string(),
        reason: format!("{e:?}"),
    }
}

/// Delivers artifacts as browser downloads (Blob + object URL + anchor click).
#[derive(Debug, Clone, Default)]
pub struct BlobDownload;

impl BlobDownload {
    fn download(artifact: &Artifact) -> Result<(), JsValue> {
        let parts = Array::new();
        parts.push(&Uint8Array::from(artifact.bytes.as_slice()));
        let options = BlobPropertyBag::new();
        options.set_type(artifact.mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

        let url = Url::create_object_url_with_blob(&blob)?;
        let anchor: HtmlAnchorElement = gloo_utils::document()
            .create_element("a")?
            .dyn_into()?;
        anchor.set_href(&url);
        anchor.set_download(&artifact.file_name);
        anchor.click();
        Url::revoke_object_url(&url)?;
        Ok(())
    }
}

impl ArtifactSink for BlobDownload {
    fn deliver(&mut self, artifact: Artifact) -> Result<(), ExportError> {
        Self::download(&artifact).map_err(|e| delivery_error(&artifact.file_name, e))?;
        tracing::debug!(file_name = %artifact.file_name, bytes = artifact.bytes.len(), "download started");
        Ok(())
    }
}

/// Renders PDFs with html2pdf.js, which saves the file itself.
///
/// The composition goes into a detached container that html2pdf lays out
/// offscreen. The returned promise is not awaited by the caller; a rejection
/// is logged.
#[derive(Debug, Clone, Default)]
pub struct Html2PdfRenderer;

impl Html2PdfRenderer {
    fn start(composition: &Composition<'_>, file_name: &str) -> Result<JsValue, JsValue> {
        let container = gloo_utils::document().create_element("div")?;
        container.set_inner_html(&composition.to_html());

        let options = Object::new();
        Reflect::set(&options, &"filename".into(), &file_name.into())?;

        html2pdf()?.set(&options)?.from_element(&container)?.save()
    }
}

impl PdfRenderer for Html2PdfRenderer {
    fn render(
        &mut self,
        composition: &Composition<'_>,
        file_name: &str,
        _sink: &mut dyn ArtifactSink,
    ) -> Result<(), ExportError> {
        let pending = Self::start(composition, file_name)
            .map_err(|e| ExportError::Render(format!("html2pdf: {e:?}")))?;

        let file_name = file_name.to_string();
        let promise = js_sys::Promise::resolve(&pending);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                tracing::warn!(file_name = %file_name, "pdf save failed: {:?}", e);
            }
        });
        Ok(())
    }
}
