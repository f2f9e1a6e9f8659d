//! Wiring the page's controls to the editor services.
//!
//! [`mount`] looks up the editor, overlay and toolbar elements, builds the
//! [`Workbench`] and attaches every listener. Listeners are `gloo-events`
//! handles owned by the returned [`MountedEditor`]; dropping it detaches them.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use scribe_editor_core::{
    DocumentMeta, DragReposition, DragState, Editor, Exporter, Modal, Point, ToolbarAction,
    Workbench,
};
use smol_str::SmolStr;
use wasm_bindgen::prelude::*;
use web_sys::{Document, DragEvent, Element, Event, HtmlDocument, HtmlElement, HtmlInputElement};

use crate::drag::DomDropHost;
use crate::engine::BrowserEngine;
use crate::export::{BlobDownload, Html2PdfRenderer};
use crate::modal::DomSurface;
use crate::prompt::WindowPrompt;

pub type BrowserWorkbench = Workbench<BrowserEngine, DomSurface, BlobDownload, Html2PdfRenderer>;

type Shared<T> = Rc<RefCell<T>>;

/// Element ids of the editor page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageIds {
    pub editor: String,
    pub overlay: String,
    pub overlay_content: String,
    pub close: String,
    pub title: String,
    pub author: String,
}

impl Default for PageIds {
    fn default() -> Self {
        Self {
            editor: "editor".into(),
            overlay: "modalBackdrop".into(),
            overlay_content: "previewArea".into(),
            close: "closePreview".into(),
            title: "docTitle".into(),
            author: "docAuthor".into(),
        }
    }
}

/// Reads title and author from their inputs at action time.
#[derive(Debug, Clone)]
struct MetaInputs {
    title: String,
    author: String,
}

impl MetaInputs {
    fn read(&self) -> DocumentMeta {
        DocumentMeta::new(input_value(&self.title), input_value(&self.author))
    }
}

fn input_value(id: &str) -> String {
    gloo_utils::document()
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{id} has an unexpected element type")))
}

/// A mounted editor page. Listeners stay attached while this is alive.
pub struct MountedEditor {
    workbench: Shared<BrowserWorkbench>,
    drag: Shared<DragReposition<Element>>,
    meta: MetaInputs,
    listeners: Vec<EventListener>,
}

impl MountedEditor {
    pub fn workbench(&self) -> Shared<BrowserWorkbench> {
        Rc::clone(&self.workbench)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.borrow().is_dragging()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Run an action as if its control was clicked.
    pub fn dispatch(&self, action: &ToolbarAction) {
        dispatch(&self.workbench, action, &self.meta.read());
    }

    /// Keep the listeners attached for the lifetime of the page.
    pub fn forget(self) {
        for listener in self.listeners {
            listener.forget();
        }
    }
}

fn dispatch(workbench: &Shared<BrowserWorkbench>, action: &ToolbarAction, meta: &DocumentMeta) {
    match workbench.try_borrow_mut() {
        Ok(mut bench) => bench.dispatch(action, &mut WindowPrompt, meta),
        Err(_) => tracing::debug!(?action, "editor busy, action dropped"),
    }
}

fn on_click(
    target: &Element,
    action: ToolbarAction,
    workbench: &Shared<BrowserWorkbench>,
    meta: &MetaInputs,
) -> EventListener {
    let workbench = Rc::clone(workbench);
    let meta = meta.clone();
    EventListener::new(target, "click", move |_| {
        dispatch(&workbench, &action, &meta.read());
    })
}

/// Attach the editor to the page.
pub fn mount(ids: &PageIds) -> Result<MountedEditor, JsValue> {
    let document = gloo_utils::document();
    let html_document: HtmlDocument = document.clone().dyn_into()?;
    let root: HtmlElement = element_by_id(&document, &ids.editor)?;
    let overlay: HtmlElement = element_by_id(&document, &ids.overlay)?;
    let content: Element = element_by_id(&document, &ids.overlay_content)?;

    let workbench = Rc::new(RefCell::new(Workbench::new(
        Editor::new(BrowserEngine::new(html_document, root.clone())),
        Modal::new(DomSurface::new(overlay.clone(), content)),
        Exporter::new(BlobDownload, Html2PdfRenderer),
    )));
    let drag = Rc::new(RefCell::new(DragReposition::new()));
    let meta = MetaInputs {
        title: ids.title.clone(),
        author: ids.author.clone(),
    };
    let mut listeners = Vec::new();

    // Formatting buttons.
    let buttons = document.query_selector_all("[data-cmd]")?;
    for i in 0..buttons.length() {
        let Some(button) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let Some(name) = button.get_attribute("data-cmd") else {
            continue;
        };
        let action = ToolbarAction::Command {
            name: SmolStr::new(&name),
            value: button.get_attribute("data-value"),
        };
        listeners.push(on_click(&button, action, &workbench, &meta));
    }

    // Named controls. Pages may leave some of them out.
    for id in ToolbarAction::CONTROL_IDS {
        let Some(control) = document.get_element_by_id(id) else {
            tracing::debug!(id, "toolbar control not on page");
            continue;
        };
        if let Some(action) = ToolbarAction::from_control_id(id) {
            listeners.push(on_click(&control, action, &workbench, &meta));
        }
    }

    // Preview overlay.
    if let Some(close) = document.get_element_by_id(&ids.close) {
        let workbench = Rc::clone(&workbench);
        listeners.push(EventListener::new(&close, "click", move |_| {
            if let Ok(mut bench) = workbench.try_borrow_mut() {
                bench.modal.on_click(scribe_editor_core::ClickTarget::CloseControl);
            }
        }));
    }
    {
        let workbench = Rc::clone(&workbench);
        listeners.push(EventListener::new(&overlay, "click", move |event: &Event| {
            if let Ok(mut bench) = workbench.try_borrow_mut() {
                let target = bench.modal.surface().click_target(event.target().as_ref());
                bench.modal.on_click(target);
            }
        }));
    }

    bind_drag(&document, &root, &drag, &mut listeners);

    tracing::info!(listeners = listeners.len(), "editor mounted");
    Ok(MountedEditor {
        workbench,
        drag,
        meta,
        listeners,
    })
}

fn bind_drag(
    document: &Document,
    root: &HtmlElement,
    drag: &Shared<DragReposition<Element>>,
    listeners: &mut Vec<EventListener>,
) {
    let host = DomDropHost::new(document.clone(), root.clone().into());

    {
        let drag = Rc::clone(drag);
        let host = host.clone();
        listeners.push(EventListener::new(root, "dragstart", move |event: &Event| {
            let Some(element) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|target| host.drag_source(&target))
            else {
                return;
            };
            let mut drag = drag.borrow_mut();
            if !drag.drag_start(&host, &element) {
                return;
            }
            let (Some(event), DragState::Dragging { payload, .. }) =
                (event.dyn_ref::<DragEvent>(), drag.state())
            else {
                return;
            };
            if let Some(data) = event.data_transfer() {
                if let Err(e) = data.set_data("text/html", payload) {
                    tracing::debug!("could not set drag payload: {:?}", e);
                }
                data.set_effect_allowed("move");
            }
        }));
    }

    {
        let drag = Rc::clone(drag);
        listeners.push(EventListener::new_with_options(
            root,
            "dragover",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                if drag.borrow().drag_over() {
                    event.prevent_default();
                }
            },
        ));
    }

    {
        let drag = Rc::clone(drag);
        let mut host = host;
        listeners.push(EventListener::new_with_options(
            root,
            "drop",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                let mut drag = drag.borrow_mut();
                if !drag.is_dragging() {
                    return;
                }
                let Some(event) = event.dyn_ref::<DragEvent>() else {
                    return;
                };
                event.prevent_default();
                let point = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
                let outcome = drag.drop(&mut host, point);
                tracing::debug!(?outcome, "image drop");
            },
        ));
    }

    {
        let drag = Rc::clone(drag);
        listeners.push(EventListener::new(root, "dragend", move |_| {
            drag.borrow_mut().drag_end();
        }));
    }
}
