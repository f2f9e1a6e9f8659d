//! WASM browser tests for scribe-editor-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use scribe_editor_browser::{
    BrowserEngine, CaretApi, ClickTarget, CommandEngine, DomDropHost, DomSurface, DropHost,
    Editor, Modal, PageIds, Point, image_wrapper_html, mount, resolve_caret,
};
use web_sys::{Element, Event, EventInit, HtmlDocument, HtmlElement};

fn document() -> HtmlDocument {
    gloo_utils::document().unchecked_into()
}

/// A fresh contenteditable root attached to the body.
fn editable(html: &str) -> HtmlElement {
    let doc = document();
    let root: HtmlElement = doc
        .create_element("div")
        .expect("create div")
        .unchecked_into();
    root.set_attribute("contenteditable", "true")
        .expect("set contenteditable");
    root.set_inner_html(html);
    doc.body().expect("body").append_child(&root).expect("attach");
    root
}

// === Engine ===

#[wasm_bindgen_test]
fn engine_reads_and_replaces_content() {
    let root = editable("<p>hello</p>");
    let mut engine = BrowserEngine::new(document(), root.clone());
    assert_eq!(engine.html(), "<p>hello</p>");

    engine.set_html("");
    assert_eq!(root.inner_html(), "");
}

#[wasm_bindgen_test]
fn editor_reset_empties_the_root() {
    let root = editable("<p>gone</p>");
    let mut editor = Editor::new(BrowserEngine::new(document(), root.clone()));
    editor.reset();
    assert_eq!(editor.html(), "");
    root.remove();
}

#[wasm_bindgen_test]
fn unknown_commands_do_not_apply() {
    let root = editable("<p>x</p>");
    let mut engine = BrowserEngine::new(document(), root.clone());
    assert!(!engine.execute("definitelyNotACommand", None));
    assert_eq!(engine.html(), "<p>x</p>");
    root.remove();
}

// === Modal ===

fn surface() -> (HtmlElement, Element, DomSurface) {
    let doc = document();
    let overlay: HtmlElement = doc
        .create_element("div")
        .expect("overlay")
        .unchecked_into();
    let content = doc.create_element("div").expect("content");
    overlay.append_child(&content).expect("nest");
    (overlay.clone(), content.clone(), DomSurface::new(overlay, content))
}

#[wasm_bindgen_test]
fn modal_toggles_display_and_keeps_content() {
    let (overlay, content, surface) = surface();
    let mut modal = Modal::new(surface);

    modal.show("<h1>Preview</h1>");
    assert_eq!(
        overlay.style().get_property_value("display").expect("style"),
        "grid"
    );
    assert_eq!(content.inner_html(), "<h1>Preview</h1>");

    modal.hide();
    assert_eq!(
        overlay.style().get_property_value("display").expect("style"),
        "none"
    );
    assert_eq!(content.inner_html(), "<h1>Preview</h1>");
    assert_eq!(modal.last_shown(), Some("<h1>Preview</h1>"));
}

#[wasm_bindgen_test]
fn only_the_overlay_itself_is_backdrop() {
    let (overlay, content, surface) = surface();
    let inner = document().create_element("span").expect("span");
    content.append_child(&inner).expect("nest");

    assert_eq!(
        surface.click_target(Some(overlay.unchecked_ref())),
        ClickTarget::Backdrop
    );
    assert_eq!(
        surface.click_target(Some(content.unchecked_ref())),
        ClickTarget::Content
    );
    assert_eq!(
        surface.click_target(Some(inner.unchecked_ref())),
        ClickTarget::Content
    );
    assert_eq!(surface.click_target(None), ClickTarget::Content);
}

// === Drag ===

#[wasm_bindgen_test]
fn relocate_moves_exactly_one_wrapper() {
    let root = editable(&format!(
        "<p>before</p>{}<p>after</p>",
        image_wrapper_html("cat.png")
    ));
    let doc = document();
    let wrapper = root
        .query_selector(".img-wrapper")
        .expect("query")
        .expect("wrapper");
    let mut host = DomDropHost::new(doc.clone().into(), root.clone().into());
    assert!(host.is_image_wrapper(&wrapper));

    // Caret at the very end of the root.
    let caret = doc.create_range().expect("range");
    caret
        .set_start(&root, root.child_nodes().length())
        .expect("set start");
    caret.collapse_with_to_start(true);
    assert!(!host.caret_inside(&caret, &wrapper));

    let payload = host.outer_html(&wrapper);
    assert!(host.relocate(&wrapper, &caret, &payload));

    let html = root.inner_html();
    assert_eq!(html.matches("img-wrapper").count(), 1);
    assert!(html.starts_with("<p>before</p><p>after</p>"));
    root.remove();
}

#[wasm_bindgen_test]
fn paragraphs_are_not_draggable_images() {
    let root = editable("<p>text</p>");
    let host = DomDropHost::new(document().into(), root.clone().into());
    let paragraph = root.first_element_child().expect("paragraph");
    assert!(!host.is_image_wrapper(&paragraph));
    // Every current engine has at least one of the two lookups.
    assert!(host.supports(CaretApi::PositionFromPoint) || host.supports(CaretApi::RangeFromPoint));
    root.remove();
}

#[wasm_bindgen_test]
fn drag_source_resolves_the_wrapper_from_its_image() {
    let root = editable(&image_wrapper_html("cat.png"));
    let host = DomDropHost::new(document().into(), root.clone().into());
    let wrapper = root.first_element_child().expect("wrapper");
    let img = wrapper.first_element_child().expect("img");

    assert_eq!(host.drag_source(&img), Some(wrapper.clone()));
    assert_eq!(host.drag_source(&wrapper), Some(wrapper));

    // Wrappers outside the editable root are not ours to move.
    let stray = editable(&image_wrapper_html("dog.png"));
    let stray_img = stray.query_selector("img").expect("query").expect("img");
    assert_eq!(host.drag_source(&stray_img), None);
    root.remove();
    stray.remove();
}

// === Caret lookup ===

fn center_left(element: &Element) -> Point {
    let rect = element.get_bounding_client_rect();
    Point::new(rect.left() + 2.0, rect.top() + rect.height() / 2.0)
}

#[wasm_bindgen_test]
fn caret_from_point_lands_inside_the_root() {
    let root = editable("<p>some text to aim at</p>");
    let outside = editable("<p>not editable territory</p>");
    outside.remove_attribute("contenteditable").expect("plain div");
    let host = DomDropHost::new(document().into(), root.clone().into());

    let inside_point = center_left(&root.first_element_child().expect("paragraph"));
    let outside_point = center_left(&outside.first_element_child().expect("paragraph"));

    let mut checked = 0;
    for api in [CaretApi::PositionFromPoint, CaretApi::RangeFromPoint] {
        if !host.supports(api) {
            continue;
        }
        checked += 1;
        let caret = host
            .caret_from_point(api, inside_point)
            .expect("caret inside the root");
        let container = caret.start_container().expect("container");
        assert!(root.contains(Some(&container)), "{api:?} caret escaped the root");

        assert!(
            host.caret_from_point(api, outside_point).is_none(),
            "{api:?} caret outside the root was accepted"
        );
    }
    assert!(checked > 0);
    assert!(resolve_caret(&host, inside_point).is_some());

    root.remove();
    outside.remove();
}

// === Mounted page ===

const PAGE: &str = r#"
    <button id="fixtureBold" data-cmd="bold">B</button>
    <input id="docTitle" value="Notes">
    <input id="docAuthor" value="Ann">
    <div id="editor" contenteditable="true"><p>make me bold</p></div>
    <div id="modalBackdrop" style="display: none">
        <div id="previewArea"></div>
        <button id="closePreview">close</button>
    </div>
"#;

fn page() -> HtmlElement {
    let doc = document();
    let container: HtmlElement = doc
        .create_element("div")
        .expect("container")
        .unchecked_into();
    container.set_inner_html(PAGE);
    doc.body()
        .expect("body")
        .append_child(&container)
        .expect("attach");
    container
}

fn by_id(id: &str) -> HtmlElement {
    document()
        .get_element_by_id(id)
        .expect(id)
        .unchecked_into()
}

fn display(element: &HtmlElement) -> String {
    element
        .style()
        .get_property_value("display")
        .expect("style")
}

#[wasm_bindgen_test]
fn data_cmd_buttons_run_their_command() {
    let container = page();
    let mounted = mount(&PageIds::default()).expect("mount");
    assert!(mounted.listener_count() > 0);

    let root = by_id("editor");
    let paragraph = root.first_element_child().expect("paragraph");
    root.focus().expect("focus");
    let selection = gloo_utils::window()
        .get_selection()
        .expect("selection api")
        .expect("selection");
    selection
        .select_all_children(&paragraph)
        .expect("select paragraph");

    by_id("fixtureBold").click();
    assert!(
        root.inner_html().contains("<b>make me bold</b>"),
        "got {}",
        root.inner_html()
    );

    drop(mounted);
    container.remove();
}

#[wasm_bindgen_test]
fn overlay_clicks_hide_only_from_the_backdrop() {
    let container = page();
    let mounted = mount(&PageIds::default()).expect("mount");
    let overlay = by_id("modalBackdrop");

    mounted.workbench().borrow_mut().modal.show("<p>preview</p>");
    assert_eq!(display(&overlay), "grid");

    by_id("previewArea").click();
    assert_eq!(display(&overlay), "grid");

    overlay.click();
    assert_eq!(display(&overlay), "none");

    mounted.workbench().borrow_mut().modal.show("<p>again</p>");
    by_id("closePreview").click();
    assert_eq!(display(&overlay), "none");
    assert_eq!(by_id("previewArea").inner_html(), "<p>again</p>");

    drop(mounted);
    container.remove();
}

#[wasm_bindgen_test]
fn dragging_the_inner_image_drags_the_wrapper() {
    let container = page();
    let mounted = mount(&PageIds::default()).expect("mount");
    let root = by_id("editor");
    root.set_inner_html(&image_wrapper_html("cat.png"));
    let img = root.query_selector("img").expect("query").expect("img");

    let init = EventInit::new();
    init.set_bubbles(true);
    let dragstart = Event::new_with_event_init_dict("dragstart", &init).expect("event");
    img.dispatch_event(&dragstart).expect("dispatch");
    assert!(mounted.is_dragging());

    let dragend = Event::new_with_event_init_dict("dragend", &init).expect("event");
    img.dispatch_event(&dragend).expect("dispatch");
    assert!(!mounted.is_dragging());

    drop(mounted);
    container.remove();
}
