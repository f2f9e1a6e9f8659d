//! Native command engine over [`RichDocument`].
//!
//! This is the non-browser backing for [`CommandEngine`]. Where the browser's
//! behaviour is host-defined, the choices follow what Chromium does for a
//! contenteditable root, simplified: blocks are never merged on delete, and
//! formatting toggles wrap or unwrap whole text runs.

use std::collections::HashSet;

use smol_str::SmolStr;

use crate::command::{Command, CommandEngine};
use crate::document::RichDocument;
use crate::dom::{Element, NodeId};
use crate::history::{History, UndoManager};
use crate::selection::{PathSelection, Position, Selection};

/// Tags `removeFormat` strips.
const INLINE_FORMAT_TAGS: &[&str] = &[
    "b", "strong", "i", "em", "u", "ins", "s", "strike", "del", "sub", "sup", "font", "span",
    "mark", "small", "big", "code",
];

/// Tags `formatBlock` accepts.
const FORMAT_BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "div",
];

#[derive(Debug, Clone)]
struct Snapshot {
    html: String,
    selection: PathSelection,
}

/// A document plus command execution and undo history.
#[derive(Debug, Clone)]
pub struct ModelEngine {
    doc: RichDocument,
    history: History<Snapshot>,
    focused: bool,
}

impl Default for ModelEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelEngine {
    pub fn new() -> Self {
        Self::with_history_depth(100)
    }

    pub fn with_history_depth(max_steps: usize) -> Self {
        Self {
            doc: RichDocument::new(),
            history: History::new(max_steps),
            focused: false,
        }
    }

    pub fn from_html(html: &str) -> Self {
        let mut engine = Self::new();
        engine.doc.set_html(html);
        engine
    }

    pub fn document(&self) -> &RichDocument {
        &self.doc
    }

    /// Direct document access. Edits made here bypass undo tracking; use
    /// [`transact`](Self::transact) for undoable changes.
    pub fn document_mut(&mut self) -> &mut RichDocument {
        &mut self.doc
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            html: self.doc.html(),
            selection: self.doc.path_selection(),
        }
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        self.doc.set_html(&snapshot.html);
        self.doc.restore_path_selection(&snapshot.selection);
    }

    /// Run an edit as one undo step. The step is kept only if `edit` reports
    /// that it changed something.
    pub fn transact(&mut self, edit: impl FnOnce(&mut RichDocument) -> bool) -> bool {
        let before = self.snapshot();
        let applied = edit(&mut self.doc);
        if applied {
            self.history.record(before);
        }
        applied
    }

    /// Apply a parsed command to the current selection.
    pub fn apply(&mut self, command: &Command, value: Option<&str>) -> bool {
        if !self.doc.selection_in_root() {
            self.doc.caret_at_end();
        }
        match command {
            Command::Undo => UndoManager::undo(self),
            Command::Redo => UndoManager::redo(self),
            Command::SelectAll => {
                self.doc.select_all();
                true
            }
            Command::Unknown(_) => false,
            command => self.transact(|doc| run_edit(doc, command, value)),
        }
    }
}

impl UndoManager for ModelEngine {
    fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(&previous);
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(&next);
                true
            }
            None => false,
        }
    }

    fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl CommandEngine for ModelEngine {
    fn execute(&mut self, command: &str, value: Option<&str>) -> bool {
        let parsed = Command::parse(command);
        let applied = self.apply(&parsed, value);
        if !applied {
            tracing::debug!(command, ?value, "command not applied");
        }
        applied
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn html(&self) -> String {
        self.doc.html()
    }

    fn set_html(&mut self, html: &str) {
        self.doc.set_html(html);
        self.history.clear();
    }
}

// === Edits ===

fn run_edit(doc: &mut RichDocument, command: &Command, value: Option<&str>) -> bool {
    if let Some((tag, matches)) = command.inline_format() {
        return toggle_inline(doc, tag, matches);
    }
    if let Some(align) = command.alignment() {
        return justify(doc, align);
    }
    match command {
        Command::RemoveFormat => remove_format(doc),
        Command::CreateLink => create_link(doc, value.unwrap_or_default()),
        Command::Unlink => unlink(doc),
        Command::InsertHtml => {
            let at = doc.delete_selection();
            let after = doc.insert_html(at, value.unwrap_or_default());
            doc.set_selection(Selection::caret(after));
            true
        }
        Command::InsertText => insert_text(doc, value.unwrap_or_default()),
        Command::InsertImage => match value.filter(|v| !v.is_empty()) {
            Some(src) => insert_element(doc, Element::new("img").with_attr("src", src)),
            None => false,
        },
        Command::InsertHorizontalRule => insert_element(doc, Element::new("hr")),
        Command::InsertLineBreak => insert_element(doc, Element::new("br")),
        Command::FormatBlock => format_block(doc, value.unwrap_or_default()),
        Command::InsertOrderedList => toggle_list(doc, "ol"),
        Command::InsertUnorderedList => toggle_list(doc, "ul"),
        Command::Delete => delete_backward(doc),
        Command::ForwardDelete => delete_forward(doc),
        _ => false,
    }
}

fn is_collapsed(doc: &RichDocument) -> bool {
    let (start, end) = doc.ordered_selection();
    start == end
}

fn selected_runs(doc: &mut RichDocument) -> Vec<NodeId> {
    let (start, end) = doc.ordered_selection();
    if start == end {
        return Vec::new();
    }
    doc.text_runs(start, end)
}

fn toggle_inline(doc: &mut RichDocument, tag: &str, matches: &[&str]) -> bool {
    let runs = selected_runs(doc);
    if runs.is_empty() {
        return false;
    }
    let root = doc.root();
    let is_format = |el: &Element| matches.iter().any(|t| el.is(t));

    let all_formatted = runs
        .iter()
        .all(|&run| doc.tree().closest(run, root, is_format).is_some());

    if all_formatted {
        strip_ancestors(doc, &runs, is_format);
    } else {
        for &run in &runs {
            if doc.tree().closest(run, root, is_format).is_none() {
                doc.tree_mut().wrap(run, Element::new(tag));
            }
        }
    }
    doc.select_runs(&runs);
    true
}

/// Remove every ancestor matching `pred` from the selected runs while keeping
/// it on the unselected text it also covered.
fn strip_ancestors<P>(doc: &mut RichDocument, runs: &[NodeId], pred: P) -> bool
where
    P: Fn(&Element) -> bool,
{
    let selected: HashSet<NodeId> = runs.iter().copied().collect();
    let root = doc.root();
    let mut changed = false;

    loop {
        let tree = doc.tree();
        let Some(ancestor) = runs.iter().find_map(|&run| tree.closest(run, root, &pred)) else {
            break;
        };
        let Some(template) = tree.element(ancestor).cloned() else {
            break;
        };
        let keep: Vec<NodeId> = tree
            .text_descendants(ancestor)
            .into_iter()
            .filter(|n| !selected.contains(n))
            .collect();

        let tree = doc.tree_mut();
        tree.unwrap(ancestor);
        for node in keep {
            tree.wrap(node, template.clone());
        }
        changed = true;
    }
    changed
}

fn remove_format(doc: &mut RichDocument) -> bool {
    let runs = selected_runs(doc);
    if runs.is_empty() {
        return false;
    }
    let changed = strip_ancestors(doc, &runs, |el| {
        INLINE_FORMAT_TAGS.iter().any(|t| el.is(t))
    });
    doc.select_runs(&runs);
    changed
}

fn create_link(doc: &mut RichDocument, url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    if is_collapsed(doc) {
        // Nothing selected: insert the URL itself as the link text.
        let tree = doc.tree_mut();
        let anchor = tree.create_element(Element::new("a").with_attr("href", url));
        let text = tree.create_text(url);
        tree.append(anchor, text);
        let (at, _) = doc.ordered_selection();
        let after = doc.insert_nodes(at, &[anchor]);
        doc.set_selection(Selection::caret(after));
        return true;
    }

    let runs = selected_runs(doc);
    if runs.is_empty() {
        return false;
    }
    let root = doc.root();
    for &run in &runs {
        let existing = doc.tree().closest(run, root, |el| el.is("a"));
        match existing {
            Some(anchor) => {
                if let Some(el) = doc.tree_mut().element_mut(anchor) {
                    el.set_attr("href", url);
                }
            }
            None => {
                doc.tree_mut()
                    .wrap(run, Element::new("a").with_attr("href", url));
            }
        }
    }
    doc.select_runs(&runs);
    true
}

fn unlink(doc: &mut RichDocument) -> bool {
    let root = doc.root();
    if is_collapsed(doc) {
        let (at, _) = doc.ordered_selection();
        let Some(anchor) = doc.tree().closest(at.node, root, |el| el.is("a")) else {
            return false;
        };
        doc.tree_mut().unwrap(anchor);
        doc.caret_at_end();
        return true;
    }

    let runs = selected_runs(doc);
    let changed = strip_ancestors(doc, &runs, |el| el.is("a"));
    doc.select_runs(&runs);
    changed
}

fn insert_element(doc: &mut RichDocument, element: Element) -> bool {
    let at = doc.delete_selection();
    let node = doc.tree_mut().create_element(element);
    let after = doc.insert_nodes(at, &[node]);
    doc.set_selection(Selection::caret(after));
    true
}

fn insert_text(doc: &mut RichDocument, text: &str) -> bool {
    let at = doc.delete_selection();
    if text.is_empty() {
        return true;
    }
    let added = text.chars().count();

    // Typing inside a text node extends it.
    if let Some(existing) = doc.tree_mut().text_mut(at.node) {
        let byte = existing
            .char_indices()
            .nth(at.offset)
            .map(|(b, _)| b)
            .unwrap_or(existing.len());
        existing.insert_str(byte, text);
        doc.set_selection(Selection::caret(Position::new(at.node, at.offset + added)));
        return true;
    }

    // Right after a text node: append to it.
    let previous = at
        .offset
        .checked_sub(1)
        .and_then(|i| doc.tree().children(at.node).get(i).copied())
        .filter(|&n| doc.tree().is_text(n));
    if let Some(previous) = previous {
        let len = doc.tree().node_len(previous);
        if let Some(existing) = doc.tree_mut().text_mut(previous) {
            existing.push_str(text);
        }
        doc.set_selection(Selection::caret(Position::new(previous, len + added)));
        return true;
    }

    let node = doc.tree_mut().create_text(text);
    doc.insert_nodes(at, &[node]);
    doc.set_selection(Selection::caret(Position::new(node, added)));
    true
}

fn remove_char(doc: &mut RichDocument, node: NodeId, index: usize) -> bool {
    let Some(text) = doc.tree_mut().text_mut(node) else {
        return false;
    };
    let Some((byte, c)) = text.char_indices().nth(index) else {
        return false;
    };
    text.replace_range(byte..byte + c.len_utf8(), "");
    true
}

fn delete_backward(doc: &mut RichDocument) -> bool {
    if !is_collapsed(doc) {
        doc.delete_selection();
        return true;
    }
    let (at, _) = doc.ordered_selection();
    if doc.tree().is_text(at.node) {
        if at.offset == 0 || !remove_char(doc, at.node, at.offset - 1) {
            return false;
        }
        doc.set_selection(Selection::caret(Position::new(at.node, at.offset - 1)));
        return true;
    }

    let Some(previous) = at
        .offset
        .checked_sub(1)
        .and_then(|i| doc.tree().children(at.node).get(i).copied())
    else {
        return false;
    };
    if doc.tree().is_text(previous) {
        let len = doc.tree().node_len(previous);
        if len == 0 || !remove_char(doc, previous, len - 1) {
            return false;
        }
        doc.set_selection(Selection::caret(Position::new(previous, len - 1)));
    } else {
        doc.tree_mut().detach(previous);
        doc.set_selection(Selection::caret(Position::new(at.node, at.offset - 1)));
    }
    true
}

fn delete_forward(doc: &mut RichDocument) -> bool {
    if !is_collapsed(doc) {
        doc.delete_selection();
        return true;
    }
    let (at, _) = doc.ordered_selection();
    if doc.tree().is_text(at.node) {
        return remove_char(doc, at.node, at.offset);
    }

    let Some(next) = doc.tree().children(at.node).get(at.offset).copied() else {
        return false;
    };
    if doc.tree().is_text(next) {
        if !remove_char(doc, next, 0) {
            return false;
        }
        doc.set_selection(Selection::caret(Position::new(next, 0)));
    } else {
        doc.tree_mut().detach(next);
    }
    true
}

// === Block commands ===

/// Root-level blocks touched by the selection. Inline content at the root is
/// gathered into `div` blocks first; an empty document gets one empty block.
fn touched_blocks(doc: &mut RichDocument) -> Vec<NodeId> {
    let root = doc.root();
    let len = doc.tree().children(root).len();
    if len == 0 {
        let tree = doc.tree_mut();
        let block = tree.create_element(Element::new("div"));
        let br = tree.create_element(Element::new("br"));
        tree.append(block, br);
        tree.append(root, block);
        doc.set_selection(Selection::caret(Position::new(block, 0)));
        return vec![block];
    }

    let (start, end) = doc.ordered_selection();
    let lo = doc.top_level_index(start).unwrap_or(len).min(len - 1);
    let mut hi = doc.top_level_index(end).unwrap_or(len);
    if end.node == root && hi > lo {
        hi -= 1;
    }
    let hi = hi.min(len - 1).max(lo);

    let children: Vec<NodeId> = doc.tree().children(root)[lo..=hi].to_vec();
    let mut blocks = Vec::new();
    let mut pending: Vec<NodeId> = Vec::new();
    for child in children {
        let is_block = doc.tree().element(child).is_some_and(|el| el.is_block());
        if is_block {
            flush_inline(doc, &mut pending, &mut blocks);
            blocks.push(child);
        } else {
            pending.push(child);
        }
    }
    flush_inline(doc, &mut pending, &mut blocks);
    blocks
}

fn flush_inline(doc: &mut RichDocument, pending: &mut Vec<NodeId>, blocks: &mut Vec<NodeId>) {
    if pending.is_empty() {
        return;
    }
    let group = std::mem::take(pending);
    let blank = group.iter().all(|&n| {
        doc.tree()
            .text(n)
            .is_some_and(|t| t.chars().all(char::is_whitespace))
    });
    if blank {
        return;
    }
    let root = doc.root();
    let Some(index) = doc.tree().index_in_parent(group[0]) else {
        return;
    };
    let tree = doc.tree_mut();
    let block = tree.create_element(Element::new("div"));
    tree.insert(root, index, block);
    for node in group {
        tree.append(block, node);
    }
    blocks.push(block);
}

fn select_blocks(doc: &mut RichDocument, blocks: &[NodeId]) {
    if let (Some(&first), Some(&last)) = (blocks.first(), blocks.last()) {
        let len = doc.tree().node_len(last);
        doc.select(Position::new(first, 0), Position::new(last, len));
    }
}

fn format_block(doc: &mut RichDocument, value: &str) -> bool {
    let tag = value
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .to_ascii_lowercase();
    if !FORMAT_BLOCK_TAGS.contains(&tag.as_str()) {
        return false;
    }

    let blocks = touched_blocks(doc);
    let mut changed = false;
    for &block in &blocks {
        if let Some(el) = doc.tree_mut().element_mut(block) {
            if ["ul", "ol", "table", "hr"].iter().any(|t| el.is(t)) {
                continue;
            }
            el.tag = SmolStr::new(&tag);
            changed = true;
        }
    }
    select_blocks(doc, &blocks);
    changed
}

fn is_list(doc: &RichDocument, node: NodeId) -> bool {
    doc.tree().is_tag(node, "ul") || doc.tree().is_tag(node, "ol")
}

fn toggle_list(doc: &mut RichDocument, list_tag: &str) -> bool {
    let root = doc.root();
    let blocks = touched_blocks(doc);
    let Some(&first) = blocks.first() else {
        return false;
    };

    // Same list type everywhere: turn the items back into paragraphs.
    if blocks.iter().all(|&b| doc.tree().is_tag(b, list_tag)) {
        let mut paragraphs = Vec::new();
        for &list in &blocks {
            let Some(mut index) = doc.tree().index_in_parent(list) else {
                continue;
            };
            let items = doc.tree().children(list).to_vec();
            let tree = doc.tree_mut();
            for item in items {
                if let Some(el) = tree.element_mut(item) {
                    el.tag = SmolStr::new("p");
                }
                tree.insert(root, index, item);
                paragraphs.push(item);
                index += 1;
            }
            tree.detach(list);
        }
        select_blocks(doc, &paragraphs);
        return true;
    }

    // Lists of the other type: switch them over.
    if blocks.iter().all(|&b| is_list(doc, b)) {
        for &list in &blocks {
            if let Some(el) = doc.tree_mut().element_mut(list) {
                el.tag = SmolStr::new(list_tag);
            }
        }
        select_blocks(doc, &blocks);
        return true;
    }

    let Some(index) = doc.tree().index_in_parent(first) else {
        return false;
    };
    let list = doc.tree_mut().create_element(Element::new(list_tag));
    doc.tree_mut().insert(root, index, list);
    for &block in &blocks {
        if is_list(doc, block) {
            let items = doc.tree().children(block).to_vec();
            let tree = doc.tree_mut();
            for item in items {
                tree.append(list, item);
            }
            tree.detach(block);
            continue;
        }

        let unwrap_block = doc
            .tree()
            .element(block)
            .is_some_and(|el| el.is("div") || el.is("p"));
        let tree = doc.tree_mut();
        let item = tree.create_element(Element::new("li"));
        tree.append(list, item);
        if unwrap_block {
            for child in tree.children(block).to_vec() {
                tree.append(item, child);
            }
            tree.detach(block);
        } else {
            tree.append(item, block);
        }
    }
    select_blocks(doc, &[list]);
    true
}

fn justify(doc: &mut RichDocument, align: &str) -> bool {
    let blocks = touched_blocks(doc);
    for &block in &blocks {
        if let Some(el) = doc.tree_mut().element_mut(block) {
            set_style_property(el, "text-align", align);
        }
    }
    select_blocks(doc, &blocks);
    !blocks.is_empty()
}

/// Set one declaration in an element's `style` attribute, keeping the others.
fn set_style_property(el: &mut Element, property: &str, value: &str) {
    let mut decls: Vec<String> = el
        .attr("style")
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .filter(|d| {
            d.split(':')
                .next()
                .is_none_or(|name| !name.trim().eq_ignore_ascii_case(property))
        })
        .map(str::to_string)
        .collect();
    decls.push(format!("{property}: {value}"));
    el.set_attr("style", format!("{};", decls.join("; ")));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(html: &str) -> ModelEngine {
        ModelEngine::from_html(html)
    }

    fn select(engine: &mut ModelEngine, needle: &str) {
        assert!(
            engine.document_mut().select_text(needle),
            "text {needle:?} not found"
        );
    }

    #[test]
    fn bold_wraps_selection_and_toggles_off() {
        let mut e = engine("<p>hello world</p>");
        select(&mut e, "world");
        assert!(e.execute("bold", None));
        assert_eq!(e.html(), "<p>hello <b>world</b></p>");

        // Selection still covers the run, so a second toggle removes it.
        assert!(e.execute("bold", None));
        assert_eq!(e.html(), "<p>hello world</p>");
    }

    #[test]
    fn partial_unbold_keeps_the_rest_bold() {
        let mut e = engine("<p><b>abcdef</b></p>");
        select(&mut e, "cd");
        assert!(e.execute("bold", None));
        insta::assert_snapshot!(e.html(), @"<p><b>ab</b>cd<b>ef</b></p>");
    }

    #[test]
    fn formatting_across_blocks_wraps_each_run() {
        let mut e = engine("<p>one</p><p>two</p>");
        e.document_mut().select_all();
        assert!(e.execute("italic", None));
        assert_eq!(e.html(), "<p><i>one</i></p><p><i>two</i></p>");
    }

    #[test]
    fn formatting_needs_a_selection() {
        let mut e = engine("<p>text</p>");
        assert!(!e.execute("underline", None));
        assert!(!e.can_undo());
    }

    #[test]
    fn unknown_commands_are_ignored() {
        let mut e = engine("<p>text</p>");
        e.document_mut().select_all();
        assert!(!e.execute("fontName", Some("serif")));
        assert!(!e.execute("", None));
        assert_eq!(e.html(), "<p>text</p>");
    }

    #[test]
    fn create_link_wraps_selection() {
        let mut e = engine("<p>see docs here</p>");
        select(&mut e, "docs");
        assert!(e.execute("createLink", Some("https://example.com")));
        assert_eq!(
            e.html(),
            r#"<p>see <a href="https://example.com">docs</a> here</p>"#
        );
    }

    #[test]
    fn create_link_at_caret_inserts_url() {
        let mut e = engine("");
        assert!(e.execute("createLink", Some("https://a.b")));
        assert_eq!(e.html(), r#"<a href="https://a.b">https://a.b</a>"#);
        assert!(!e.execute("createLink", Some("")));
    }

    #[test]
    fn create_link_retargets_existing_anchor() {
        let mut e = engine(r#"<p><a href="https://old">x</a></p>"#);
        select(&mut e, "x");
        assert!(e.execute("createLink", Some("https://new")));
        assert_eq!(e.html(), r#"<p><a href="https://new">x</a></p>"#);
    }

    #[test]
    fn unlink_and_remove_format() {
        let mut e = engine(r#"<p><a href="https://x"><b>bold link</b></a></p>"#);
        select(&mut e, "bold link");
        assert!(e.execute("removeFormat", None));
        assert_eq!(e.html(), r#"<p><a href="https://x">bold link</a></p>"#);
        assert!(e.execute("unlink", None));
        assert_eq!(e.html(), "<p>bold link</p>");
        // Nothing left to strip.
        assert!(!e.execute("unlink", None));
    }

    #[test]
    fn unlink_at_caret_removes_whole_anchor() {
        let mut e = engine(r#"<p><a href="https://x">link</a></p>"#);
        let text = e.document().tree().text_descendants(e.document().root())[0];
        e.document_mut()
            .set_selection(Selection::caret(Position::new(text, 2)));
        assert!(e.execute("unlink", None));
        assert_eq!(e.html(), "<p>link</p>");
    }

    #[test]
    fn insert_html_replaces_selection() {
        let mut e = engine("<p>abc</p>");
        select(&mut e, "b");
        assert!(e.execute("insertHTML", Some("<hr>")));
        assert_eq!(e.html(), "<p>a<hr>c</p>");
    }

    #[test]
    fn insert_text_extends_text_nodes() {
        let mut e = engine("<p>ac</p>");
        let text = e.document().tree().text_descendants(e.document().root())[0];
        e.document_mut()
            .set_selection(Selection::caret(Position::new(text, 1)));
        assert!(e.execute("insertText", Some("b")));
        assert!(e.execute("insertText", Some("b")));
        assert_eq!(e.html(), "<p>abbc</p>");
    }

    #[test]
    fn native_insert_image_needs_a_source() {
        let mut e = engine("");
        assert!(!e.execute("insertImage", None));
        assert!(e.execute("insertImage", Some("cat.png")));
        assert_eq!(e.html(), r#"<img src="cat.png">"#);
    }

    #[test]
    fn delete_and_forward_delete() {
        let mut e = engine("<p>abc</p>");
        let text = e.document().tree().text_descendants(e.document().root())[0];
        e.document_mut()
            .set_selection(Selection::caret(Position::new(text, 2)));
        assert!(e.execute("delete", None));
        assert_eq!(e.html(), "<p>ac</p>");
        assert!(e.execute("forwardDelete", None));
        assert_eq!(e.html(), "<p>a</p>");
        assert!(!e.execute("forwardDelete", None));
    }

    #[test]
    fn backspace_after_an_element_removes_it() {
        let mut e = engine(r#"x<img src="a.png">"#);
        assert!(e.execute("delete", None));
        assert_eq!(e.html(), "x");
    }

    #[test]
    fn format_block_retags_and_wraps_inline_content() {
        let mut e = engine("<p>title</p>");
        select(&mut e, "title");
        assert!(e.execute("formatBlock", Some("<h1>")));
        assert_eq!(e.html(), "<h1>title</h1>");

        let mut e = engine("loose text");
        select(&mut e, "loose");
        assert!(e.execute("formatBlock", Some("blockquote")));
        assert_eq!(e.html(), "<blockquote>loose text</blockquote>");

        assert!(!e.execute("formatBlock", Some("marquee")));
    }

    #[test]
    fn lists_toggle() {
        let mut e = engine("<p>one</p><p>two</p>");
        e.document_mut().select_all();
        assert!(e.execute("insertUnorderedList", None));
        assert_eq!(e.html(), "<ul><li>one</li><li>two</li></ul>");

        assert!(e.execute("insertOrderedList", None));
        assert_eq!(e.html(), "<ol><li>one</li><li>two</li></ol>");

        e.document_mut().select_all();
        assert!(e.execute("insertOrderedList", None));
        assert_eq!(e.html(), "<p>one</p><p>two</p>");
    }

    #[test]
    fn justify_merges_into_existing_style() {
        let mut e = engine(r#"<p style="color: red; text-align: left;">x</p>"#);
        select(&mut e, "x");
        assert!(e.execute("justifyCenter", None));
        assert_eq!(
            e.html(),
            r#"<p style="color: red; text-align: center;">x</p>"#
        );
    }

    #[test]
    fn block_command_on_empty_document_creates_block() {
        let mut e = engine("");
        assert!(e.execute("formatBlock", Some("h2")));
        assert_eq!(e.html(), "<h2><br></h2>");
    }

    #[test]
    fn undo_and_redo_restore_content() {
        let mut e = engine("<p>hello</p>");
        select(&mut e, "hello");
        e.execute("bold", None);
        e.execute("insertText", Some("bye"));
        assert_eq!(e.html(), "<p><b>bye</b></p>");

        assert!(e.execute("undo", None));
        assert_eq!(e.html(), "<p><b>hello</b></p>");
        assert!(e.execute("undo", None));
        assert_eq!(e.html(), "<p>hello</p>");
        assert!(!e.execute("undo", None));

        assert!(e.execute("redo", None));
        assert_eq!(e.html(), "<p><b>hello</b></p>");
    }

    #[test]
    fn set_html_clears_history() {
        let mut e = engine("<p>x</p>");
        e.document_mut().select_all();
        e.execute("bold", None);
        assert!(e.can_undo());
        e.set_html("");
        assert!(!e.can_undo());
        assert_eq!(e.html(), "");
    }

    #[test]
    fn history_depth_is_bounded() {
        let mut e = ModelEngine::with_history_depth(2);
        for _ in 0..5 {
            e.execute("insertText", Some("a"));
        }
        assert!(e.execute("undo", None));
        assert!(e.execute("undo", None));
        assert!(!e.execute("undo", None));
        assert_eq!(e.html(), "aaa");
    }

    #[test]
    fn focus_is_tracked() {
        let mut e = ModelEngine::new();
        assert!(!e.is_focused());
        e.focus();
        assert!(e.is_focused());
        e.blur();
        assert!(!e.is_focused());
    }
}
