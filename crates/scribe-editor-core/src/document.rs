//! The native rich-text document: an editable root element plus a selection.
//!
//! `RichDocument` provides the range primitives the command layer is built
//! from: deleting a range, inserting nodes at a boundary point, and finding the
//! text runs inside a range. Ranges are normalized by splitting text nodes at
//! their boundaries, so afterwards every boundary sits between whole nodes.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::dom::{Element, HtmlTree, NodeId, parse_fragment};
use crate::selection::{PathPosition, PathSelection, Position, Selection};

/// Editable root plus selection state.
#[derive(Debug, Clone)]
pub struct RichDocument {
    tree: HtmlTree,
    root: NodeId,
    selection: Selection,
}

impl Default for RichDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl RichDocument {
    /// Create an empty document with the caret at the start.
    pub fn new() -> Self {
        let mut tree = HtmlTree::new();
        let root = tree.create_element(Element::new("div").with_attr("contenteditable", "true"));
        Self {
            tree,
            root,
            selection: Selection::caret(Position::new(root, 0)),
        }
    }

    /// Create a document from an HTML fragment, caret at the end.
    pub fn from_html(html: &str) -> Self {
        let mut doc = Self::new();
        doc.set_html(html);
        doc
    }

    pub fn tree(&self) -> &HtmlTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut HtmlTree {
        &mut self.tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Serialized content of the root (`innerHTML`).
    pub fn html(&self) -> String {
        self.tree.inner_html(self.root)
    }

    /// Replace all content. The caret moves to the end.
    pub fn set_html(&mut self, html: &str) {
        self.tree.clear_children(self.root);
        for node in parse_fragment(&mut self.tree, html) {
            self.tree.append(self.root, node);
        }
        self.caret_at_end();
    }

    pub fn is_empty(&self) -> bool {
        self.tree.children(self.root).is_empty()
    }

    // === Selection ===

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn select(&mut self, anchor: Position, head: Position) {
        self.selection = Selection::new(anchor, head);
    }

    pub fn select_all(&mut self) {
        let len = self.tree.children(self.root).len();
        self.select(Position::new(self.root, 0), Position::new(self.root, len));
    }

    pub fn caret_at_end(&mut self) {
        let len = self.tree.children(self.root).len();
        self.selection = Selection::caret(Position::new(self.root, len));
    }

    /// Select the first occurrence of `needle` inside a single text node.
    pub fn select_text(&mut self, needle: &str) -> bool {
        if needle.is_empty() {
            return false;
        }
        for node in self.tree.text_descendants(self.root) {
            let Some(text) = self.tree.text(node) else {
                continue;
            };
            if let Some(byte) = text.find(needle) {
                let start = text[..byte].chars().count();
                let end = start + needle.chars().count();
                self.select(Position::new(node, start), Position::new(node, end));
                return true;
            }
        }
        false
    }

    /// Selection bounds in document order.
    pub fn ordered_selection(&self) -> (Position, Position) {
        let Selection { anchor, head } = self.selection;
        match self.compare(anchor, head) {
            Ordering::Greater => (head, anchor),
            _ => (anchor, head),
        }
    }

    /// True if the selection is usable: both ends inside the root.
    pub fn selection_in_root(&self) -> bool {
        let Selection { anchor, head } = self.selection;
        self.tree.contains(self.root, anchor.node) && self.tree.contains(self.root, head.node)
    }

    // === Ordering ===

    fn key(&self, pos: Position) -> Vec<usize> {
        let mut key = self.tree.path_from(self.root, pos.node).unwrap_or_default();
        key.push(pos.offset);
        key
    }

    /// Document order of two boundary points.
    pub fn compare(&self, a: Position, b: Position) -> Ordering {
        self.key(a).cmp(&self.key(b))
    }

    // === Range primitives ===

    /// Position of a node's start/end as seen from its parent.
    fn before(&self, node: NodeId) -> Option<Position> {
        let parent = self.tree.parent(node)?;
        let idx = self.tree.index_in_parent(node)?;
        Some(Position::new(parent, idx))
    }

    /// Turn a position inside a text node into a position between nodes,
    /// splitting the text if the offset is interior.
    pub fn split_boundary(&mut self, pos: Position) -> Position {
        if !self.tree.is_text(pos.node) {
            return pos;
        }
        let len = self.tree.node_len(pos.node);
        let Some(before) = self.before(pos.node) else {
            return pos;
        };
        if pos.offset == 0 {
            before
        } else if pos.offset >= len {
            Position::new(before.node, before.offset + 1)
        } else {
            self.tree.split_text(pos.node, pos.offset);
            Position::new(before.node, before.offset + 1)
        }
    }

    /// Split text at both ends of `start..end` and return element-level
    /// boundaries. `start` must not be after `end`.
    fn split_range(&mut self, start: Position, end: Position) -> (Position, Position) {
        let mut start = start;
        let mut end = end;

        if self.tree.is_text(end.node) {
            let len = self.tree.node_len(end.node);
            if end.offset > 0 && end.offset < len {
                self.tree.split_text(end.node, end.offset);
            }
        }
        if self.tree.is_text(start.node) {
            let len = self.tree.node_len(start.node);
            if start.offset > 0 && start.offset < len {
                if let Some(tail) = self.tree.split_text(start.node, start.offset) {
                    if end.node == start.node {
                        end = Position::new(tail, end.offset - start.offset);
                    }
                    start = Position::new(tail, 0);
                }
            }
        }

        let to_boundary = |doc: &Self, pos: Position| -> Position {
            if !doc.tree.is_text(pos.node) {
                return pos;
            }
            match doc.before(pos.node) {
                Some(before) if pos.offset == 0 => before,
                Some(before) => Position::new(before.node, before.offset + 1),
                None => pos,
            }
        };
        (to_boundary(self, start), to_boundary(self, end))
    }

    /// Maximal subtrees lying entirely inside `start..end` (element-level bounds).
    fn contained_nodes(&self, start: Position, end: Position) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::new();
        let mut taken: HashSet<NodeId> = HashSet::new();
        for node in self.tree.descendants(self.root) {
            if self.tree.parent(node).is_some_and(|p| taken.contains(&p)) {
                taken.insert(node);
                continue;
            }
            let Some(before) = self.before(node) else {
                continue;
            };
            let after = Position::new(before.node, before.offset + 1);
            if self.compare(before, start) != Ordering::Less
                && self.compare(after, end) != Ordering::Greater
            {
                taken.insert(node);
                out.push(node);
            }
        }
        out
    }

    /// Delete everything between two positions. Returns the collapsed position
    /// where the content was.
    pub fn delete_range(&mut self, start: Position, end: Position) -> Position {
        let (start, end) = match self.compare(start, end) {
            Ordering::Greater => (end, start),
            Ordering::Equal => return start,
            Ordering::Less => (start, end),
        };
        let (start, end) = self.split_range(start, end);
        for node in self.contained_nodes(start, end) {
            self.tree.detach(node);
        }
        start
    }

    /// Delete the selected content and collapse the caret there.
    pub fn delete_selection(&mut self) -> Position {
        let (start, end) = self.ordered_selection();
        let at = self.delete_range(start, end);
        self.selection = Selection::caret(at);
        at
    }

    /// Insert detached nodes at `at`, returning the position after them.
    pub fn insert_nodes(&mut self, at: Position, nodes: &[NodeId]) -> Position {
        let at = self.split_boundary(at);
        for (i, &node) in nodes.iter().enumerate() {
            self.tree.insert(at.node, at.offset + i, node);
        }
        Position::new(at.node, at.offset + nodes.len())
    }

    /// Parse `html` and insert it at `at`, returning the position after it.
    pub fn insert_html(&mut self, at: Position, html: &str) -> Position {
        let nodes = parse_fragment(&mut self.tree, html);
        self.insert_nodes(at, &nodes)
    }

    /// Text nodes inside `start..end`, splitting the boundary nodes so that
    /// every returned node is entirely selected.
    pub fn text_runs(&mut self, start: Position, end: Position) -> Vec<NodeId> {
        let (start, end) = match self.compare(start, end) {
            Ordering::Greater => (end, start),
            _ => (start, end),
        };
        let (start, end) = self.split_range(start, end);
        let mut runs = Vec::new();
        for node in self.contained_nodes(start, end) {
            if self.tree.is_text(node) {
                runs.push(node);
            } else {
                runs.extend(self.tree.text_descendants(node));
            }
        }
        runs.retain(|&n| self.tree.node_len(n) > 0);
        runs
    }

    /// Select exactly the given runs (first to last).
    pub fn select_runs(&mut self, runs: &[NodeId]) {
        if let (Some(&first), Some(&last)) = (runs.first(), runs.last()) {
            let len = self.tree.node_len(last);
            self.select(Position::new(first, 0), Position::new(last, len));
        }
    }

    /// Index of the root child containing `pos`.
    pub fn top_level_index(&self, pos: Position) -> Option<usize> {
        if pos.node == self.root {
            return Some(pos.offset);
        }
        let mut current = pos.node;
        loop {
            let parent = self.tree.parent(current)?;
            if parent == self.root {
                return self.tree.index_in_parent(current);
            }
            current = parent;
        }
    }

    // === Snapshots ===

    fn to_path(&self, pos: Position) -> PathPosition {
        PathPosition {
            path: self.tree.path_from(self.root, pos.node).unwrap_or_default(),
            offset: pos.offset,
        }
    }

    fn from_path(&self, pos: &PathPosition) -> Position {
        match self.tree.node_at_path(self.root, &pos.path) {
            Some(node) => Position::new(node, pos.offset.min(self.tree.node_len(node))),
            None => Position::new(self.root, self.tree.children(self.root).len()),
        }
    }

    /// The selection as root-relative paths.
    pub fn path_selection(&self) -> PathSelection {
        PathSelection {
            anchor: self.to_path(self.selection.anchor),
            head: self.to_path(self.selection.head),
        }
    }

    /// Restore a selection saved with [`path_selection`](Self::path_selection).
    pub fn restore_path_selection(&mut self, saved: &PathSelection) {
        self.selection = Selection::new(self.from_path(&saved.anchor), self.from_path(&saved.head));
    }
}
