//! Arena-backed HTML node tree.
//!
//! `HtmlTree` is the native stand-in for the browser DOM subtree that holds the
//! document. Nodes are addressed by `NodeId` handles which stay valid for the
//! lifetime of the tree, including after a node is detached. That lets callers
//! hold on to a node across edits the same way a script holds an element
//! reference (the drag handler relies on this).

mod parse;
mod serialize;

pub use parse::{decode_entities, parse_fragment};
pub use serialize::{escape_attribute, escape_text, escaped_attribute, escaped_text};

use smol_str::SmolStr;

/// Handle to a node in an [`HtmlTree`]. Never reused within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single attribute, name lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: SmolStr,
    pub value: String,
}

/// Element payload: tag name (lowercased) and attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: SmolStr,
    pub attrs: Vec<Attribute>,
}

impl Element {
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Self {
            tag: SmolStr::new(tag.into().to_ascii_lowercase()),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attrs
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => existing.value = value,
            None => self.attrs.push(Attribute {
                name: SmolStr::new(name.to_ascii_lowercase()),
                value,
            }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|a| !a.name.eq_ignore_ascii_case(name));
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Void elements never have children or a closing tag.
    pub fn is_void(&self) -> bool {
        is_void_tag(&self.tag)
    }

    /// Block-level elements, as far as the command layer cares.
    pub fn is_block(&self) -> bool {
        is_block_tag(&self.tag)
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(Element),
    /// Text content, entities already decoded.
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena of HTML nodes.
#[derive(Debug, Clone, Default)]
pub struct HtmlTree {
    nodes: Vec<NodeData>,
}

pub(crate) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

pub(crate) fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "div"
            | "dl"
            | "figure"
            | "footer"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hr"
            | "li"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "table"
            | "tbody"
            | "td"
            | "th"
            | "thead"
            | "tr"
            | "ul"
    )
}

impl HtmlTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, element: Element) -> NodeId {
        self.push(NodeKind::Element(element))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    pub fn kind_mut(&mut self, node: NodeId) -> &mut NodeKind {
        &mut self.nodes[node.0].kind
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match self.kind(node) {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match self.kind_mut(node) {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.kind(node) {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    pub fn text_mut(&mut self, node: NodeId) -> Option<&mut String> {
        match self.kind_mut(node) {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.kind(node), NodeKind::Text(_))
    }

    /// True if `node` is an element with the given tag.
    pub fn is_tag(&self, node: NodeId, tag: &str) -> bool {
        self.element(node).is_some_and(|el| el.is(tag))
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Length in the boundary-point sense: chars for text, children for elements.
    pub fn node_len(&self, node: NodeId) -> usize {
        match self.kind(node) {
            NodeKind::Text(text) => text.chars().count(),
            NodeKind::Element(_) => self.children(node).len(),
        }
    }

    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&c| c == node)
    }

    /// Walk up from `node` (inclusive) and return the first match below `stop`.
    pub fn closest(
        &self,
        node: NodeId,
        stop: NodeId,
        mut pred: impl FnMut(&Element) -> bool,
    ) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == stop {
                return None;
            }
            if let Some(el) = self.element(n) {
                if pred(el) {
                    return Some(n);
                }
            }
            current = self.parent(n);
        }
        None
    }

    /// True if `ancestor` is `node` or one of its ancestors.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Child indices from `root` down to `node`. None if `node` is not under `root`.
    pub fn path_from(&self, root: NodeId, node: NodeId) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = node;
        while current != root {
            path.push(self.index_in_parent(current)?);
            current = self.parent(current)?;
        }
        path.reverse();
        Some(path)
    }

    /// Follow a child-index path down from `root`.
    pub fn node_at_path(&self, root: NodeId, path: &[usize]) -> Option<NodeId> {
        let mut current = root;
        for &idx in path {
            current = *self.children(current).get(idx)?;
        }
        Some(current)
    }

    /// Remove `node` from its parent. The node and its subtree stay addressable.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Insert `child` into `parent` at `index` (clamped), detaching it first.
    pub fn insert(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let len = self.children(parent).len();
        self.insert(parent, len, child);
    }

    /// Detach every child of `node`.
    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Replace an element with its own children, in place.
    pub fn unwrap(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        let Some(index) = self.index_in_parent(node) else {
            return;
        };
        let children = self.children(node).to_vec();
        self.detach(node);
        for (offset, child) in children.into_iter().enumerate() {
            self.insert(parent, index + offset, child);
        }
    }

    /// Wrap `node` in a new element placed where `node` was.
    pub fn wrap(&mut self, node: NodeId, element: Element) -> NodeId {
        let wrapper = self.create_element(element);
        if let (Some(parent), Some(index)) = (self.parent(node), self.index_in_parent(node)) {
            self.insert(parent, index, wrapper);
        }
        self.append(wrapper, node);
        wrapper
    }

    /// Split a text node at a char offset. The tail moves into a new sibling
    /// text node which is returned. Offsets at either end split nothing.
    pub fn split_text(&mut self, node: NodeId, char_offset: usize) -> Option<NodeId> {
        let text = self.text(node)?;
        let len = text.chars().count();
        if char_offset == 0 || char_offset >= len {
            return None;
        }
        let byte = text
            .char_indices()
            .nth(char_offset)
            .map(|(b, _)| b)
            .unwrap_or(text.len());
        let tail = text[byte..].to_string();
        if let Some(text) = self.text_mut(node) {
            text.truncate(byte);
        }
        let tail_node = self.create_text(tail);
        if let (Some(parent), Some(index)) = (self.parent(node), self.index_in_parent(node)) {
            self.insert(parent, index + 1, tail_node);
        }
        Some(tail_node)
    }

    /// Pre-order descendants of `node`, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// Text descendants of `node` in document order.
    pub fn text_descendants(&self, node: NodeId) -> Vec<NodeId> {
        self.descendants(node)
            .into_iter()
            .filter(|&n| self.is_text(n))
            .collect()
    }

    /// Concatenated text of the subtree.
    pub fn text_content(&self, node: NodeId) -> String {
        if let Some(text) = self.text(node) {
            return text.to_string();
        }
        self.text_descendants(node)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Deep copy of a subtree. The copy is detached.
    pub fn clone_subtree(&mut self, node: NodeId) -> NodeId {
        let copy = self.push(self.kind(node).clone());
        for child in self.children(node).to_vec() {
            let child_copy = self.clone_subtree(child);
            self.append(copy, child_copy);
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para_with_text(tree: &mut HtmlTree, text: &str) -> (NodeId, NodeId) {
        let p = tree.create_element(Element::new("p"));
        let t = tree.create_text(text);
        tree.append(p, t);
        (p, t)
    }

    #[test]
    fn split_text_moves_tail_to_sibling() {
        let mut tree = HtmlTree::new();
        let (p, t) = para_with_text(&mut tree, "hello world");

        let tail = tree.split_text(t, 5).expect("split");
        assert_eq!(tree.text(t), Some("hello"));
        assert_eq!(tree.text(tail), Some(" world"));
        assert_eq!(tree.children(p), &[t, tail]);

        // Splitting at an edge is a no-op.
        assert_eq!(tree.split_text(t, 0), None);
        assert_eq!(tree.split_text(t, 5), None);
    }

    #[test]
    fn split_text_counts_chars_not_bytes() {
        let mut tree = HtmlTree::new();
        let (_, t) = para_with_text(&mut tree, "héllo");
        let tail = tree.split_text(t, 2).expect("split");
        assert_eq!(tree.text(t), Some("hé"));
        assert_eq!(tree.text(tail), Some("llo"));
    }

    #[test]
    fn wrap_and_unwrap_round_trip() {
        let mut tree = HtmlTree::new();
        let (p, t) = para_with_text(&mut tree, "bold");

        let b = tree.wrap(t, Element::new("b"));
        assert_eq!(tree.children(p), &[b]);
        assert_eq!(tree.parent(t), Some(b));

        tree.unwrap(b);
        assert_eq!(tree.children(p), &[t]);
        assert_eq!(tree.parent(b), None);
    }

    #[test]
    fn detached_nodes_stay_addressable() {
        let mut tree = HtmlTree::new();
        let (p, t) = para_with_text(&mut tree, "kept");
        tree.detach(t);
        assert!(tree.children(p).is_empty());
        assert_eq!(tree.text(t), Some("kept"));
    }

    #[test]
    fn paths_locate_nodes() {
        let mut tree = HtmlTree::new();
        let root = tree.create_element(Element::new("div"));
        let (p1, _) = para_with_text(&mut tree, "one");
        let (p2, t2) = para_with_text(&mut tree, "two");
        tree.append(root, p1);
        tree.append(root, p2);

        let path = tree.path_from(root, t2).expect("path");
        assert_eq!(path, vec![1, 0]);
        assert_eq!(tree.node_at_path(root, &path), Some(t2));
        assert_eq!(tree.node_at_path(root, &[5]), None);
    }

    #[test]
    fn closest_stops_at_boundary() {
        let mut tree = HtmlTree::new();
        let root = tree.create_element(Element::new("b"));
        let (p, t) = para_with_text(&mut tree, "x");
        tree.append(root, p);

        assert_eq!(tree.closest(t, root, |el| el.is("p")), Some(p));
        // The root itself is never returned.
        assert_eq!(tree.closest(t, root, |el| el.is("b")), None);
    }
}
