//! Boundary points and selections over an [`HtmlTree`](crate::dom::HtmlTree).
//!
//! These follow DOM Range semantics: a position inside an element counts
//! children, a position inside a text node counts chars (Unicode scalar
//! values, not UTF-16 units as in the browser).

use crate::dom::NodeId;

/// A boundary point in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub node: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// Text selection with anchor and head positions.
///
/// The anchor is where the selection started, the head is where the caret is now.
/// They may be in any document order; the document resolves ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where selection started
    pub anchor: Position,
    /// Where the caret is now
    pub head: Position,
}

impl Selection {
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// A collapsed selection.
    pub fn caret(at: Position) -> Self {
        Self {
            anchor: at,
            head: at,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }
}

/// A position stored as child indices from the root, so it survives the
/// document being re-parsed (undo snapshots).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPosition {
    pub path: Vec<usize>,
    pub offset: usize,
}

/// Selection stored as paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSelection {
    pub anchor: PathPosition,
    pub head: PathPosition,
}
