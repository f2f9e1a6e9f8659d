//! Moving embedded images by drag and drop.
//!
//! [`DragReposition`] is the two-state machine behind the editor's
//! `dragstart` / `dragover` / `drop` / `dragend` handlers. The host supplies
//! element access and caret-from-point lookups through [`DropHost`]; the
//! browser implements it over the DOM, [`ModelDropHost`] over a
//! [`ModelEngine`].

use crate::document::RichDocument;
use crate::dom::{NodeId, parse_fragment};
use crate::engine::ModelEngine;
use crate::selection::{Position, Selection};

/// Viewport coordinates of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The two host lookups that turn a point into a caret. Hosts may support
/// either, both or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretApi {
    /// `caretPositionFromPoint`, the standard one.
    PositionFromPoint,
    /// `caretRangeFromPoint`, the WebKit one.
    RangeFromPoint,
}

/// Element and caret access for the drag handler.
pub trait DropHost {
    type Element: Clone + PartialEq;
    type Caret;

    fn is_image_wrapper(&self, element: &Self::Element) -> bool;

    fn outer_html(&self, element: &Self::Element) -> String;

    fn supports(&self, api: CaretApi) -> bool;

    fn caret_from_point(&self, api: CaretApi, point: Point) -> Option<Self::Caret>;

    /// True if the caret lies inside `element`.
    fn caret_inside(&self, caret: &Self::Caret, element: &Self::Element) -> bool;

    /// Delete whatever is at `caret`, insert the first node parsed from
    /// `payload` there, then remove `element`. Returns false if nothing moved.
    fn relocate(&mut self, element: &Self::Element, caret: &Self::Caret, payload: &str) -> bool;
}

/// Resolve a drop point, preferring `caretPositionFromPoint`.
pub fn resolve_caret<H: DropHost>(host: &H, point: Point) -> Option<H::Caret> {
    [CaretApi::PositionFromPoint, CaretApi::RangeFromPoint]
        .into_iter()
        .find(|&api| host.supports(api))
        .and_then(|api| host.caret_from_point(api, point))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState<E> {
    #[default]
    Idle,
    Dragging {
        element: E,
        /// Outer HTML captured at drag start.
        payload: String,
    },
}

/// What a drop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// No image drag in progress; the host's default drop applies.
    NotDragging,
    /// The point did not resolve to a caret. Nothing changed.
    Unresolved,
    /// Dropped onto the dragged element itself. Nothing changed.
    OntoSelf,
    Moved,
}

/// Drag-to-move state machine for image wrappers.
#[derive(Debug, Clone, Default)]
pub struct DragReposition<E> {
    state: DragState<E>,
}

impl<E: Clone + PartialEq> DragReposition<E> {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> &DragState<E> {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Begin dragging `element` if it is an image wrapper. Returns whether a
    /// drag started.
    pub fn drag_start<H>(&mut self, host: &H, element: &E) -> bool
    where
        H: DropHost<Element = E>,
    {
        if !host.is_image_wrapper(element) {
            return false;
        }
        let payload = host.outer_html(element);
        tracing::trace!(bytes = payload.len(), "image drag started");
        self.state = DragState::Dragging {
            element: element.clone(),
            payload,
        };
        true
    }

    /// Whether the caller should prevent the default `dragover` handling.
    /// Always true, so the whole editable root accepts drops.
    pub fn drag_over(&self) -> bool {
        true
    }

    /// Finish a drag at `point`.
    pub fn drop<H>(&mut self, host: &mut H, point: Point) -> DropOutcome
    where
        H: DropHost<Element = E>,
    {
        let DragState::Dragging { element, payload } = &self.state else {
            return DropOutcome::NotDragging;
        };
        let Some(caret) = resolve_caret(&*host, point) else {
            tracing::debug!(?point, "drop point did not resolve to a caret");
            return DropOutcome::Unresolved;
        };
        if host.caret_inside(&caret, element) {
            return DropOutcome::OntoSelf;
        }
        if !host.relocate(element, &caret, payload) {
            return DropOutcome::Unresolved;
        }
        self.state = DragState::Idle;
        DropOutcome::Moved
    }

    /// A drag ended, dropped or cancelled.
    pub fn drag_end(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Maps points to document positions for [`ModelDropHost`].
pub trait CaretResolver {
    fn supports(&self, api: CaretApi) -> bool;

    fn resolve(&self, doc: &RichDocument, api: CaretApi, point: Point) -> Option<Position>;
}

/// [`DropHost`] over the native engine. The move is one undo step.
pub struct ModelDropHost<'a, R> {
    engine: &'a mut ModelEngine,
    resolver: R,
}

impl<'a, R: CaretResolver> ModelDropHost<'a, R> {
    pub fn new(engine: &'a mut ModelEngine, resolver: R) -> Self {
        Self { engine, resolver }
    }
}

impl<R: CaretResolver> DropHost for ModelDropHost<'_, R> {
    type Element = NodeId;
    type Caret = Position;

    fn is_image_wrapper(&self, element: &NodeId) -> bool {
        let doc = self.engine.document();
        doc.tree().contains(doc.root(), *element)
            && doc
                .tree()
                .element(*element)
                .is_some_and(|el| el.has_class("img-wrapper"))
    }

    fn outer_html(&self, element: &NodeId) -> String {
        self.engine.document().tree().outer_html(*element)
    }

    fn supports(&self, api: CaretApi) -> bool {
        self.resolver.supports(api)
    }

    fn caret_from_point(&self, api: CaretApi, point: Point) -> Option<Position> {
        let doc = self.engine.document();
        self.resolver
            .resolve(doc, api, point)
            .filter(|pos| doc.tree().contains(doc.root(), pos.node))
    }

    fn caret_inside(&self, caret: &Position, element: &NodeId) -> bool {
        self.engine.document().tree().contains(*element, caret.node)
    }

    fn relocate(&mut self, element: &NodeId, caret: &Position, payload: &str) -> bool {
        let element = *element;
        let caret = *caret;
        self.engine.transact(|doc| {
            let at = doc.delete_range(caret, caret);
            let nodes = parse_fragment(doc.tree_mut(), payload);
            let Some(&first) = nodes.first() else {
                return false;
            };
            doc.insert_nodes(at, &[first]);
            doc.tree_mut().detach(element);
            // Sibling indices shift when the original sat before the drop point.
            let tree = doc.tree();
            let after = tree
                .parent(first)
                .zip(tree.index_in_parent(first))
                .map(|(parent, index)| Position::new(parent, index + 1));
            match after {
                Some(after) => doc.set_selection(Selection::caret(after)),
                None => doc.caret_at_end(),
            }
            true
        })
    }
}
