//! The element graph store.
//!
//! A flat arena of elements keyed by dense, never-reused identifiers, with an
//! incrementally maintained reverse-adjacency index. Edges may have other
//! edges as endpoints, so deletion cascades through a worklist over the
//! adjacency index rather than a pointer walk.
//!
//! # Failure policy
//! Structural-reference failures (an edge endpoint that does not exist) and
//! malformed values are reported as `None` rather than as errors: higher layers
//! routinely build graphs speculatively and probe with these calls.
//!
//! # Absence vs. emptiness
//! Every read distinguishes "this id does not exist" (`None`) from "this id
//! exists but has nothing" (`Some` of an empty collection, or `Some(None)` for
//! a value-less element).
//!
//! # Determinism
//! Adjacency reads return ids in ascending order, which is creation order.

pub mod dict;


use crate::arena::ElementArena;
use crate::core::{Element, ElementId, ElementKind, Value};
use tracing::{debug, trace, warn};

/// Process-scoped element graph.
#[derive(Debug, Clone)]
pub struct GraphStore {
    elements: ElementArena<Element>,
    root: ElementId,
}

impl GraphStore {
    /// Creates a store holding only its structural root node.
    pub fn new() -> Self {
        let mut elements = ElementArena::new();
        // Slot 0 of an empty arena is always free.
        let root = elements
            .allocate(Element::new(ElementKind::Node(None)))
            .unwrap_or(ElementId::new(0));
        Self { elements, root }
    }

    /// Returns the root node created with the store.
    ///
    /// The root is an ordinary node; deleting it is allowed.
    #[inline]
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.elements.live_count()
    }

    /// Returns `true` if no element is alive.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `id` currently exists.
    #[inline]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains(id)
    }

    /// Looks up an element by id.
    #[inline]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Iterates over live elements in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements.iter()
    }

    /// Creates a structural node (no value).
    ///
    /// # Panics
    /// Panics once all `2^32` element ids have been handed out. Ids are never
    /// reused, so a wrapped id would alias a dead element.
    pub fn create_node(&mut self) -> ElementId {
        let Some(id) = self.allocate(ElementKind::Node(None)) else {
            panic!("element id space exhausted");
        };
        trace!(%id, "created node");
        id
    }

    /// Creates a node carrying `value`.
    ///
    /// Returns `None` (and creates nothing) for malformed values or once the
    /// id space is exhausted.
    pub fn create_value_node(&mut self, value: impl Into<Value>) -> Option<ElementId> {
        let value = value.into();
        if !value.is_well_formed() {
            trace!(%value, "rejected malformed value");
            return None;
        }
        let id = self.allocate(ElementKind::Node(Some(value)))?;
        trace!(%id, "created value node");
        Some(id)
    }

    /// Creates an edge from `source` to `target`.
    ///
    /// Either endpoint may be a node or an edge. Returns `None` (and creates
    /// nothing) if either endpoint does not currently exist.
    pub fn create_edge(&mut self, source: ElementId, target: ElementId) -> Option<ElementId> {
        if !self.contains(source) || !self.contains(target) {
            trace!(%source, %target, "refused dangling edge");
            return None;
        }
        let id = self.allocate(ElementKind::Edge { source, target })?;
        if let Some(src) = self.elements.get_mut(source) {
            src.outgoing.insert(id);
        }
        if let Some(tgt) = self.elements.get_mut(target) {
            tgt.incoming.insert(id);
        }
        trace!(%id, %source, %target, "created edge");
        Some(id)
    }

    fn allocate(&mut self, kind: ElementKind) -> Option<ElementId> {
        let id = self.elements.allocate(Element::new(kind));
        if id.is_none() {
            warn!(live = self.elements.live_count(), "element id space exhausted");
        }
        id
    }

    /// Reads the value of `id`.
    ///
    /// Outer `None`: the element does not exist. Inner `None`: it exists but is
    /// a structural node or an edge.
    pub fn read_value(&self, id: ElementId) -> Option<Option<&Value>> {
        self.element(id).map(Element::value)
    }

    /// Reads `(source, target)` of an edge; `None` for nodes and absent ids.
    pub fn read_edge(&self, id: ElementId) -> Option<(ElementId, ElementId)> {
        self.element(id).and_then(Element::endpoints)
    }

    /// Reads the edges whose source is `id`, in creation order.
    pub fn read_outgoing(&self, id: ElementId) -> Option<Vec<ElementId>> {
        self.element(id).map(|element| sorted(&element.outgoing))
    }

    /// Reads the edges whose target is `id`, in creation order.
    pub fn read_incoming(&self, id: ElementId) -> Option<Vec<ElementId>> {
        self.element(id).map(|element| sorted(&element.incoming))
    }

    /// Edges whose source is `id`, in adjacency-set order.
    ///
    /// Cheaper than [`read_outgoing`](Self::read_outgoing): no allocation and
    /// no sort. Callers that need creation order pick the minimum themselves.
    pub(crate) fn outgoing_unordered(&self, id: ElementId) -> Option<impl Iterator<Item = ElementId> + '_> {
        self.element(id).map(|element| element.outgoing.iter().copied())
    }

    /// Deletes node `id` and every edge depending on it.
    ///
    /// Returns the number of elements removed; `0` if `id` is absent or is an
    /// edge.
    pub fn delete_node(&mut self, id: ElementId) -> usize {
        match self.element(id) {
            Some(element) if !element.is_edge() => self.remove_cascade(id),
            _ => 0,
        }
    }

    /// Deletes edge `id` and every edge depending on it.
    ///
    /// Returns the number of elements removed; `0` if `id` is absent or is a
    /// node.
    pub fn delete_edge(&mut self, id: ElementId) -> usize {
        match self.element(id) {
            Some(element) if element.is_edge() => self.remove_cascade(id),
            _ => 0,
        }
    }

    /// Deletes `id` whatever its kind, with the same cascade.
    pub fn delete(&mut self, id: ElementId) -> usize {
        self.remove_cascade(id)
    }

    /// Worklist removal over the reverse-adjacency index.
    fn remove_cascade(&mut self, id: ElementId) -> usize {
        let mut worklist = vec![id];
        let mut removed = 0;
        while let Some(current) = worklist.pop() {
            // Self-loops and diamonds push the same edge twice.
            let Some(element) = self.elements.deallocate(current) else {
                continue;
            };
            removed += 1;
            if let Some((source, target)) = element.endpoints() {
                if let Some(src) = self.elements.get_mut(source) {
                    src.outgoing.swap_remove(&current);
                }
                if let Some(tgt) = self.elements.get_mut(target) {
                    tgt.incoming.swap_remove(&current);
                }
            }
            worklist.extend(element.outgoing.iter().copied());
            worklist.extend(element.incoming.iter().copied());
        }
        if removed > 1 {
            debug!(%id, removed, "cascading delete");
        }
        removed
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted(ids: &indexmap::IndexSet<ElementId>) -> Vec<ElementId> {
    let mut ids: Vec<ElementId> = ids.iter().copied().collect();
    ids.sort_unstable();
    ids
}
