//! Core data structures for the element graph.
//!
//! An element is either a node (optionally carrying an immutable primitive
//! value) or an edge between two existing elements. Edges are first-class:
//! they may themselves be the source or target of further edges, which is
//! what lets a single store hold several meta-levels at once.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an element in the store.
///
/// Uses a transparent `u32` wrapper: the inner value is the element's index in
/// the store's arena.
///
/// # Invariant
/// - Identifiers are assigned in strictly increasing order and never reused,
///   so ordering by `ElementId` is creation order.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u32);

impl ElementId {
    /// Creates a new `ElementId` from a raw `u32`.
    ///
    /// Prefer the store's creation methods; an id made up by hand simply reads
    /// as absent if no such element exists.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw `u32` representation.
    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

/// Immutable primitive value carried by a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

impl Value {
    /// Returns the string payload if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` if the value can be stored.
    ///
    /// NaN floats are rejected: they are not equal to themselves, which would
    /// break value comparison during matching and dictionary lookup.
    pub fn is_well_formed(&self) -> bool {
        !matches!(self, Value::Float(f) if f.is_nan())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

/// What an element is.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// A node with an optional value; `None` means structural.
    Node(Option<Value>),
    /// An edge from `source` to `target`.
    Edge { source: ElementId, target: ElementId },
}

/// An element together with its derived adjacency.
///
/// `outgoing` holds the edges whose source is this element, `incoming` the
/// edges whose target is this element. Both are maintained by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    kind: ElementKind,
    pub(crate) outgoing: IndexSet<ElementId>,
    pub(crate) incoming: IndexSet<ElementId>,
}

impl Element {
    pub(crate) fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            outgoing: IndexSet::new(),
            incoming: IndexSet::new(),
        }
    }

    /// Returns the element's kind.
    #[inline]
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Returns `true` if this element is an edge.
    #[inline]
    pub fn is_edge(&self) -> bool {
        matches!(self.kind, ElementKind::Edge { .. })
    }

    /// Returns the node value, or `None` for structural nodes and edges.
    #[inline]
    pub fn value(&self) -> Option<&Value> {
        match &self.kind {
            ElementKind::Node(value) => value.as_ref(),
            ElementKind::Edge { .. } => None,
        }
    }

    /// Returns `(source, target)` for edges.
    #[inline]
    pub fn endpoints(&self) -> Option<(ElementId, ElementId)> {
        match self.kind {
            ElementKind::Edge { source, target } => Some((source, target)),
            ElementKind::Node(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_malformed() {
        assert!(!Value::Float(f64::NAN).is_well_formed());
        assert!(Value::Float(1.5).is_well_formed());
        assert!(Value::from("x").is_well_formed());
    }

    #[test]
    fn value_conversions() {
        assert_eq!(Value::from(3_i64), Value::Integer(3));
        assert_eq!(Value::from(true), Value::Boolean(true));
        assert_eq!(Value::from("k").as_str(), Some("k"));
        assert_eq!(Value::Integer(1).as_str(), None);
    }

    #[test]
    fn value_serializes_externally_tagged() {
        let json = serde_json::to_string(&Value::Integer(7)).unwrap();
        assert_eq!(json, r#"{"Integer":7}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Integer(7));
    }

    #[test]
    fn element_accessors() {
        let node = Element::new(ElementKind::Node(Some(Value::Boolean(false))));
        assert!(!node.is_edge());
        assert_eq!(node.value(), Some(&Value::Boolean(false)));
        assert_eq!(node.endpoints(), None);

        let edge = Element::new(ElementKind::Edge {
            source: ElementId::new(0),
            target: ElementId::new(1),
        });
        assert!(edge.is_edge());
        assert_eq!(edge.value(), None);
        assert_eq!(edge.endpoints(), Some((ElementId::new(0), ElementId::new(1))));
    }
}
