//! Lightweight vertex/edge graph consumed by the matcher.
//!
//! Vertices carry a value `V` handed to the predicate; edges carry a value `E`
//! (unit by default). Adjacency lists are kept per vertex in insertion order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense vertex identifier within one `MatchGraph`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(u32);

impl VertexId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Dense edge identifier within one `MatchGraph`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(u32);

impl EdgeId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct VertexData<V> {
    value: V,
    outgoing: Vec<EdgeId>,
    incoming: Vec<EdgeId>,
}

#[derive(Debug, Clone)]
struct EdgeData<E> {
    source: VertexId,
    target: VertexId,
    value: E,
}

/// Directed multigraph with valued vertices and edges.
#[derive(Debug, Clone)]
pub struct MatchGraph<V, E = ()> {
    vertices: Vec<VertexData<V>>,
    edges: Vec<EdgeData<E>>,
}

impl<V, E> MatchGraph<V, E> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a vertex carrying `value`.
    pub fn add_vertex(&mut self, value: V) -> VertexId {
        let id = VertexId::new(self.vertices.len() as u32);
        self.vertices.push(VertexData {
            value,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        });
        id
    }

    /// Adds an edge carrying `value`; `None` if an endpoint is out of range.
    pub fn add_edge_with(&mut self, source: VertexId, target: VertexId, value: E) -> Option<EdgeId> {
        if source.index() >= self.vertices.len() || target.index() >= self.vertices.len() {
            return None;
        }
        let id = EdgeId::new(self.edges.len() as u32);
        self.edges.push(EdgeData { source, target, value });
        self.vertices[source.index()].outgoing.push(id);
        self.vertices[target.index()].incoming.push(id);
        Some(id)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterates over vertex ids in insertion order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len() as u32).map(VertexId::new)
    }

    /// Iterates over edge ids in insertion order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> {
        (0..self.edges.len() as u32).map(EdgeId::new)
    }

    /// Returns the value of vertex `id`.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> Option<&V> {
        self.vertices.get(id.index()).map(|v| &v.value)
    }

    /// Returns `(source, target)` of edge `id`.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> Option<(VertexId, VertexId)> {
        self.edges.get(id.index()).map(|e| (e.source, e.target))
    }

    /// Returns the value of edge `id`.
    #[inline]
    pub fn edge_value(&self, id: EdgeId) -> Option<&E> {
        self.edges.get(id.index()).map(|e| &e.value)
    }

    /// Edges leaving `id`; empty for unknown vertices.
    #[inline]
    pub fn outgoing(&self, id: VertexId) -> &[EdgeId] {
        match self.vertices.get(id.index()) {
            Some(v) => &v.outgoing,
            None => &[],
        }
    }

    /// Edges arriving at `id`; empty for unknown vertices.
    #[inline]
    pub fn incoming(&self, id: VertexId) -> &[EdgeId] {
        match self.vertices.get(id.index()) {
            Some(v) => &v.incoming,
            None => &[],
        }
    }

    #[inline]
    pub fn out_degree(&self, id: VertexId) -> usize {
        self.outgoing(id).len()
    }

    #[inline]
    pub fn in_degree(&self, id: VertexId) -> usize {
        self.incoming(id).len()
    }
}

impl<V> MatchGraph<V, ()> {
    /// Adds an unvalued edge; `None` if an endpoint is out of range.
    pub fn add_edge(&mut self, source: VertexId, target: VertexId) -> Option<EdgeId> {
        self.add_edge_with(source, target, ())
    }
}

impl<V, E> Default for MatchGraph<V, E> {
    fn default() -> Self {
        Self::new()
    }
}
