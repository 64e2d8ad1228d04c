//! Partial and complete guest→host correspondences.

use super::graph::{EdgeId, VertexId};
use crate::fingerprint::{HashValue, DOMAIN_MAPPING_V0, DOMAIN_SEARCH_STATE_V0};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single binding added during search, recorded for undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Binding {
    Vertex(VertexId),
    Edge(EdgeId),
}

/// Bindings added at one search depth plus the boundary they replaced.
#[derive(Debug, Clone)]
pub(crate) struct Undo {
    bindings: Vec<Binding>,
    boundary: Option<(VertexId, VertexId)>,
}

/// The matcher's mutable search state.
///
/// Both directions of the vertex and edge correspondences are kept in dense
/// tables so every injectivity check is O(1).
#[derive(Debug, Clone)]
pub(crate) struct PartialMapping {
    guest_to_host_vertex: Vec<Option<VertexId>>,
    host_to_guest_vertex: Vec<Option<VertexId>>,
    guest_to_host_edge: Vec<Option<EdgeId>>,
    host_to_guest_edge: Vec<Option<EdgeId>>,
    bound_vertices: usize,
    bound_edges: usize,
    /// Most recently bound vertex pair; biases the next extension.
    boundary: Option<(VertexId, VertexId)>,
}

impl PartialMapping {
    pub(crate) fn new(guest_vertices: usize, guest_edges: usize, host_vertices: usize, host_edges: usize) -> Self {
        Self {
            guest_to_host_vertex: vec![None; guest_vertices],
            host_to_guest_vertex: vec![None; host_vertices],
            guest_to_host_edge: vec![None; guest_edges],
            host_to_guest_edge: vec![None; host_edges],
            bound_vertices: 0,
            bound_edges: 0,
            boundary: None,
        }
    }

    #[inline]
    pub(crate) fn host_of(&self, guest: VertexId) -> Option<VertexId> {
        self.guest_to_host_vertex[guest.index()]
    }

    #[inline]
    pub(crate) fn guest_of(&self, host: VertexId) -> Option<VertexId> {
        self.host_to_guest_vertex[host.index()]
    }

    #[inline]
    pub(crate) fn is_guest_edge_bound(&self, guest: EdgeId) -> bool {
        self.guest_to_host_edge[guest.index()].is_some()
    }

    #[inline]
    pub(crate) fn is_host_edge_bound(&self, host: EdgeId) -> bool {
        self.host_to_guest_edge[host.index()].is_some()
    }

    #[inline]
    pub(crate) fn boundary(&self) -> Option<(VertexId, VertexId)> {
        self.boundary
    }

    /// Every guest vertex and every guest edge is bound.
    pub(crate) fn is_complete(&self) -> bool {
        self.bound_vertices == self.guest_to_host_vertex.len()
            && self.bound_edges == self.guest_to_host_edge.len()
    }

    /// Starts recording bindings for one search depth.
    pub(crate) fn begin(&self) -> Undo {
        Undo {
            bindings: Vec::new(),
            boundary: self.boundary,
        }
    }

    pub(crate) fn bind_vertex(&mut self, undo: &mut Undo, guest: VertexId, host: VertexId) {
        debug_assert!(self.host_of(guest).is_none() && self.guest_of(host).is_none());
        self.guest_to_host_vertex[guest.index()] = Some(host);
        self.host_to_guest_vertex[host.index()] = Some(guest);
        self.bound_vertices += 1;
        self.boundary = Some((guest, host));
        undo.bindings.push(Binding::Vertex(guest));
    }

    pub(crate) fn bind_edge(&mut self, undo: &mut Undo, guest: EdgeId, host: EdgeId) {
        debug_assert!(!self.is_guest_edge_bound(guest) && !self.is_host_edge_bound(host));
        self.guest_to_host_edge[guest.index()] = Some(host);
        self.host_to_guest_edge[host.index()] = Some(guest);
        self.bound_edges += 1;
        undo.bindings.push(Binding::Edge(guest));
    }

    /// Reverts exactly the bindings recorded in `undo`, newest first.
    pub(crate) fn revert(&mut self, undo: Undo) {
        for binding in undo.bindings.into_iter().rev() {
            match binding {
                Binding::Vertex(guest) => {
                    if let Some(host) = self.guest_to_host_vertex[guest.index()].take() {
                        self.host_to_guest_vertex[host.index()] = None;
                        self.bound_vertices -= 1;
                    }
                }
                Binding::Edge(guest) => {
                    if let Some(host) = self.guest_to_host_edge[guest.index()].take() {
                        self.host_to_guest_edge[host.index()] = None;
                        self.bound_edges -= 1;
                    }
                }
            }
        }
        self.boundary = undo.boundary;
    }

    fn vertex_pairs(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.guest_to_host_vertex
            .iter()
            .enumerate()
            .filter_map(|(g, h)| h.map(|h| (VertexId::new(g as u32), h)))
    }

    fn edge_pairs(&self) -> impl Iterator<Item = (EdgeId, EdgeId)> + '_ {
        self.guest_to_host_edge
            .iter()
            .enumerate()
            .filter_map(|(g, h)| h.map(|h| (EdgeId::new(g as u32), h)))
    }

    /// Content key of the current state: independent of binding order.
    pub(crate) fn state_key(&self) -> HashValue {
        HashValue::of_pairs(
            DOMAIN_SEARCH_STATE_V0,
            self.vertex_pairs().map(|(g, h)| (g.as_u32(), h.as_u32())),
            self.edge_pairs().map(|(g, h)| (g.as_u32(), h.as_u32())),
        )
    }

    pub(crate) fn to_mapping(&self) -> Mapping {
        Mapping {
            vertices: self.vertex_pairs().collect(),
            edges: self.edge_pairs().collect(),
        }
    }
}

/// One occurrence of the guest inside the host.
///
/// Maps every guest vertex and every guest edge to its host counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Mapping {
    vertices: BTreeMap<VertexId, VertexId>,
    edges: BTreeMap<EdgeId, EdgeId>,
}

impl Mapping {
    /// Host vertex bound to `guest`.
    pub fn host_vertex(&self, guest: VertexId) -> Option<VertexId> {
        self.vertices.get(&guest).copied()
    }

    /// Host edge bound to `guest`.
    pub fn host_edge(&self, guest: EdgeId) -> Option<EdgeId> {
        self.edges.get(&guest).copied()
    }

    /// Vertex pairs `(guest, host)` in guest order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.vertices.iter().map(|(&g, &h)| (g, h))
    }

    /// Edge pairs `(guest, host)` in guest order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, EdgeId)> + '_ {
        self.edges.iter().map(|(&g, &h)| (g, h))
    }

    /// Stable content fingerprint of this mapping.
    pub fn fingerprint(&self) -> HashValue {
        HashValue::of_pairs(
            DOMAIN_MAPPING_V0,
            self.vertices().map(|(g, h)| (g.as_u32(), h.as_u32())),
            self.edges().map(|(g, h)| (g.as_u32(), h.as_u32())),
        )
    }
}
