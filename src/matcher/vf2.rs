//! VF2-style backtracking search, driven lazily from `Iterator::next`.
//!
//! The recursion of the classic formulation is flattened into an explicit
//! stack of frames. Each frame owns the candidate extensions computed for one
//! search state and the undo record of the candidate currently applied, so
//! pulling the next mapping resumes exactly where the previous pull stopped.
//!
//! # Extension order
//! 1. Along the boundary: the boundary guest vertex's first unbound outgoing
//!    edge against every unbound host edge leaving the boundary host vertex;
//!    failing that, its first unbound incoming edge.
//! 2. Re-anchoring: the first bound guest vertex (in guest order) that still
//!    has an unbound incident edge.
//! 3. Least preferred: the first unbound guest vertex against every unbound
//!    host vertex. Only reached when no bound vertex has unbound edges, which
//!    covers disconnected patterns.
//!
//! Exactly one guest element is extended per depth, so sibling branches differ
//! in that element's binding. Visited states are still memoized by content.
//!
//! # Citations
//! - Cordella et al., "A (sub)graph isomorphism algorithm for matching large graphs" (2004)

use super::graph::{EdgeId, MatchGraph, VertexId};
use super::predicate::Predicate;
use super::state::{Mapping, PartialMapping, Undo};
use super::{MatchError, MatchOptions};
use crate::fingerprint::HashValue;
use std::collections::HashSet;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extension {
    Edge { guest: EdgeId, host: EdgeId },
    Vertex { guest: VertexId, host: VertexId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Outgoing,
    Incoming,
}

#[derive(Debug)]
struct Frame {
    candidates: Vec<Extension>,
    next: usize,
    applied: Option<Undo>,
}

impl Frame {
    fn new(candidates: Vec<Extension>) -> Self {
        Self {
            candidates,
            next: 0,
            applied: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Fresh,
    Running,
    Done,
}

/// Lazy sequence of every occurrence of a guest graph in a host graph.
///
/// Created by [`matches`](super::matches). Not restartable; it ends for good
/// after exhaustion, after the configured limit, or after yielding an error.
/// The graphs are borrowed for the iterator's lifetime, so neither can change
/// mid-search.
pub struct Matches<'g, V, E, P> {
    host: &'g MatchGraph<V, E>,
    guest: &'g MatchGraph<V, E>,
    predicate: P,
    options: MatchOptions,
    state: PartialMapping,
    stack: Vec<Frame>,
    visited: HashSet<HashValue>,
    emitted: usize,
    status: Status,
}

impl<'g, V, E, P> Matches<'g, V, E, P>
where
    P: Predicate<V, E>,
{
    pub(super) fn new(
        host: &'g MatchGraph<V, E>,
        guest: &'g MatchGraph<V, E>,
        predicate: P,
        options: MatchOptions,
        state: PartialMapping,
    ) -> Self {
        debug!(
            guest_vertices = guest.vertex_count(),
            guest_edges = guest.edge_count(),
            host_vertices = host.vertex_count(),
            host_edges = host.edge_count(),
            "starting match"
        );
        Self {
            host,
            guest,
            predicate,
            options,
            state,
            stack: Vec::new(),
            visited: HashSet::new(),
            emitted: 0,
            status: if options.limit == Some(0) {
                Status::Done
            } else {
                Status::Fresh
            },
        }
    }

    /// Number of distinct search states reached so far.
    pub fn states_explored(&self) -> usize {
        self.visited.len()
    }

    /// Number of mappings yielded so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn finish(&mut self) {
        if self.status != Status::Done {
            debug!(
                emitted = self.emitted,
                states = self.visited.len(),
                "match exhausted"
            );
        }
        self.status = Status::Done;
        self.stack.clear();
    }

    fn emit(&mut self) -> Mapping {
        let mapping = self.state.to_mapping();
        self.emitted += 1;
        trace!(fingerprint = %mapping.fingerprint(), "emitting mapping");
        if self.options.limit.is_some_and(|limit| self.emitted >= limit) {
            self.finish();
        }
        mapping
    }

    /// Picks the guest edge to extend next, with the side it hangs off.
    fn next_guest_edge(&self) -> Option<(EdgeId, Direction)> {
        let unbound_edge_of = |vertex: VertexId| {
            let out = self.guest.outgoing(vertex).iter().copied();
            let inc = self.guest.incoming(vertex).iter().copied();
            out.map(|e| (e, Direction::Outgoing))
                .chain(inc.map(|e| (e, Direction::Incoming)))
                .find(|&(e, _)| !self.state.is_guest_edge_bound(e))
        };
        if let Some((guest, _)) = self.state.boundary() {
            if let Some(found) = unbound_edge_of(guest) {
                return Some(found);
            }
        }
        self.guest
            .vertex_ids()
            .filter(|&v| self.state.host_of(v).is_some())
            .find_map(unbound_edge_of)
    }

    /// Candidate extensions of the current state, in preference order.
    fn candidates(&self) -> Vec<Extension> {
        if let Some((guest_edge, direction)) = self.next_guest_edge() {
            let Some((source, target)) = self.guest.edge(guest_edge) else {
                return Vec::new();
            };
            let anchor = match direction {
                Direction::Outgoing => source,
                Direction::Incoming => target,
            };
            let Some(host_anchor) = self.state.host_of(anchor) else {
                return Vec::new();
            };
            let host_edges = match direction {
                Direction::Outgoing => self.host.outgoing(host_anchor),
                Direction::Incoming => self.host.incoming(host_anchor),
            };
            return host_edges
                .iter()
                .copied()
                .filter(|&h| !self.state.is_host_edge_bound(h))
                .map(|host| Extension::Edge { guest: guest_edge, host })
                .collect();
        }

        let Some(guest) = self.guest.vertex_ids().find(|&v| self.state.host_of(v).is_none()) else {
            return Vec::new();
        };
        self.host
            .vertex_ids()
            .filter(|&h| self.state.guest_of(h).is_none())
            .map(|host| Extension::Vertex { guest, host })
            .collect()
    }

    /// Admission test for binding guest vertex `guest` to host vertex `host`.
    fn admit_vertex(&self, guest: VertexId, host: VertexId) -> Result<bool, MatchError> {
        if self.state.guest_of(host).is_some() {
            return Ok(false);
        }
        if self.host.out_degree(host) < self.guest.out_degree(guest)
            || self.host.in_degree(host) < self.guest.in_degree(guest)
        {
            return Ok(false);
        }
        match (self.guest.vertex(guest), self.host.vertex(host)) {
            (Some(g), Some(h)) => self
                .predicate
                .compare_vertices(g, h)
                .map_err(MatchError::Predicate),
            _ => Ok(false),
        }
    }

    /// Binds one endpoint of an edge extension, reusing an existing binding.
    fn bind_endpoint(&mut self, undo: &mut Undo, guest: VertexId, host: VertexId) -> Result<bool, MatchError> {
        match self.state.host_of(guest) {
            Some(bound) => Ok(bound == host),
            None => {
                if self.admit_vertex(guest, host)? {
                    self.state.bind_vertex(undo, guest, host);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }
    }

    /// Applies `extension`; `Ok(None)` if it is not admissible.
    fn try_extend(&mut self, extension: Extension) -> Result<Option<Undo>, MatchError> {
        let mut undo = self.state.begin();
        let admitted = match extension {
            Extension::Vertex { guest, host } => self.bind_endpoint(&mut undo, guest, host),
            Extension::Edge { guest, host } => self.extend_edge(&mut undo, guest, host),
        };
        match admitted {
            Ok(true) => Ok(Some(undo)),
            Ok(false) => {
                self.state.revert(undo);
                Ok(None)
            }
            Err(err) => {
                self.state.revert(undo);
                Err(err)
            }
        }
    }

    fn extend_edge(&mut self, undo: &mut Undo, guest: EdgeId, host: EdgeId) -> Result<bool, MatchError> {
        let (Some((gs, gt)), Some((hs, ht))) = (self.guest.edge(guest), self.host.edge(host)) else {
            return Ok(false);
        };
        // Loops only map onto loops.
        if (gs == gt) != (hs == ht) {
            return Ok(false);
        }
        if let (Some(g), Some(h)) = (self.guest.edge_value(guest), self.host.edge_value(host)) {
            if !self.predicate.compare_edges(g, h).map_err(MatchError::Predicate)? {
                return Ok(false);
            }
        }
        if !self.bind_endpoint(undo, gs, hs)? || !self.bind_endpoint(undo, gt, ht)? {
            return Ok(false);
        }
        self.state.bind_edge(undo, guest, host);
        Ok(true)
    }

    /// Records the current state; `false` if it was reached before.
    fn mark_visited(&mut self) -> bool {
        self.visited.insert(self.state.state_key())
    }

    fn start(&mut self) -> Option<Mapping> {
        self.status = Status::Running;
        self.mark_visited();
        if self.state.is_complete() {
            // Nothing left to extend: the seed state is the only occurrence.
            let mapping = self.emit();
            self.finish();
            return Some(mapping);
        }
        let candidates = self.candidates();
        self.stack.push(Frame::new(candidates));
        None
    }
}

impl<'g, V, E, P> Iterator for Matches<'g, V, E, P>
where
    P: Predicate<V, E>,
{
    type Item = Result<Mapping, MatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.status {
            Status::Done => return None,
            Status::Fresh => {
                if let Some(mapping) = self.start() {
                    return Some(Ok(mapping));
                }
            }
            Status::Running => {}
        }

        loop {
            let Some(frame) = self.stack.last_mut() else {
                self.finish();
                return None;
            };
            if let Some(undo) = frame.applied.take() {
                self.state.revert(undo);
            }
            let Some(&extension) = frame.candidates.get(frame.next) else {
                self.stack.pop();
                continue;
            };
            frame.next += 1;

            let undo = match self.try_extend(extension) {
                Ok(Some(undo)) => undo,
                Ok(None) => continue,
                Err(err) => {
                    debug!(%err, "predicate failed, aborting match");
                    self.finish();
                    return Some(Err(err));
                }
            };
            if !self.mark_visited() {
                self.state.revert(undo);
                continue;
            }
            if let Some(frame) = self.stack.last_mut() {
                frame.applied = Some(undo);
            }
            if self.state.is_complete() {
                return Some(Ok(self.emit()));
            }
            let candidates = self.candidates();
            self.stack.push(Frame::new(candidates));
        }
    }
}

impl<'g, V, E, P> std::iter::FusedIterator for Matches<'g, V, E, P> where P: Predicate<V, E> {}
