//! Sub-graph pattern matching.
//!
//! Finds every occurrence of a small guest (pattern) graph inside a larger
//! host graph. An occurrence is an injective mapping of guest vertices and
//! guest edges onto host vertices and host edges such that edge endpoints
//! correspond and the caller's [`Predicate`] accepts every bound pair. Host
//! edges with no guest counterpart are allowed (monomorphism, not induced
//! isomorphism).
//!
//! # Example
//!
//! ```
//! use stratum::matcher::{matches, MatchGraph, Pivot};
//!
//! let mut host: MatchGraph<()> = MatchGraph::new();
//! let h: Vec<_> = (0..3).map(|_| host.add_vertex(())).collect();
//! host.add_edge(h[0], h[1]);
//! host.add_edge(h[1], h[2]);
//!
//! let mut guest: MatchGraph<()> = MatchGraph::new();
//! let a = guest.add_vertex(());
//! let b = guest.add_vertex(());
//! guest.add_edge(a, b);
//!
//! let found: Vec<_> = matches(&host, &guest, |_: &(), _: &()| true, &Pivot::new())
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(found.len(), 2);
//! ```

pub mod graph;
pub mod predicate;
pub mod state;
pub mod vf2;

pub use graph::{EdgeId, MatchGraph, VertexId};
pub use predicate::{AnyVertex, Predicate, PredicateError};
pub use state::Mapping;
pub use vf2::Matches;

use indexmap::IndexMap;
use state::PartialMapping;
use thiserror::Error;

/// Pre-seeded guest→host vertex bindings, applied in insertion order.
///
/// The last pair becomes the search boundary.
pub type Pivot = IndexMap<VertexId, VertexId>;

/// Errors raised while setting up or running a match.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The pivot does not describe a valid partial mapping.
    #[error("pivot binds guest vertex {guest} to host vertex {host}: {reason}")]
    InvalidPivot {
        guest: VertexId,
        host: VertexId,
        reason: &'static str,
    },
    /// The predicate failed; the search was aborted.
    #[error("predicate failed: {0}")]
    Predicate(#[source] PredicateError),
}

/// Search knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Stop after this many mappings.
    pub limit: Option<usize>,
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the search after `limit` mappings.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Lazily enumerates every occurrence of `guest` in `host`.
///
/// Fails up front only if `pivot` is not a valid partial mapping; predicate
/// failures surface as an `Err` item from the returned iterator.
pub fn matches<'g, V, E, P>(
    host: &'g MatchGraph<V, E>,
    guest: &'g MatchGraph<V, E>,
    predicate: P,
    pivot: &Pivot,
) -> Result<Matches<'g, V, E, P>, MatchError>
where
    P: Predicate<V, E>,
{
    matches_with(host, guest, predicate, pivot, MatchOptions::default())
}

/// Like [`matches`], with explicit [`MatchOptions`].
pub fn matches_with<'g, V, E, P>(
    host: &'g MatchGraph<V, E>,
    guest: &'g MatchGraph<V, E>,
    predicate: P,
    pivot: &Pivot,
    options: MatchOptions,
) -> Result<Matches<'g, V, E, P>, MatchError>
where
    P: Predicate<V, E>,
{
    let mut state = PartialMapping::new(
        guest.vertex_count(),
        guest.edge_count(),
        host.vertex_count(),
        host.edge_count(),
    );
    let mut seed = state.begin();
    for (&g, &h) in pivot {
        let invalid = |reason| MatchError::InvalidPivot { guest: g, host: h, reason };
        if g.index() >= guest.vertex_count() {
            return Err(invalid("unknown guest vertex"));
        }
        if h.index() >= host.vertex_count() {
            return Err(invalid("unknown host vertex"));
        }
        if state.guest_of(h).is_some() {
            return Err(invalid("host vertex already bound"));
        }
        state.bind_vertex(&mut seed, g, h);
    }
    Ok(Matches::new(host, guest, predicate, options, state))
}

/// Returns `true` if `guest` occurs at least once in `host`.
pub fn occurs<V, E, P>(host: &MatchGraph<V, E>, guest: &MatchGraph<V, E>, predicate: P) -> Result<bool, MatchError>
where
    P: Predicate<V, E>,
{
    let mut found = matches_with(host, guest, predicate, &Pivot::new(), MatchOptions::new().with_limit(1))?;
    found.next().transpose().map(|first| first.is_some())
}
