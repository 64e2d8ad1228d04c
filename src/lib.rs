//! Stratum: a multi-level graph model repository with sub-graph matching.
//!
//! This crate provides the lowest layers of a model-driven toolchain:
//! - A graph store whose edges are themselves elements, so edges can connect
//!   edges and one store can hold several meta-levels at once. Deletion
//!   cascades through every edge that used a deleted element.
//! - A dictionary convention for string-keyed lookup on top of plain elements;
//!   a model is a root element plus the members attached to it under keys.
//! - A VF2-style matcher that lazily enumerates every occurrence of a small
//!   guest graph inside a host graph, with a pluggable admission predicate.
//! - An adapter that flattens store models into matcher graphs and reports
//!   occurrences by member names.
//!
//! # References
//!
//! - Cordella, Foggia, Sansone, Vento. "A (sub)graph isomorphism algorithm for
//!   matching large graphs" (2004)
//!
//! # Example
//!
//! ```
//! use stratum::prelude::*;
//!
//! let mut store = GraphStore::new();
//! let host = store.create_node();
//! let a = store.create_value_node("start").unwrap();
//! let b = store.create_value_node("end").unwrap();
//! let ab = store.create_edge(a, b).unwrap();
//! store.create_dict(host, "a", a).unwrap();
//! store.create_dict(host, "b", b).unwrap();
//! store.create_dict(host, "ab", ab).unwrap();
//!
//! let guest = store.create_node();
//! let x = store.create_value_node("start").unwrap();
//! let y = store.create_node();
//! let xy = store.create_edge(x, y).unwrap();
//! store.create_dict(guest, "x", x).unwrap();
//! store.create_dict(guest, "y", y).unwrap();
//! store.create_dict(guest, "xy", xy).unwrap();
//!
//! let matcher = ModelMatcher::new(&store, host, guest, &Untyped).unwrap();
//! let found: Vec<_> = matcher
//!     .matches(TypedValue::new(&Untyped), &NamePivot::new())
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0]["x"], "a");
//! ```

pub mod adapter;
pub mod arena;
pub mod core;
pub mod fingerprint;
pub mod matcher;
pub mod store;

pub use crate::adapter::{AdapterError, ElementVertex, ModelGraph, ModelMatcher, ModelServices};
pub use crate::core::{Element, ElementId, ElementKind, Value};
pub use crate::matcher::{matches, Mapping, MatchError, MatchGraph, Pivot, Predicate};
pub use crate::store::GraphStore;

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::adapter::{
        submodel_occurs, AdapterError, ElementVertex, ExactValue, ModelGraph, ModelMatcher, ModelServices,
        NameMapping, NamePivot, NestedTyped, TypeTable, TypedValue, Untyped, VertexKind,
    };
    pub use crate::core::{Element, ElementId, ElementKind, Value};
    pub use crate::fingerprint::HashValue;
    pub use crate::matcher::{
        matches, matches_with, occurs, AnyVertex, EdgeId, Mapping, MatchError, MatchGraph, MatchOptions, Pivot,
        Predicate, PredicateError, VertexId,
    };
    pub use crate::store::GraphStore;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::collections::BTreeSet;

    /// Shapes fixture: a triangle pointing at two squares, each square in a
    /// bidirectional pair with its circles, plus one circle-to-circle edge.
    ///
    /// ```text
    /// triangle -> square1 <-> circle3
    ///          |          <-> circle4
    ///          -> square2 <-> circle5
    /// circle3 -> circle4
    /// ```
    fn shapes(store: &mut GraphStore, services: TypeTable) -> (ElementId, TypeTable) {
        let root = store.create_node();
        let kinds = ["triangle", "square", "square", "circle", "circle", "circle"];
        let mut services = services;
        let mut nodes = Vec::new();
        for (i, kind) in kinds.iter().enumerate() {
            let node = store.create_node();
            store.create_dict(root, &format!("{kind}{i}"), node).unwrap();
            services = services.with_type(node, *kind);
            nodes.push(node);
        }
        let pairs = [(0, 1), (0, 2), (1, 3), (3, 1), (1, 4), (4, 1), (2, 5), (5, 2), (3, 4)];
        for (s, t) in pairs {
            let edge = store.create_edge(nodes[s], nodes[t]).unwrap();
            store.create_dict(root, &format!("e{s}{t}"), edge).unwrap();
        }
        (root, services)
    }

    /// Guest: a square and a circle pointing at each other.
    fn square_circle(store: &mut GraphStore, services: TypeTable) -> (ElementId, TypeTable) {
        let root = store.create_node();
        let square = store.create_node();
        let circle = store.create_node();
        let there = store.create_edge(square, circle).unwrap();
        let back = store.create_edge(circle, square).unwrap();
        store.create_dict(root, "sq", square).unwrap();
        store.create_dict(root, "ci", circle).unwrap();
        store.create_dict(root, "there", there).unwrap();
        store.create_dict(root, "back", back).unwrap();
        let services = services.with_type(square, "square").with_type(circle, "circle");
        (root, services)
    }

    #[test]
    fn shapes_scenario_through_adapter() {
        let mut store = GraphStore::new();
        let (host, services) = shapes(&mut store, TypeTable::new());
        let (guest, services) = square_circle(&mut store, services);

        let matcher = ModelMatcher::new(&store, host, guest, &services).unwrap();
        let found: Vec<_> = matcher
            .matches(TypedValue::new(&services), &NamePivot::new())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        let pairs: BTreeSet<_> = found
            .iter()
            .map(|m| (m["sq"].clone(), m["ci"].clone()))
            .collect();
        assert_eq!(
            pairs,
            BTreeSet::from([
                ("square1".to_owned(), "circle3".to_owned()),
                ("square1".to_owned(), "circle4".to_owned()),
                ("square2".to_owned(), "circle5".to_owned()),
            ])
        );
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn supertypes_widen_the_scenario() {
        let mut store = GraphStore::new();
        let (host, services) = shapes(&mut store, TypeTable::new());
        // A guest "shape" pair admits every bidirectional pair in either
        // orientation.
        let root = store.create_node();
        let p = store.create_node();
        let q = store.create_node();
        let pq = store.create_edge(p, q).unwrap();
        let qp = store.create_edge(q, p).unwrap();
        for (key, element) in [("p", p), ("q", q), ("pq", pq), ("qp", qp)] {
            store.create_dict(root, key, element).unwrap();
        }
        let services = services
            .with_type(p, "shape")
            .with_type(q, "shape")
            .with_supertype("square", "shape")
            .with_supertype("circle", "shape");

        let matcher = ModelMatcher::new(&store, host, root, &services).unwrap();
        let count = matcher
            .matches(TypedValue::new(&services), &NamePivot::new())
            .unwrap()
            .count();
        assert_eq!(count, 6);
    }

    #[test]
    fn deleting_a_member_shrinks_the_model() {
        let mut store = GraphStore::new();
        let (host, services) = shapes(&mut store, TypeTable::new());
        let (guest, services) = square_circle(&mut store, services);

        // Removing circle5 also removes its edges and dictionary entries.
        let circle5 = store.read_dict(host, "circle5").unwrap();
        assert!(store.delete_node(circle5) > 1);
        assert_eq!(store.read_dict(host, "circle5"), None);
        assert_eq!(store.read_dict(host, "e25"), None);

        let matcher = ModelMatcher::new(&store, host, guest, &services).unwrap();
        assert_eq!(matcher.host().len(), 5 + 7);
        let count = matcher
            .matches(TypedValue::new(&services), &NamePivot::new())
            .unwrap()
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn mapping_fingerprints_are_stable() {
        let mut host: MatchGraph<()> = MatchGraph::new();
        let a = host.add_vertex(());
        let b = host.add_vertex(());
        host.add_edge(a, b).unwrap();
        let guest = host.clone();

        let first: Vec<Mapping> = matches(&host, &guest, AnyVertex, &Pivot::new())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        let second: Vec<Mapping> = matches(&host, &guest, AnyVertex, &Pivot::new())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].fingerprint(), second[0].fingerprint());
        assert_ne!(first[0].fingerprint(), HashValue::zero());
    }
}
