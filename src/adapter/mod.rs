//! Translation of store models into matcher graphs.
//!
//! A model is identified by a root element; its members are the elements
//! attached to the root through the dictionary convention, each named by the
//! key it was found under. Every member becomes one matcher vertex. Store
//! edges are members like any other element, so an edge `(s, t)` turns into a
//! vertex of kind [`VertexKind::Edge`] with two matcher edges,
//! `s → edge` and `edge → t`. Edges of edges therefore become plain vertex
//! adjacency.
//!
//! Typing and model references are not stored in the graph itself; they come
//! from a [`ModelServices`] implementation and are copied onto each vertex so
//! predicates can reject mismatches without touching the store.

mod names;
mod predicates;
mod services;

pub use names::{ModelMatcher, NameMapping, NameMatches, NamePivot};
pub use predicates::{submodel_occurs, ExactValue, NestedTyped, TypedValue, MAX_NESTING_DEPTH};
pub use services::{ModelServices, TypeTable, Untyped};

use crate::core::{ElementId, Value};
use crate::matcher::{MatchError, MatchGraph, VertexId};
use crate::store::GraphStore;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors raised by the adapter layer.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The model root does not exist in the store.
    #[error("model root {0} does not exist")]
    MissingModel(ElementId),
    /// A pivot names an element that is not a member of the model.
    #[error("{side} model has no member named {name:?}")]
    UnknownName { side: &'static str, name: String },
    /// Nested sub-model matching recursed past [`MAX_NESTING_DEPTH`].
    #[error("sub-model nesting deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Whether a vertex stands for a store node or a store edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    Node,
    Edge,
}

/// Matcher vertex payload describing one model member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementVertex {
    /// Key the member was found under. Debugging metadata; predicates are free
    /// to ignore it.
    pub name: String,
    pub element: ElementId,
    pub kind: VertexKind,
    /// Node value, `None` for structural nodes and edges.
    pub value: Option<Value>,
    /// Type assigned by the services layer.
    pub type_name: Option<String>,
    /// Root of a separate model this member refers to. Such members are not
    /// flattened; nested matching is left to the predicate.
    pub model_ref: Option<ElementId>,
}

impl ElementVertex {
    pub fn is_edge(&self) -> bool {
        self.kind == VertexKind::Edge
    }
}

/// A model flattened into a matcher graph.
#[derive(Debug, Clone)]
pub struct ModelGraph {
    root: ElementId,
    graph: MatchGraph<ElementVertex>,
    by_name: IndexMap<String, VertexId>,
    by_element: HashMap<ElementId, VertexId>,
}

impl ModelGraph {
    /// Builds the matcher graph of the model rooted at `root`.
    ///
    /// Vertices are created in key order (first attachment first). An element
    /// attached under several keys yields a single vertex named after the
    /// first key; every key still resolves to it.
    pub fn build<S>(store: &GraphStore, root: ElementId, services: &S) -> Result<Self, AdapterError>
    where
        S: ModelServices + ?Sized,
    {
        let entries = store.read_dict_entries(root).ok_or(AdapterError::MissingModel(root))?;

        let mut graph = MatchGraph::new();
        let mut by_name = IndexMap::new();
        let mut by_element = HashMap::new();
        let mut edge_members = Vec::new();

        for (key, element_id) in entries {
            if let Some(&existing) = by_element.get(&element_id) {
                debug!(%root, key = %key, %element_id, "member attached under several keys");
                by_name.insert(key, existing);
                continue;
            }
            let Some(element) = store.element(element_id) else {
                continue;
            };
            let kind = if element.is_edge() {
                VertexKind::Edge
            } else {
                VertexKind::Node
            };
            let vertex = graph.add_vertex(ElementVertex {
                name: key.clone(),
                element: element_id,
                kind,
                value: element.value().cloned(),
                type_name: services.type_of(store, element_id),
                model_ref: services.model_ref(store, element_id),
            });
            trace!(%root, key = %key, %element_id, %vertex, "model member");
            if let Some(endpoints) = element.endpoints() {
                edge_members.push((vertex, endpoints));
            }
            by_name.insert(key, vertex);
            by_element.insert(element_id, vertex);
        }

        for (vertex, (source, target)) in edge_members {
            match by_element.get(&source) {
                Some(&s) => {
                    graph.add_edge(s, vertex);
                }
                None => trace!(%root, %source, "edge source outside model, skipped"),
            }
            match by_element.get(&target) {
                Some(&t) => {
                    graph.add_edge(vertex, t);
                }
                None => trace!(%root, %target, "edge target outside model, skipped"),
            }
        }

        debug!(
            %root,
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "model graph built"
        );
        Ok(Self {
            root,
            graph,
            by_name,
            by_element,
        })
    }

    /// Root element of the model.
    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn graph(&self) -> &MatchGraph<ElementVertex> {
        &self.graph
    }

    pub fn vertex(&self, id: VertexId) -> Option<&ElementVertex> {
        self.graph.vertex(id)
    }

    /// Vertex of the member named `name`.
    pub fn vertex_by_name(&self, name: &str) -> Option<VertexId> {
        self.by_name.get(name).copied()
    }

    /// Vertex standing for store element `element`.
    pub fn vertex_of(&self, element: ElementId) -> Option<VertexId> {
        self.by_element.get(&element).copied()
    }

    pub fn name_of(&self, id: VertexId) -> Option<&str> {
        self.vertex(id).map(|v| v.name.as_str())
    }

    /// Number of member vertices.
    pub fn len(&self) -> usize {
        self.graph.vertex_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.vertex_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Model with nodes `a = 1`, `b` and an edge `ab = (a, b)`.
    fn small_model(store: &mut GraphStore) -> (ElementId, [ElementId; 3]) {
        let root = store.create_node();
        let a = store.create_value_node(1_i64).unwrap();
        let b = store.create_node();
        let ab = store.create_edge(a, b).unwrap();
        store.create_dict(root, "a", a).unwrap();
        store.create_dict(root, "b", b).unwrap();
        store.create_dict(root, "ab", ab).unwrap();
        (root, [a, b, ab])
    }

    #[test]
    fn members_become_vertices() {
        let mut store = GraphStore::new();
        let (root, [a, b, ab]) = small_model(&mut store);
        let model = ModelGraph::build(&store, root, &Untyped).unwrap();

        assert_eq!(model.len(), 3);
        let va = model.vertex_by_name("a").unwrap();
        let vab = model.vertex_by_name("ab").unwrap();
        assert_eq!(model.vertex_of(a), Some(va));
        assert_eq!(model.vertex_of(b), model.vertex_by_name("b"));
        assert_eq!(model.vertex(va).unwrap().value, Some(Value::Integer(1)));
        assert_eq!(model.vertex(vab).unwrap().kind, VertexKind::Edge);
        assert_eq!(model.vertex(vab).unwrap().element, ab);
        assert_eq!(model.name_of(vab), Some("ab"));
    }

    #[test]
    fn store_edges_split_into_two_matcher_edges() {
        let mut store = GraphStore::new();
        let (root, _) = small_model(&mut store);
        let model = ModelGraph::build(&store, root, &Untyped).unwrap();
        let graph = model.graph();
        let va = model.vertex_by_name("a").unwrap();
        let vb = model.vertex_by_name("b").unwrap();
        let vab = model.vertex_by_name("ab").unwrap();

        assert_eq!(graph.edge_count(), 2);
        let edges: Vec<_> = graph.edge_ids().filter_map(|e| graph.edge(e)).collect();
        assert_eq!(edges, vec![(va, vab), (vab, vb)]);
    }

    #[test]
    fn edges_of_edges_become_adjacency() {
        let mut store = GraphStore::new();
        let (root, [_, b, ab]) = small_model(&mut store);
        let meta = store.create_edge(ab, b).unwrap();
        store.create_dict(root, "meta", meta).unwrap();
        let model = ModelGraph::build(&store, root, &Untyped).unwrap();

        let vab = model.vertex_by_name("ab").unwrap();
        let vmeta = model.vertex_by_name("meta").unwrap();
        assert!(model
            .graph()
            .outgoing(vab)
            .iter()
            .any(|&e| model.graph().edge(e) == Some((vab, vmeta))));
        assert_eq!(model.graph().edge_count(), 4);
    }

    #[test]
    fn endpoints_outside_model_are_skipped() {
        let mut store = GraphStore::new();
        let root = store.create_node();
        let inside = store.create_node();
        let outside = store.create_node();
        let edge = store.create_edge(inside, outside).unwrap();
        store.create_dict(root, "inside", inside).unwrap();
        store.create_dict(root, "edge", edge).unwrap();
        let model = ModelGraph::build(&store, root, &Untyped).unwrap();

        assert_eq!(model.len(), 2);
        assert_eq!(model.graph().edge_count(), 1);
    }

    #[test]
    fn missing_root_is_an_error() {
        let store = GraphStore::new();
        let err = ModelGraph::build(&store, ElementId::new(99), &Untyped).unwrap_err();
        assert!(matches!(err, AdapterError::MissingModel(id) if id == ElementId::new(99)));
    }

    #[test]
    fn empty_model() {
        let mut store = GraphStore::new();
        let root = store.create_node();
        let model = ModelGraph::build(&store, root, &Untyped).unwrap();
        assert!(model.is_empty());
        assert_eq!(model.root(), root);
    }

    #[test]
    fn aliased_member_has_one_vertex() {
        let mut store = GraphStore::new();
        let root = store.create_node();
        let x = store.create_node();
        store.create_dict(root, "first", x).unwrap();
        store.create_dict(root, "second", x).unwrap();
        let model = ModelGraph::build(&store, root, &Untyped).unwrap();

        assert_eq!(model.len(), 1);
        assert_eq!(model.vertex_by_name("first"), model.vertex_by_name("second"));
        assert_eq!(model.name_of(model.vertex_of(x).unwrap()), Some("first"));
    }

    #[test]
    fn repeated_key_keeps_first_member() {
        let mut store = GraphStore::new();
        let root = store.create_node();
        let first = store.create_node();
        let second = store.create_node();
        store.create_dict(root, "k", first).unwrap();
        store.create_dict(root, "k", second).unwrap();
        let model = ModelGraph::build(&store, root, &Untyped).unwrap();

        assert_eq!(model.len(), 1);
        assert_eq!(model.vertex_by_name("k"), model.vertex_of(first));
        assert_eq!(model.vertex_of(second), None);
    }

    #[test]
    fn large_model_builds_every_member() {
        const MEMBERS: usize = 20_000;
        let mut store = GraphStore::new();
        let root = store.create_node();
        let mut previous = None;
        for i in 0..MEMBERS {
            let node = store.create_value_node(i as i64).unwrap();
            store.create_dict(root, &format!("n{i}"), node).unwrap();
            if let Some(prev) = previous {
                let edge = store.create_edge(prev, node).unwrap();
                store.create_dict(root, &format!("e{i}"), edge).unwrap();
            }
            previous = Some(node);
        }
        let model = ModelGraph::build(&store, root, &Untyped).unwrap();

        assert_eq!(model.len(), 2 * MEMBERS - 1);
        assert_eq!(model.graph().edge_count(), 2 * (MEMBERS - 1));
        let last = model.vertex(model.vertex_by_name("n19999").unwrap()).unwrap();
        assert_eq!(last.value, Some(Value::Integer(19_999)));
        assert_eq!(model.name_of(VertexId::new(0)), Some("n0"));
    }

    #[test]
    fn services_metadata_is_attached() {
        let mut store = GraphStore::new();
        let (root, [a, b, _]) = small_model(&mut store);
        let sub = store.create_node();
        let services = TypeTable::new().with_type(a, "Place").with_model_ref(b, sub);
        let model = ModelGraph::build(&store, root, &services).unwrap();

        let va = model.vertex(model.vertex_by_name("a").unwrap()).unwrap();
        let vb = model.vertex(model.vertex_by_name("b").unwrap()).unwrap();
        assert_eq!(va.type_name.as_deref(), Some("Place"));
        assert_eq!(va.model_ref, None);
        assert_eq!(vb.model_ref, Some(sub));
    }
}
