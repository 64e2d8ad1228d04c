//! Typing and model-reference metadata supplied by the layer above the store.

use crate::core::ElementId;
use crate::store::GraphStore;
use std::collections::{HashMap, HashSet};

/// Services the adapter consults for per-element metadata.
///
/// The store itself knows nothing about types; a modeling layer on top of it
/// decides which element is an instance of which type and which elements point
/// at separate models.
pub trait ModelServices {
    /// Name of the type `element` is an instance of.
    fn type_of(&self, store: &GraphStore, element: ElementId) -> Option<String>;

    /// Root of the separate model `element` refers to, if any.
    fn model_ref(&self, store: &GraphStore, element: ElementId) -> Option<ElementId>;

    /// Returns `true` if `sub` is `sup` or one of its subtypes.
    fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        sub == sup
    }
}

/// No typing, no model references.
#[derive(Debug, Clone, Copy, Default)]
pub struct Untyped;

impl ModelServices for Untyped {
    fn type_of(&self, _store: &GraphStore, _element: ElementId) -> Option<String> {
        None
    }

    fn model_ref(&self, _store: &GraphStore, _element: ElementId) -> Option<ElementId> {
        None
    }
}

/// Explicit in-memory tables of types, supertypes and model references.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: HashMap<ElementId, String>,
    model_refs: HashMap<ElementId, ElementId>,
    supertypes: HashMap<String, Vec<String>>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `element` an instance of `type_name`.
    pub fn with_type(mut self, element: ElementId, type_name: impl Into<String>) -> Self {
        self.types.insert(element, type_name.into());
        self
    }

    /// Declares that `element` refers to the model rooted at `model_root`.
    pub fn with_model_ref(mut self, element: ElementId, model_root: ElementId) -> Self {
        self.model_refs.insert(element, model_root);
        self
    }

    /// Declares `sup` a direct supertype of `sub`.
    pub fn with_supertype(mut self, sub: impl Into<String>, sup: impl Into<String>) -> Self {
        self.supertypes.entry(sub.into()).or_default().push(sup.into());
        self
    }
}

impl ModelServices for TypeTable {
    fn type_of(&self, _store: &GraphStore, element: ElementId) -> Option<String> {
        self.types.get(&element).cloned()
    }

    fn model_ref(&self, _store: &GraphStore, element: ElementId) -> Option<ElementId> {
        self.model_refs.get(&element).copied()
    }

    fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        // Walk the supertype relation; cycles are tolerated.
        let mut seen = HashSet::new();
        let mut pending = vec![sub];
        while let Some(current) = pending.pop() {
            if current == sup {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(parents) = self.supertypes.get(current) {
                pending.extend(parents.iter().map(String::as_str));
            }
        }
        false
    }
}
