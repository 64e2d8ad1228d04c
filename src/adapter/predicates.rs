//! Predicates over [`ElementVertex`] payloads.

use super::{AdapterError, ElementVertex, ModelGraph, ModelServices};
use crate::core::ElementId;
use crate::matcher::{self, Predicate, PredicateError};
use crate::store::GraphStore;
use tracing::trace;

/// Limit on sub-model references followed by [`NestedTyped`].
pub const MAX_NESTING_DEPTH: usize = 16;

/// Same kind and equal values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactValue;

impl Predicate<ElementVertex> for ExactValue {
    fn compare_vertices(&self, guest: &ElementVertex, host: &ElementVertex) -> Result<bool, PredicateError> {
        Ok(guest.kind == host.kind && guest.value == host.value)
    }
}

/// Type check first, then value equality when the guest carries a value.
///
/// A typed guest vertex only admits host vertices whose type is the guest's
/// type or a subtype of it. Untyped or value-less guest vertices act as
/// wildcards on that axis.
#[derive(Debug)]
pub struct TypedValue<'s, S: ?Sized> {
    services: &'s S,
}

impl<S: ?Sized> Clone for TypedValue<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for TypedValue<'_, S> {}

impl<'s, S: ModelServices + ?Sized> TypedValue<'s, S> {
    pub fn new(services: &'s S) -> Self {
        Self { services }
    }

    fn admits(&self, guest: &ElementVertex, host: &ElementVertex) -> bool {
        if guest.kind != host.kind {
            return false;
        }
        if let Some(expected) = &guest.type_name {
            match &host.type_name {
                Some(actual) if self.services.is_subtype(actual, expected) => {}
                _ => return false,
            }
        }
        match &guest.value {
            Some(value) => host.value.as_ref() == Some(value),
            None => true,
        }
    }
}

impl<'s, S: ModelServices + ?Sized> Predicate<ElementVertex> for TypedValue<'s, S> {
    fn compare_vertices(&self, guest: &ElementVertex, host: &ElementVertex) -> Result<bool, PredicateError> {
        Ok(self.admits(guest, host))
    }
}

/// [`TypedValue`], plus a nested match for members that refer to sub-models.
///
/// When the guest vertex refers to a sub-model, the host vertex must refer to
/// one too, and the guest's sub-model must occur in the host's. The nested
/// match uses this same predicate one level deeper.
#[derive(Debug)]
pub struct NestedTyped<'s, S: ?Sized> {
    store: &'s GraphStore,
    typed: TypedValue<'s, S>,
    depth: usize,
}

impl<S: ?Sized> Clone for NestedTyped<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for NestedTyped<'_, S> {}

impl<'s, S: ModelServices + ?Sized> NestedTyped<'s, S> {
    pub fn new(store: &'s GraphStore, services: &'s S) -> Self {
        Self {
            store,
            typed: TypedValue::new(services),
            depth: 0,
        }
    }
}

impl<'s, S: ModelServices + ?Sized> Predicate<ElementVertex> for NestedTyped<'s, S> {
    fn compare_vertices(&self, guest: &ElementVertex, host: &ElementVertex) -> Result<bool, PredicateError> {
        if !self.typed.admits(guest, host) {
            return Ok(false);
        }
        let (Some(guest_model), host_model) = (guest.model_ref, host.model_ref) else {
            return Ok(true);
        };
        let Some(host_model) = host_model else {
            return Ok(false);
        };
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(AdapterError::NestingTooDeep(MAX_NESTING_DEPTH).into());
        }
        trace!(depth = self.depth, %guest_model, %host_model, "nested sub-model match");
        let nested = Self {
            depth: self.depth + 1,
            ..*self
        };
        submodel_occurs(self.store, self.typed.services, host_model, guest_model, nested).map_err(PredicateError::from)
    }
}

/// Returns `true` if the model rooted at `guest_root` occurs in the model
/// rooted at `host_root`.
///
/// The two models are matched independently of any enclosing search, which
/// makes this usable from inside a predicate.
pub fn submodel_occurs<S, P>(
    store: &GraphStore,
    services: &S,
    host_root: ElementId,
    guest_root: ElementId,
    predicate: P,
) -> Result<bool, AdapterError>
where
    S: ModelServices + ?Sized,
    P: Predicate<ElementVertex>,
{
    let host = ModelGraph::build(store, host_root, services)?;
    let guest = ModelGraph::build(store, guest_root, services)?;
    Ok(matcher::occurs(host.graph(), guest.graph(), predicate)?)
}
