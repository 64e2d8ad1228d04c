//! Name-level matching between two models.

use super::{AdapterError, ElementVertex, ModelGraph, ModelServices};
use crate::core::ElementId;
use crate::matcher::{self, MatchOptions, Matches, Pivot, Predicate};
use crate::store::GraphStore;
use indexmap::IndexMap;

/// Guest member name → host member name.
pub type NamePivot = IndexMap<String, String>;

/// One occurrence expressed by member names, guest name → host name.
pub type NameMapping = IndexMap<String, String>;

/// Matches a guest model against a host model by member names.
#[derive(Debug, Clone)]
pub struct ModelMatcher {
    host: ModelGraph,
    guest: ModelGraph,
}

impl ModelMatcher {
    /// Builds the matcher graphs of both models.
    pub fn new<S>(store: &GraphStore, host_root: ElementId, guest_root: ElementId, services: &S) -> Result<Self, AdapterError>
    where
        S: ModelServices + ?Sized,
    {
        Ok(Self {
            host: ModelGraph::build(store, host_root, services)?,
            guest: ModelGraph::build(store, guest_root, services)?,
        })
    }

    pub fn host(&self) -> &ModelGraph {
        &self.host
    }

    pub fn guest(&self) -> &ModelGraph {
        &self.guest
    }

    /// Resolves a name pivot to a vertex pivot, keeping its order.
    pub fn resolve_pivot(&self, pivot: &NamePivot) -> Result<Pivot, AdapterError> {
        pivot
            .iter()
            .map(|(guest_name, host_name)| {
                let guest = self.guest.vertex_by_name(guest_name).ok_or_else(|| AdapterError::UnknownName {
                    side: "guest",
                    name: guest_name.clone(),
                })?;
                let host = self.host.vertex_by_name(host_name).ok_or_else(|| AdapterError::UnknownName {
                    side: "host",
                    name: host_name.clone(),
                })?;
                Ok((guest, host))
            })
            .collect()
    }

    /// Lazily enumerates every occurrence of the guest model in the host model.
    pub fn matches<P>(&self, predicate: P, pivot: &NamePivot) -> Result<NameMatches<'_, P>, AdapterError>
    where
        P: Predicate<ElementVertex>,
    {
        self.matches_with(predicate, pivot, MatchOptions::default())
    }

    pub fn matches_with<P>(
        &self,
        predicate: P,
        pivot: &NamePivot,
        options: MatchOptions,
    ) -> Result<NameMatches<'_, P>, AdapterError>
    where
        P: Predicate<ElementVertex>,
    {
        let pivot = self.resolve_pivot(pivot)?;
        let inner = matcher::matches_with(self.host.graph(), self.guest.graph(), predicate, &pivot, options)?;
        Ok(NameMatches {
            inner,
            host: &self.host,
            guest: &self.guest,
        })
    }
}

/// Occurrences of a guest model, translated to member names.
pub struct NameMatches<'m, P> {
    inner: Matches<'m, ElementVertex, (), P>,
    host: &'m ModelGraph,
    guest: &'m ModelGraph,
}

impl<'m, P> NameMatches<'m, P> {
    fn translate(&self, mapping: &matcher::Mapping) -> NameMapping {
        mapping
            .vertices()
            .filter_map(|(g, h)| {
                let guest = self.guest.name_of(g)?;
                let host = self.host.name_of(h)?;
                Some((guest.to_owned(), host.to_owned()))
            })
            .collect()
    }
}

impl<'m, P> Iterator for NameMatches<'m, P>
where
    P: Predicate<ElementVertex>,
{
    type Item = Result<NameMapping, AdapterError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        Some(item.map(|mapping| self.translate(&mapping)).map_err(AdapterError::from))
    }
}

impl<'m, P> std::iter::FusedIterator for NameMatches<'m, P> where P: Predicate<ElementVertex> {}
