//! Labeled lookup ("dictionary") convention on top of plain elements.
//!
//! Attaching key `k` with value element `v` to `src` creates three elements:
//!
//! ```text
//! src --e--> v
//!      |
//!      +--(e, key)--> "k"
//! ```
//!
//! i.e. an edge `e = (src, v)`, a string node holding `k`, and an edge from
//! `e` to that key node. Nothing prevents attaching the same key twice; forward
//! reads then resolve to the first-created entry, reverse reads return all.

use super::GraphStore;
use crate::core::{ElementId, Value};
use indexmap::IndexMap;
use tracing::debug;

impl GraphStore {
    /// Attaches `target` to `src` under string `key`.
    ///
    /// Returns the connecting edge `(src, target)`, or `None` if `src` or
    /// `target` does not exist; on failure nothing is created.
    pub fn create_dict(&mut self, src: ElementId, key: &str, target: ElementId) -> Option<ElementId> {
        if !self.contains(src) || !self.contains(target) {
            return None;
        }
        let edge = self.create_edge(src, target)?;
        // The remaining creations only fail once ids run out; roll back then.
        let Some(key_node) = self.create_value_node(key) else {
            self.delete_edge(edge);
            return None;
        };
        if self.create_edge(edge, key_node).is_none() {
            self.delete_edge(edge);
            self.delete_node(key_node);
            return None;
        }
        Some(edge)
    }

    /// Attaches `target` to `src` under an arbitrary key element.
    ///
    /// Returns the connecting edge, or `None` if any of the three elements is
    /// absent.
    pub fn create_dict_node(&mut self, src: ElementId, key_node: ElementId, target: ElementId) -> Option<ElementId> {
        if !self.contains(src) || !self.contains(target) || !self.contains(key_node) {
            return None;
        }
        let edge = self.create_edge(src, target)?;
        if self.create_edge(edge, key_node).is_none() {
            self.delete_edge(edge);
            return None;
        }
        Some(edge)
    }

    /// Reads the element attached to `src` under `key`.
    pub fn read_dict(&self, src: ElementId, key: &str) -> Option<ElementId> {
        let edge = self.read_dict_edge(src, key)?;
        self.read_edge(edge).map(|(_, target)| target)
    }

    /// Reads the connecting edge attached to `src` under `key`.
    ///
    /// When the key was attached more than once, the first-created entry wins.
    pub fn read_dict_edge(&self, src: ElementId, key: &str) -> Option<ElementId> {
        let mut first = None;
        let mut ambiguous = false;
        for edge in self.outgoing_unordered(src)?.filter(|&edge| self.edge_has_key(edge, key)) {
            ambiguous |= first.is_some();
            first = Some(first.map_or(edge, |current: ElementId| current.min(edge)));
        }
        let first = first?;
        if ambiguous {
            debug!(%src, key, %first, "ambiguous dictionary key, using first entry");
        }
        Some(first)
    }

    /// Reads the element attached to `src` under the key element `key_node`.
    pub fn read_dict_node(&self, src: ElementId, key_node: ElementId) -> Option<ElementId> {
        let edge = self.read_dict_node_edge(src, key_node)?;
        self.read_edge(edge).map(|(_, target)| target)
    }

    /// Reads the connecting edge attached to `src` under the key element
    /// `key_node`.
    pub fn read_dict_node_edge(&self, src: ElementId, key_node: ElementId) -> Option<ElementId> {
        self.outgoing_unordered(src)?
            .filter(|&edge| self.key_targets(edge).any(|target| target == key_node))
            .min()
    }

    /// Reads every string key attached to `src`, deduplicated, in order of first
    /// attachment. `None` if `src` does not exist.
    pub fn read_dict_keys(&self, src: ElementId) -> Option<Vec<String>> {
        let entries = self.read_dict_entries(src)?;
        Some(entries.into_iter().map(|(key, _)| key).collect())
    }

    /// Reads every `(key, element)` entry attached to `src` in one pass.
    ///
    /// Keys are deduplicated in order of first attachment and each resolves
    /// the way [`read_dict`](Self::read_dict) would, to its first-created
    /// entry. `None` if `src` does not exist.
    pub fn read_dict_entries(&self, src: ElementId) -> Option<Vec<(String, ElementId)>> {
        let mut entries: IndexMap<String, ElementId> = IndexMap::new();
        for edge in self.read_outgoing(src)? {
            let Some((_, target)) = self.read_edge(edge) else {
                continue;
            };
            for key_node in self.key_targets(edge) {
                let Some(key) = self.read_value(key_node).flatten().and_then(Value::as_str) else {
                    continue;
                };
                if entries.contains_key(key) {
                    debug!(%src, key, "ambiguous dictionary key, using first entry");
                } else {
                    entries.insert(key.to_owned(), target);
                }
            }
        }
        Some(entries.into_iter().collect())
    }

    /// Reads every element that has `target` attached under `key`.
    ///
    /// `None` only if `target` does not exist.
    pub fn read_reverse_dict(&self, target: ElementId, key: &str) -> Option<Vec<ElementId>> {
        let sources = self
            .read_incoming(target)?
            .into_iter()
            .filter(|&edge| self.edge_has_key(edge, key))
            .filter_map(|edge| self.read_edge(edge).map(|(source, _)| source))
            .collect();
        Some(sources)
    }

    /// Targets of the edges leaving `edge`, i.e. its candidate key elements.
    fn key_targets(&self, edge: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.outgoing_unordered(edge)
            .into_iter()
            .flatten()
            .filter_map(move |label_edge| self.read_edge(label_edge).map(|(_, target)| target))
    }

    fn edge_has_key(&self, edge: ElementId, key: &str) -> bool {
        self.key_targets(edge)
            .any(|target| self.read_value(target).flatten().and_then(Value::as_str) == Some(key))
    }
}
