//! Arena storage for store elements.
//!
//! Provides `ElementArena` (contiguous storage addressed by dense
//! `ElementId`s). Unlike a free-list arena, slots are never reused: a deleted
//! element leaves a tombstone so that its identifier stays dead forever.
//! An arena therefore holds at most `2^32` slots over its lifetime.
//!
//! # Determinism
//! - Identifiers are handed out in strictly increasing order.
//! - Iteration order over slots is by index, which is creation order.

use crate::core::ElementId;

/// Contiguous, append-only storage with tombstones.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementArena<T> {
    slots: Vec<Option<T>>,
    /// Number of live slots (`Some`).
    live_count: usize,
}

impl<T> ElementArena<T> {
    /// Creates a new empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            live_count: 0,
        }
    }

    /// Identifier of the slot at `index`; `None` past the `u32` id space.
    #[inline]
    fn slot_id(index: usize) -> Option<ElementId> {
        u32::try_from(index).ok().map(ElementId::new)
    }

    /// Allocates a new slot at the end and returns its `ElementId`.
    ///
    /// Returns `None` (and stores nothing) once all `2^32` identifiers have
    /// been handed out; ids are never recycled.
    pub fn allocate(&mut self, data: T) -> Option<ElementId> {
        let id = Self::slot_id(self.slots.len())?;
        self.slots.push(Some(data));
        self.live_count += 1;
        Some(id)
    }

    /// Tombstones the slot identified by `id` and returns its data.
    ///
    /// Returns `None` if the slot never existed or is already dead.
    pub fn deallocate(&mut self, id: ElementId) -> Option<T> {
        let data = self.slots.get_mut(id.index())?.take()?;
        self.live_count -= 1;
        Some(data)
    }

    /// Returns a reference to the data stored at `id`, if live.
    #[inline]
    pub fn get(&self, id: ElementId) -> Option<&T> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Returns a mutable reference to the data stored at `id`, if live.
    #[inline]
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut T> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Returns `true` if `id` refers to a live slot.
    #[inline]
    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of live slots.
    pub fn live_count(&self) -> usize {
        self.live_count
    }

    /// Iterates over live slots in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|data| (ElementId::new(idx as u32), data)))
    }
}

impl<T> Default for ElementArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_basic() {
        let mut arena: ElementArena<&'static str> = ElementArena::new();
        assert_eq!(arena.live_count(), 0);

        let id1 = arena.allocate("hello").unwrap();
        assert_eq!(id1.as_u32(), 0);
        assert_eq!(arena.get(id1), Some(&"hello"));

        let id2 = arena.allocate("world").unwrap();
        assert_eq!(id2.as_u32(), 1);
        assert_eq!(arena.live_count(), 2);

        assert_eq!(arena.deallocate(id1), Some("hello"));
        assert_eq!(arena.live_count(), 1);
        assert_eq!(arena.get(id1), None);
        assert_eq!(arena.deallocate(id1), None);

        // Dead slots are never handed out again.
        let id3 = arena.allocate("fresh").unwrap();
        assert_eq!(id3.as_u32(), 2);
        assert_eq!(arena.live_count(), 2);
    }

    #[test]
    fn deterministic_iteration() {
        let mut arena: ElementArena<i32> = ElementArena::new();
        let ids: Vec<_> = (0..5).map(|i| arena.allocate(i).unwrap()).collect();
        arena.deallocate(ids[1]);
        arena.deallocate(ids[3]);
        arena.allocate(100);
        let collected: Vec<_> = arena.iter().map(|(id, &val)| (id.as_u32(), val)).collect();
        assert_eq!(collected, vec![(0, 0), (2, 2), (4, 4), (5, 100)]);
    }

    #[test]
    fn out_of_range_is_absent() {
        let mut arena: ElementArena<()> = ElementArena::new();
        assert!(!arena.contains(ElementId::new(7)));
        assert_eq!(arena.deallocate(ElementId::new(7)), None);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn id_space_ends_at_u32_max() {
        let last = u32::MAX as usize;
        assert_eq!(ElementArena::<()>::slot_id(last), Some(ElementId::new(u32::MAX)));
        // One past the last id must not wrap around to slot 0.
        assert_eq!(ElementArena::<()>::slot_id(last + 1), None);
    }
}
