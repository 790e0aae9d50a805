// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::hash::Hash;

use smallvec::SmallVec;

use crate::{Merged, SelectionSource};

/// One [`SelectionSource`] per source id, plus the merged view over them.
///
/// `S` identifies a source (usually a small `Copy` enum naming a view) and
/// `K` is the selected key type. Sources are created empty on first use, so
/// a fresh state needs no registration step, but [`SelectionState::with_sources`]
/// can pre-register them to fix the iteration order of [`SelectionState::sources`].
#[derive(Clone, Debug)]
pub struct SelectionState<S, K> {
    sources: SmallVec<[(S, SelectionSource<K>); 2]>,
}

impl<S, K> Default for SelectionState<S, K> {
    fn default() -> Self {
        Self {
            sources: SmallVec::new(),
        }
    }
}

impl<S, K> SelectionState<S, K>
where
    S: Copy + Eq,
{
    /// Creates a state with no sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state with an empty source for each id in `sources`.
    #[must_use]
    pub fn with_sources<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut state = Self::new();
        for id in sources {
            state.source_mut(id);
        }
        state
    }

    /// Returns the source registered under `id`, if it has been used.
    #[must_use]
    pub fn source(&self, id: S) -> Option<&SelectionSource<K>> {
        self.sources
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, source)| source)
    }

    /// Iterates `(id, source)` pairs in registration order.
    pub fn sources(&self) -> impl Iterator<Item = (S, &SelectionSource<K>)> + '_ {
        self.sources.iter().map(|(id, source)| (*id, source))
    }

    /// Empties the source `id`.
    pub fn clear(&mut self, id: S) {
        self.source_mut(id).clear();
    }

    /// Sum of every source's revision.
    ///
    /// Monotonic as long as no individual counter wraps; handy for observers
    /// that only need to know whether anything changed since last time.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.sources
            .iter()
            .fold(0_u64, |acc, (_, source)| acc.wrapping_add(source.revision()))
    }

    fn source_mut(&mut self, id: S) -> &mut SelectionSource<K> {
        let idx = match self.sources.iter().position(|(sid, _)| *sid == id) {
            Some(idx) => idx,
            None => {
                self.sources.push((id, SelectionSource::new()));
                self.sources.len() - 1
            }
        };
        &mut self.sources[idx].1
    }
}

impl<S, K> SelectionState<S, K>
where
    S: Copy + Eq,
    K: Hash + Eq + Clone,
{
    /// Adds `key` to source `id`. Returns `true` if it was newly added.
    pub fn add(&mut self, id: S, key: K) -> bool {
        self.source_mut(id).add(key)
    }

    /// Removes `key` from source `id`. Returns `true` if it was present.
    pub fn remove(&mut self, id: S, key: &K) -> bool {
        self.source_mut(id).remove(key)
    }

    /// Replaces the whole contents of source `id`.
    pub fn replace<I>(&mut self, id: S, keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        self.source_mut(id).replace(keys);
    }

    /// Returns `true` if any source selects `key`.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.sources.iter().any(|(_, source)| source.contains(key))
    }

    /// Union of every source.
    ///
    /// Rebuilt on every call; nothing is cached between calls.
    #[must_use]
    pub fn merged(&self) -> Merged<K> {
        self.sources
            .iter()
            .flat_map(|(_, source)| source.iter().cloned())
            .collect()
    }

    /// Union of every source plus `extra`, without storing `extra` anywhere.
    #[must_use]
    pub fn merged_with(&self, extra: &K) -> Merged<K> {
        let mut merged = self.merged();
        merged.extend(core::iter::once(extra.clone()));
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionState;

    #[test]
    fn sources_are_created_on_first_use() {
        let mut state = SelectionState::<u8, u32>::new();
        assert!(state.source(0).is_none());

        state.add(0, 5);
        assert_eq!(state.source(0).map(|s| s.len()), Some(1));
        assert!(state.source(1).is_none());
    }

    #[test]
    fn with_sources_fixes_iteration_order() {
        let state = SelectionState::<char, u32>::with_sources(['b', 'a']);
        let ids: alloc::vec::Vec<char> = state.sources().map(|(id, _)| id).collect();
        assert_eq!(ids, ['b', 'a']);
        assert!(state.merged().is_empty());
    }

    #[test]
    fn revision_tracks_every_source() {
        let mut state = SelectionState::<u8, u32>::with_sources([0, 1]);
        assert_eq!(state.revision(), 0);
        state.add(0, 1);
        state.add(1, 1);
        assert_eq!(state.revision(), 2);

        // Already present: no change anywhere.
        state.add(1, 1);
        assert_eq!(state.revision(), 2);
    }
}
