// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_selection --heading-base-level=0

//! Understory Selection: multi-source selection bookkeeping for linked views.
//!
//! When several views show the same entities, each view usually owns its own
//! notion of "what the user picked here" (a brushed region in one panel, a
//! hand-picked set in another) while the highlighting shown to the user is the
//! union of all of them. This crate keeps that bookkeeping and nothing else:
//! it does not know how keys are laid out, drawn, or hit-tested.
//!
//! The pieces are:
//! - [`SelectionSource`]: one set of keys plus a revision counter that only
//!   moves when the contents change.
//! - [`SelectionState`]: one [`SelectionSource`] per source id (typically one
//!   per view), with per-source `add` / `remove` / `replace` edits.
//! - [`Merged`]: the read-only union of every source, rebuilt on each request.
//!
//! Sources are independent: editing one never changes another's stored keys,
//! only what [`SelectionState::merged`] reports.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_selection::SelectionState;
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq)]
//! enum Panel {
//!     Map,
//!     Scatter,
//! }
//!
//! let mut state = SelectionState::<Panel, u32>::new();
//!
//! // A brush in the scatter panel redefines that panel's whole selection.
//! state.replace(Panel::Scatter, [1, 2]);
//!
//! // A modifier-hover in the map panel accumulates one key at a time.
//! state.add(Panel::Map, 7);
//!
//! let merged = state.merged();
//! assert!(merged.contains(&1) && merged.contains(&7));
//!
//! // Clearing the scatter brush leaves the map's picks alone.
//! state.clear(Panel::Scatter);
//! assert_eq!(state.merged().len(), 1);
//! ```
//!
//! ## Transient previews
//!
//! Hover feedback often wants "the stored selection, plus whatever is under
//! the pointer" without recording the hovered key anywhere.
//! [`SelectionState::merged_with`] returns exactly that and leaves the state
//! untouched.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod state;

pub use state::SelectionState;

use core::hash::Hash;

use hashbrown::HashSet;

/// One source's set of selected keys.
///
/// Membership-only: there is no ordering, and duplicates cannot exist.
/// A revision counter is bumped whenever an edit actually changes the set,
/// which gives observers a cheap "did anything change?" marker.
#[derive(Clone, Debug)]
pub struct SelectionSource<K> {
    keys: HashSet<K>,
    revision: u64,
}

impl<K> Default for SelectionSource<K> {
    fn default() -> Self {
        Self {
            keys: HashSet::default(),
            revision: 0,
        }
    }
}

impl<K> SelectionSource<K> {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if nothing is selected in this source.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the number of selected keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Iterates the selected keys in unspecified order.
    pub fn iter(&self) -> hashbrown::hash_set::Iter<'_, K> {
        self.keys.iter()
    }

    /// Returns the revision counter.
    ///
    /// No-op edits (adding a present key, removing an absent one, replacing
    /// with identical contents) leave it unchanged.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        if self.keys.is_empty() {
            return;
        }
        self.keys.clear();
        self.bump_revision();
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl<K> SelectionSource<K>
where
    K: Hash + Eq,
{
    /// Returns `true` if `key` is selected.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Adds `key`, returning `true` if it was not already present.
    pub fn add(&mut self, key: K) -> bool {
        let inserted = self.keys.insert(key);
        if inserted {
            self.bump_revision();
        }
        inserted
    }

    /// Removes `key`, returning `true` if it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        let removed = self.keys.remove(key);
        if removed {
            self.bump_revision();
        }
        removed
    }

    /// Replaces the whole set with `keys`. Duplicates in the input collapse.
    pub fn replace<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        let next: HashSet<K> = keys.into_iter().collect();
        if next == self.keys {
            return;
        }
        self.keys = next;
        self.bump_revision();
    }
}

/// Read-only union of every source in a [`SelectionState`].
///
/// A `Merged` is a snapshot: it owns its keys and does not track later edits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Merged<K: Hash + Eq> {
    keys: HashSet<K>,
}

impl<K: Hash + Eq> Default for Merged<K> {
    fn default() -> Self {
        Self {
            keys: HashSet::default(),
        }
    }
}

impl<K: Hash + Eq> Merged<K> {
    /// Returns `true` if `key` is selected in any source.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Returns the number of distinct selected keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no source selects anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates the merged keys in unspecified order.
    pub fn iter(&self) -> hashbrown::hash_set::Iter<'_, K> {
        self.keys.iter()
    }
}

impl<K: Hash + Eq> FromIterator<K> for Merged<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl<K: Hash + Eq> Extend<K> for Merged<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        self.keys.extend(iter);
    }
}

impl<'a, K: Hash + Eq> IntoIterator for &'a Merged<K> {
    type Item = &'a K;
    type IntoIter = hashbrown::hash_set::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
