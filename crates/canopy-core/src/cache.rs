//! Inherited-icon cache store.
//!
//! Maps a node id to the last inherited set computed for it. The stored value
//! is what the node's overlay currently shows, so it doubles as the dirty
//! check: a store reports a change only when the new set differs from the
//! previous entry, or when there was no previous entry.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;

use crate::icon::IconSet;

/// Per-node inherited icon sets.
///
/// An absent entry and an entry holding the empty set are different states:
/// the first means the node was never aggregated since the last clear.
#[derive(Debug, Clone)]
pub struct IconCache<K> {
    entries: HashMap<K, IconSet>,
}

impl<K: Copy + Eq + Hash> IconCache<K> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The cached set for `node`, if it was aggregated.
    pub fn get(&self, node: K) -> Option<&IconSet> {
        self.entries.get(&node)
    }

    /// Returns true if `node` has an entry.
    pub fn contains(&self, node: K) -> bool {
        self.entries.contains_key(&node)
    }

    /// Store the freshly computed set for `node`.
    ///
    /// Returns true if the entry changed (no previous entry, or a previous
    /// entry that is value-unequal to `set`).
    pub fn store(&mut self, node: K, set: IconSet) -> bool {
        match self.entries.entry(node) {
            Entry::Occupied(mut entry) => {
                if *entry.get() == set {
                    false
                } else {
                    entry.insert(set);
                    true
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(set);
                true
            }
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Copy + Eq + Hash> Default for IconCache<K> {
    fn default() -> Self {
        Self::new()
    }
}
