//! The inherited-icons engine.
//!
//! [`InheritedIcons`] owns the cache store and the set of activation roots.
//! Its behaviour is split over several modules:
//!
//! - [`crate::aggregate`] - computing one node and the traversal primitives
//! - [`crate::propagate`] - reacting to tree edits
//! - [`crate::lifecycle`] - activation, deactivation and document loads

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use crate::cache::IconCache;
use crate::config::InheritedIconsConfig;
use crate::icon::IconSet;
use crate::overlay::OverlayStyle;
use crate::tree::IconTree;

/// Counters describing the work done by an engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Nodes aggregated.
    pub aggregations: u64,
    /// Aggregations whose result differed from the cached entry.
    pub changes: u64,
    /// Refresh requests sent to the host.
    pub refreshes: u64,
    /// Overlays installed or replaced.
    pub overlays_installed: u64,
    /// Overlay slots removed.
    pub overlays_cleared: u64,
}

/// Maintains the inherited icon set of every node in the active scopes of a
/// host tree and mirrors it into node overlays.
///
/// The engine is driven by the host's event dispatcher through the `on_*`
/// methods. Every call runs to completion before returning.
///
/// # Example
///
/// ```ignore
/// let mut engine = InheritedIcons::new(InheritedIconsConfig::default());
/// engine.on_activated(&mut tree, tree.root());
/// tree.add_icon(leaf, Icon::new("idea"));
/// engine.on_own_icons_changed(&mut tree, leaf);
/// assert!(engine.aggregated(tree.root()).unwrap().contains(&Icon::new("idea")));
/// ```
pub struct InheritedIcons<K> {
    pub(crate) config: InheritedIconsConfig,
    pub(crate) style: OverlayStyle,
    pub(crate) cache: IconCache<K>,
    pub(crate) active_roots: HashSet<K>,
    pub(crate) stats: PropagationStats,
}

impl<K: Copy + Eq + Hash + fmt::Debug> InheritedIcons<K> {
    /// Create an engine with no active scope.
    pub fn new(config: InheritedIconsConfig) -> Self {
        Self {
            style: config.overlay_style(),
            config,
            cache: IconCache::new(),
            active_roots: HashSet::new(),
            stats: PropagationStats::default(),
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &InheritedIconsConfig {
        &self.config
    }

    /// The cached inherited set of `node`, if it has been aggregated.
    pub fn aggregated(&self, node: K) -> Option<&IconSet> {
        self.cache.get(node)
    }

    /// Read-only access to the cache store.
    pub fn cache(&self) -> &IconCache<K> {
        &self.cache
    }

    /// Nodes the feature was activated on.
    pub fn activation_roots(&self) -> impl Iterator<Item = K> + '_ {
        self.active_roots.iter().copied()
    }

    /// Returns true if `node` or one of its ancestors is an activation root.
    pub fn is_active<T: IconTree<NodeId = K> + ?Sized>(&self, tree: &T, node: K) -> bool {
        if self.active_roots.is_empty() {
            return false;
        }
        let mut visited = crate::aggregate::Visited::new(self.config.guard_cycles);
        let mut current = Some(node);
        while let Some(id) = current {
            if !visited.enter(id) {
                return false;
            }
            if self.active_roots.contains(&id) {
                return true;
            }
            current = tree.parent(id);
        }
        false
    }

    /// Work counters since creation or the last [`reset_stats`](Self::reset_stats).
    pub fn stats(&self) -> PropagationStats {
        self.stats
    }

    /// Zero the work counters.
    pub fn reset_stats(&mut self) {
        self.stats = PropagationStats::default();
    }
}

impl<K: Copy + Eq + Hash + fmt::Debug> Default for InheritedIcons<K> {
    fn default() -> Self {
        Self::new(InheritedIconsConfig::default())
    }
}

impl<K: Copy + Eq + Hash + fmt::Debug> fmt::Debug for InheritedIcons<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InheritedIcons")
            .field("config", &self.config)
            .field("active_roots", &self.active_roots)
            .field("cached_nodes", &self.cache.len())
            .field("stats", &self.stats)
            .finish()
    }
}
