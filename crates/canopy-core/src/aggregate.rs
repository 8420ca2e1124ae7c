//! Aggregation of inherited icon sets.
//!
//! A node's inherited set is the union, over its children, of each child's own
//! icons and the child's cached inherited set, minus the node's own icons.
//! Because the child's cached set already covers the child's descendants, one
//! level of children is enough as long as children are settled before their
//! parent. Every traversal here recurses into children before computing the
//! parent.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use crate::cache::IconCache;
use crate::config::PropagationPolicy;
use crate::engine::InheritedIcons;
use crate::icon::IconSet;
use crate::overlay::{OverlayAction, SyncMode};
use crate::tree::{ChildTraversal, IconTree, IconTreeMut};

/// Compute the inherited set of `node` from its children's own icons and
/// their cached inherited sets. A child without a cache entry counts as
/// having an empty inherited set.
pub fn aggregate<T: IconTree + ?Sized>(
    tree: &T,
    cache: &IconCache<T::NodeId>,
    node: T::NodeId,
    traversal: ChildTraversal,
) -> IconSet {
    let mut inherited = IconSet::new();
    for &child in traversal.children(tree, node) {
        inherited.union_with(tree.own_icons(child));
        if let Some(cached) = cache.get(child) {
            inherited.union_with(cached);
        }
    }
    inherited.remove_all(tree.own_icons(node));
    inherited
}

/// Visited-node tracking for traversals over a host tree that might not be
/// acyclic. Disabled trackers accept every node.
pub(crate) struct Visited<K> {
    seen: Option<HashSet<K>>,
}

impl<K: Copy + Eq + Hash + fmt::Debug> Visited<K> {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            seen: enabled.then(HashSet::new),
        }
    }

    /// Returns false if `node` was already visited.
    pub(crate) fn enter(&mut self, node: K) -> bool {
        match self.seen.as_mut().map(|seen| seen.insert(node)) {
            Some(false) => {
                tracing::warn!(target: "canopy_core::aggregate", ?node, "node visited twice, host tree has a cycle");
                false
            }
            _ => true,
        }
    }
}

impl<K: Copy + Eq + Hash + fmt::Debug> InheritedIcons<K> {
    /// Aggregate `node`, store the result and sync its overlay if it changed.
    ///
    /// Returns true if the cached set changed.
    pub(crate) fn update_node<H: IconTreeMut<NodeId = K> + ?Sized>(
        &mut self,
        host: &mut H,
        node: K,
    ) -> bool {
        let inherited = aggregate(&*host, &self.cache, node, self.config.child_traversal);
        self.stats.aggregations += 1;
        if !self.cache.store(node, inherited) {
            return false;
        }
        self.stats.changes += 1;
        let action = match self.cache.get(node) {
            Some(set) => self.style.sync(host, node, set, SyncMode::Live),
            None => self.style.sync(host, node, &IconSet::new(), SyncMode::Live),
        };
        self.record_sync(action);
        true
    }

    pub(crate) fn record_sync(&mut self, action: OverlayAction) {
        self.stats.refreshes += 1;
        match action {
            OverlayAction::Installed => self.stats.overlays_installed += 1,
            OverlayAction::Cleared => self.stats.overlays_cleared += 1,
        }
    }

    /// Update every leaf below `node` (or `node` itself if it is a leaf).
    ///
    /// Interior nodes are left to a later ancestor walk.
    pub fn recompute_leaves_up<H: IconTreeMut<NodeId = K> + ?Sized>(
        &mut self,
        host: &mut H,
        node: K,
    ) {
        let mut visited = Visited::new(self.config.guard_cycles);
        self.leaves_up(host, node, &mut visited);
    }

    fn leaves_up<H: IconTreeMut<NodeId = K> + ?Sized>(
        &mut self,
        host: &mut H,
        node: K,
        visited: &mut Visited<K>,
    ) {
        if !visited.enter(node) {
            return;
        }
        let children = self.config.child_traversal.children(&*host, node).to_vec();
        if children.is_empty() {
            self.update_node(host, node);
            return;
        }
        for child in children {
            self.leaves_up(host, child, visited);
        }
    }

    /// Update every node of the subtree rooted at `node` exactly once,
    /// children before parents.
    pub fn recompute_subtree<H: IconTreeMut<NodeId = K> + ?Sized>(
        &mut self,
        host: &mut H,
        node: K,
    ) {
        let mut visited = Visited::new(self.config.guard_cycles);
        self.post_order(host, node, &mut visited);
    }

    fn post_order<H: IconTreeMut<NodeId = K> + ?Sized>(
        &mut self,
        host: &mut H,
        node: K,
        visited: &mut Visited<K>,
    ) {
        if !visited.enter(node) {
            return;
        }
        let children = self.config.child_traversal.children(&*host, node).to_vec();
        for child in children {
            self.post_order(host, child, visited);
        }
        self.update_node(host, node);
    }

    /// Update `node`, then each of its ancestors in turn.
    ///
    /// Under [`PropagationPolicy::ToRoot`] the walk always reaches the root.
    /// Under [`PropagationPolicy::StopWhenUnchanged`] it ends at the first
    /// ancestor above `node` whose set did not change.
    pub fn recompute_up_to_root<H: IconTreeMut<NodeId = K> + ?Sized>(
        &mut self,
        host: &mut H,
        node: K,
    ) {
        let mut visited = Visited::new(self.config.guard_cycles);
        let mut current = Some(node);
        while let Some(id) = current {
            if !visited.enter(id) {
                break;
            }
            let changed = self.update_node(host, id);
            if !changed
                && id != node
                && self.config.propagation == PropagationPolicy::StopWhenUnchanged
            {
                tracing::trace!(target: "canopy_core::aggregate", ?id, "ancestor unchanged, stopping");
                break;
            }
            current = host.parent(id);
        }
    }

    /// Update the ancestors of `node`, starting at its parent.
    pub(crate) fn recompute_ancestors<H: IconTreeMut<NodeId = K> + ?Sized>(
        &mut self,
        host: &mut H,
        node: K,
    ) {
        if let Some(parent) = host.parent(node) {
            self.recompute_up_to_root(host, parent);
        }
    }
}
