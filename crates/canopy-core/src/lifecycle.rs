//! Activation, deactivation and document loads.
//!
//! A node becomes an activation root when the feature is switched on for it;
//! every node in its subtree is then in an active scope. Switching the
//! feature off clears the whole cache store and strips overlays from the
//! subtree. The strip runs as a [`SyncMode::Removing`] traversal, so no
//! overlay can be reinstalled while it is in progress.

use std::fmt;
use std::hash::Hash;

use crate::aggregate::Visited;
use crate::engine::InheritedIcons;
use crate::logging::PerfSpan;
use crate::overlay::SyncMode;
use crate::tree::{ChildTraversal, IconTreeMut};

impl<K: Copy + Eq + Hash + fmt::Debug> InheritedIcons<K> {
    /// The feature was switched on for `node`.
    ///
    /// Computes the whole subtree bottom-up, then the ancestors of `node`.
    #[tracing::instrument(skip(self, host), target = "canopy_core::lifecycle", level = "debug")]
    pub fn on_activated<H: IconTreeMut<NodeId = K> + ?Sized>(&mut self, host: &mut H, node: K) {
        self.active_roots.insert(node);
        self.full_pass(host, node);
    }

    /// Mark `node` as an activation root without computing anything.
    ///
    /// Used while a document is being read: the pass runs once the load
    /// completes, see [`on_load_completed`](Self::on_load_completed).
    pub fn restore_activation(&mut self, node: K) {
        tracing::debug!(target: "canopy_core::lifecycle", ?node, "activation restored");
        self.active_roots.insert(node);
    }

    /// The feature was switched off for `node`.
    ///
    /// Drops every cache entry (not just the subtree's) and removes the
    /// overlay from `node` and all of its descendants. Activation roots
    /// nested inside the subtree are switched off with it. Activation roots
    /// outside the subtree are then recomputed from the cold cache.
    #[tracing::instrument(skip(self, host), target = "canopy_core::lifecycle", level = "debug")]
    pub fn on_deactivated<H: IconTreeMut<NodeId = K> + ?Sized>(&mut self, host: &mut H, node: K) {
        self.active_roots.remove(&node);
        self.cache.clear();
        self.teardown(host, node);

        let remaining: Vec<K> = self.active_roots.iter().copied().collect();
        for root in remaining {
            self.full_pass(host, root);
        }
    }

    /// A document finished loading; `root` is the top of the loaded content.
    ///
    /// Nothing happens unless `root` lies in an active scope. Otherwise every
    /// loaded node is computed once, followed by the ancestors of `root`.
    #[tracing::instrument(skip(self, host), target = "canopy_core::lifecycle", level = "debug")]
    pub fn on_load_completed<H: IconTreeMut<NodeId = K> + ?Sized>(
        &mut self,
        host: &mut H,
        root: K,
    ) {
        if !self.is_active(&*host, root) {
            return;
        }
        self.full_pass(host, root);
    }

    fn full_pass<H: IconTreeMut<NodeId = K> + ?Sized>(&mut self, host: &mut H, node: K) {
        let _span = PerfSpan::new("full_pass");
        self.recompute_subtree(host, node);
        self.recompute_ancestors(host, node);
        tracing::debug!(target: "canopy_core::lifecycle", ?node, cached = self.cache.len(), "full pass complete");
    }

    /// Remove the overlay of `node` and every structural descendant, with a
    /// refresh for each node, and drop the activation roots it passes.
    fn teardown<H: IconTreeMut<NodeId = K> + ?Sized>(&mut self, host: &mut H, node: K) {
        let mut visited = Visited::new(self.config.guard_cycles);
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if !visited.enter(id) {
                continue;
            }
            if id != node && self.active_roots.remove(&id) {
                tracing::debug!(target: "canopy_core::lifecycle", ?id, "nested activation root switched off");
            }
            let action = self.style.sync(host, id, &Default::default(), SyncMode::Removing);
            self.record_sync(action);
            let children = ChildTraversal::Structural.children(&*host, id);
            stack.extend(children.iter().rev().copied());
        }
    }
}
