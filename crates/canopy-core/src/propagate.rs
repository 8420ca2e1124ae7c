//! Change propagation for tree edits.
//!
//! Each event handler decides which nodes to recompute and in what order:
//!
//! | Event                 | Gate (must be active) | Recomputed                                   |
//! |-----------------------|-----------------------|----------------------------------------------|
//! | own icons changed     | the node              | the node, then every ancestor                |
//! | other node change     | the node              | the node only                                |
//! | child inserted        | the parent            | the inserted subtree, then its ancestors     |
//! | child removed         | the parent            | the parent, then every ancestor              |
//! | child moved           | the new parent        | the old parent chain, then the moved node's  |
//!
//! Handlers for nodes outside every active scope return without touching the
//! cache or the host.

use std::fmt;
use std::hash::Hash;

use crate::engine::InheritedIcons;
use crate::tree::{ChildTraversal, IconTreeMut};

/// The node property reported by a node-change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeProperty {
    /// The node's own icons.
    Icons,
    /// The node's folded state.
    Folded,
    /// Anything else (text, style, ...).
    Other,
}

impl<K: Copy + Eq + Hash + fmt::Debug> InheritedIcons<K> {
    /// A property of `node` changed.
    ///
    /// The node itself is always recomputed. Changes that alter what the
    /// node contributes to its ancestors also walk up to the root: its own
    /// icons, and its folded state when folded children are excluded from
    /// aggregation.
    #[tracing::instrument(skip(self, host), target = "canopy_core::propagate", level = "trace")]
    pub fn on_node_changed<H: IconTreeMut<NodeId = K> + ?Sized>(
        &mut self,
        host: &mut H,
        node: K,
        property: NodeProperty,
    ) {
        if !self.is_active(&*host, node) {
            return;
        }
        let affects_ancestors = match property {
            NodeProperty::Icons => true,
            NodeProperty::Folded => self.config.child_traversal == ChildTraversal::Unfolded,
            NodeProperty::Other => false,
        };
        if affects_ancestors {
            self.recompute_up_to_root(host, node);
        } else {
            self.update_node(host, node);
        }
    }

    /// The icons attached directly to `node` changed.
    pub fn on_own_icons_changed<H: IconTreeMut<NodeId = K> + ?Sized>(
        &mut self,
        host: &mut H,
        node: K,
    ) {
        self.on_node_changed(host, node, NodeProperty::Icons);
    }

    /// `child` was inserted under `parent` at `index`.
    ///
    /// The child may carry a whole subtree, so it is computed bottom-up
    /// before the ancestors.
    #[tracing::instrument(skip(self, host), target = "canopy_core::propagate", level = "trace")]
    pub fn on_child_inserted<H: IconTreeMut<NodeId = K> + ?Sized>(
        &mut self,
        host: &mut H,
        parent: K,
        child: K,
        index: usize,
    ) {
        if !self.is_active(&*host, parent) {
            return;
        }
        self.recompute_subtree(host, child);
        self.recompute_up_to_root(host, parent);
    }

    /// `child` was removed from `parent`; it used to be at `index`.
    #[tracing::instrument(skip(self, host), target = "canopy_core::propagate", level = "trace")]
    pub fn on_child_removed<H: IconTreeMut<NodeId = K> + ?Sized>(
        &mut self,
        host: &mut H,
        parent: K,
        child: K,
        index: usize,
    ) {
        if !self.is_active(&*host, parent) {
            return;
        }
        self.recompute_up_to_root(host, parent);
    }

    /// `child` moved from `old_parent` at `old_index` to `new_parent` at
    /// `new_index`.
    #[tracing::instrument(skip(self, host), target = "canopy_core::propagate", level = "trace")]
    pub fn on_child_moved<H: IconTreeMut<NodeId = K> + ?Sized>(
        &mut self,
        host: &mut H,
        old_parent: K,
        old_index: usize,
        new_parent: K,
        child: K,
        new_index: usize,
    ) {
        if !self.is_active(&*host, new_parent) {
            return;
        }
        self.recompute_up_to_root(host, old_parent);
        if self.cache.contains(child) {
            self.recompute_up_to_root(host, child);
        } else {
            // Moved in from outside the active scope: its subtree was never
            // aggregated.
            self.recompute_subtree(host, child);
            self.recompute_ancestors(host, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InheritedIconsConfig, PropagationPolicy};
    use crate::icon::{Icon, IconSet};
    use crate::icon_set;
    use crate::testing::TestTree;

    /// root -> A -> {leaf1(fire), leaf2(water)}
    fn sample_tree() -> (TestTree, InheritedIcons<usize>, [usize; 4]) {
        let mut tree = TestTree::new();
        let root = tree.root();
        let a = tree.add_child(root, "A");
        let leaf1 = tree.add_leaf(a, "leaf1", &["fire"]);
        let leaf2 = tree.add_leaf(a, "leaf2", &["water"]);
        let mut engine = InheritedIcons::default();
        engine.on_activated(&mut tree, root);
        (tree, engine, [root, a, leaf1, leaf2])
    }

    #[test]
    fn test_own_icon_added_is_excluded_from_own_set() {
        let (mut tree, mut engine, [root, a, _, _]) = sample_tree();

        tree.set_icons(a, &["fire"]);
        engine.on_own_icons_changed(&mut tree, a);

        assert_eq!(engine.aggregated(a), Some(&icon_set!["water"]));
        assert_eq!(tree.overlay_icons(a), Some(icon_set!["water"]));
        assert_eq!(engine.aggregated(root), Some(&icon_set!["fire", "water"]));
    }

    #[test]
    fn test_own_icon_change_on_leaf_reaches_root() {
        let (mut tree, mut engine, [root, a, leaf1, _]) = sample_tree();

        tree.set_icons(leaf1, &["star"]);
        engine.on_own_icons_changed(&mut tree, leaf1);

        assert_eq!(engine.aggregated(a), Some(&icon_set!["star", "water"]));
        assert_eq!(engine.aggregated(root), Some(&icon_set!["star", "water"]));
        assert_eq!(tree.overlay_icons(root), Some(icon_set!["star", "water"]));
    }

    #[test]
    fn test_other_change_recomputes_only_node() {
        let (mut tree, mut engine, [_, a, _, _]) = sample_tree();
        engine.reset_stats();

        engine.on_node_changed(&mut tree, a, NodeProperty::Other);

        assert_eq!(engine.stats().aggregations, 1);
        assert_eq!(engine.stats().refreshes, 0);
    }

    #[test]
    fn test_fold_change_under_unfolded_policy() {
        let mut tree = TestTree::new();
        let root = tree.root();
        let a = tree.add_child(root, "A");
        tree.add_leaf(a, "leaf", &["fire"]);
        let mut engine = InheritedIcons::new(
            InheritedIconsConfig::default().with_child_traversal(ChildTraversal::Unfolded),
        );
        engine.on_activated(&mut tree, root);
        assert_eq!(engine.aggregated(root), Some(&icon_set!["fire"]));

        tree.set_folded(a, true);
        engine.on_node_changed(&mut tree, a, NodeProperty::Folded);

        assert_eq!(engine.aggregated(a), Some(&IconSet::new()));
        assert_eq!(engine.aggregated(root), Some(&IconSet::new()));
        assert!(tree.overlay_icons(root).is_none());
    }

    #[test]
    fn test_insert_subtree() {
        let (mut tree, mut engine, [root, a, _, leaf2]) = sample_tree();

        let branch = tree.add_child(leaf2, "branch");
        tree.add_leaf(branch, "deep", &["earth"]);
        engine.on_child_inserted(&mut tree, leaf2, branch, 0);

        assert_eq!(engine.aggregated(branch), Some(&icon_set!["earth"]));
        assert_eq!(engine.aggregated(leaf2), Some(&icon_set!["earth"]));
        assert_eq!(engine.aggregated(a), Some(&icon_set!["earth", "fire", "water"]));
        assert_eq!(
            engine.aggregated(root),
            Some(&icon_set!["earth", "fire", "water"])
        );
    }

    #[test]
    fn test_delete_after_own_icon() {
        let (mut tree, mut engine, [root, a, leaf1, _]) = sample_tree();
        tree.set_icons(a, &["fire"]);
        engine.on_own_icons_changed(&mut tree, a);
        let a_refreshes = tree.refresh_count(a);
        let root_refreshes = tree.refresh_count(root);
        engine.reset_stats();

        let (parent, index) = tree.detach(leaf1);
        engine.on_child_removed(&mut tree, parent, leaf1, index);

        // Both nodes are recomputed, neither changes: A still hides its own
        // fire icon, and root still inherits fire from A itself.
        assert_eq!(engine.stats().aggregations, 2);
        assert_eq!(engine.aggregated(a), Some(&icon_set!["water"]));
        assert_eq!(tree.refresh_count(a), a_refreshes);
        assert_eq!(engine.aggregated(root), Some(&icon_set!["fire", "water"]));
        assert_eq!(tree.refresh_count(root), root_refreshes);
    }

    #[test]
    fn test_delete_last_carrier_updates_root() {
        let (mut tree, mut engine, [root, a, leaf1, _]) = sample_tree();

        let (parent, index) = tree.detach(leaf1);
        engine.on_child_removed(&mut tree, parent, leaf1, index);

        assert_eq!(engine.aggregated(a), Some(&icon_set!["water"]));
        assert_eq!(engine.aggregated(root), Some(&icon_set!["water"]));
        assert_eq!(tree.overlay_icons(root), Some(icon_set!["water"]));
    }

    #[test]
    fn test_move_updates_both_chains() {
        let (mut tree, mut engine, [root, a, leaf1, _]) = sample_tree();
        let b = tree.add_child(root, "B");
        engine.on_child_inserted(&mut tree, root, b, 1);

        let (old_parent, old_index) = tree.detach(leaf1);
        tree.attach(leaf1, b, 0);
        engine.on_child_moved(&mut tree, old_parent, old_index, b, leaf1, 0);

        assert_eq!(engine.aggregated(a), Some(&icon_set!["water"]));
        assert_eq!(engine.aggregated(b), Some(&icon_set!["fire"]));
        assert_eq!(engine.aggregated(root), Some(&icon_set!["fire", "water"]));
        assert_eq!(tree.overlay_icons(b), Some(icon_set!["fire"]));
    }

    #[test]
    fn test_move_in_from_outside_scope_aggregates_subtree() {
        let mut tree = TestTree::new();
        let root = tree.root();
        let inside = tree.add_child(root, "inside");
        let outside = tree.add_child(root, "outside");
        let moved = tree.add_child(outside, "moved");
        tree.add_leaf(moved, "leaf", &["star"]);
        let mut engine = InheritedIcons::default();
        engine.on_activated(&mut tree, inside);
        assert!(engine.aggregated(moved).is_none());

        let (old_parent, old_index) = tree.detach(moved);
        tree.attach(moved, inside, 0);
        engine.on_child_moved(&mut tree, old_parent, old_index, inside, moved, 0);

        assert_eq!(engine.aggregated(moved), Some(&icon_set!["star"]));
        assert_eq!(engine.aggregated(inside), Some(&icon_set!["star"]));
    }

    #[test]
    fn test_events_outside_scope_are_ignored() {
        let mut tree = TestTree::new();
        let root = tree.root();
        let leaf = tree.add_leaf(root, "leaf", &["fire"]);
        let mut engine: InheritedIcons<usize> = InheritedIcons::default();

        tree.set_icons(leaf, &["water"]);
        engine.on_own_icons_changed(&mut tree, leaf);
        let extra = tree.add_leaf(root, "extra", &["star"]);
        engine.on_child_inserted(&mut tree, root, extra, 1);

        assert!(engine.cache().is_empty());
        assert_eq!(tree.total_refreshes(), 0);
    }

    #[test]
    fn test_every_ancestor_consistent_after_edits() {
        let mut tree = TestTree::new();
        let root = tree.root();
        let a = tree.add_child(root, "a");
        let b = tree.add_child(a, "b");
        let c = tree.add_leaf(b, "c", &["one"]);
        let d = tree.add_leaf(root, "d", &["two"]);
        let mut engine = InheritedIcons::new(
            InheritedIconsConfig::default().with_propagation(PropagationPolicy::StopWhenUnchanged),
        );
        engine.on_activated(&mut tree, root);

        tree.set_icons(c, &["one", "three"]);
        engine.on_own_icons_changed(&mut tree, c);
        tree.set_icons(b, &["three"]);
        engine.on_own_icons_changed(&mut tree, b);
        let (parent, index) = tree.detach(d);
        engine.on_child_removed(&mut tree, parent, d, index);

        for node in [root, a, b, c] {
            let expected = crate::aggregate::aggregate(
                &tree,
                engine.cache(),
                node,
                ChildTraversal::Structural,
            );
            assert_eq!(engine.aggregated(node), Some(&expected), "node {node} is stale");
        }
        assert_eq!(engine.aggregated(root), Some(&icon_set!["one", "three"]));
        assert!(!engine.aggregated(b).unwrap().contains(&Icon::new("three")));
    }
}
