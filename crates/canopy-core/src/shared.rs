//! Thread-safe wrapper around [`InheritedIcons`].
//!
//! Every engine operation must run alone: two propagations interleaving
//! would read half-updated cache entries. [`SharedInheritedIcons`] runs each
//! call under one lock. The lock is re-entrant, so a host that dispatches a
//! new tree event from inside an overlay or refresh callback does not
//! deadlock; such a nested event is dropped and reported as not delivered,
//! since the outer operation is still rewriting the cache (or tearing the
//! subtree down).

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;

use parking_lot::ReentrantMutex;

use crate::config::InheritedIconsConfig;
use crate::engine::{InheritedIcons, PropagationStats};
use crate::icon::IconSet;
use crate::propagate::NodeProperty;
use crate::tree::IconTreeMut;

/// An [`InheritedIcons`] engine that can be shared between threads.
///
/// Event methods return `true` if the event was processed and `false` if it
/// arrived re-entrantly and was dropped.
pub struct SharedInheritedIcons<K> {
    inner: ReentrantMutex<RefCell<InheritedIcons<K>>>,
}

impl<K: Copy + Eq + Hash + fmt::Debug> SharedInheritedIcons<K> {
    /// Create a shared engine.
    pub fn new(config: InheritedIconsConfig) -> Self {
        Self::from_engine(InheritedIcons::new(config))
    }

    /// Wrap an existing engine.
    pub fn from_engine(engine: InheritedIcons<K>) -> Self {
        Self {
            inner: ReentrantMutex::new(RefCell::new(engine)),
        }
    }

    /// Unwrap the engine.
    pub fn into_inner(self) -> InheritedIcons<K> {
        self.inner.into_inner().into_inner()
    }

    fn with_engine<R>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut InheritedIcons<K>) -> R,
    ) -> Option<R> {
        let guard = self.inner.lock();
        let Ok(mut engine) = guard.try_borrow_mut() else {
            tracing::debug!(target: "canopy_core::propagate", operation, "re-entrant event dropped");
            return None;
        };
        Some(f(&mut engine))
    }

    /// Run `f` with read access to the engine.
    ///
    /// Returns `None` when called from inside a running operation.
    pub fn with_read<R>(&self, f: impl FnOnce(&InheritedIcons<K>) -> R) -> Option<R> {
        let guard = self.inner.lock();
        let engine = guard.try_borrow().ok()?;
        Some(f(&engine))
    }

    /// Clone of the cached inherited set of `node`.
    pub fn aggregated(&self, node: K) -> Option<IconSet> {
        self.with_read(|engine| engine.aggregated(node).cloned())
            .flatten()
    }

    /// The engine's work counters.
    pub fn stats(&self) -> Option<PropagationStats> {
        self.with_read(InheritedIcons::stats)
    }

    /// See [`InheritedIcons::on_node_changed`].
    pub fn on_node_changed<H>(&self, host: &mut H, node: K, property: NodeProperty) -> bool
    where
        H: IconTreeMut<NodeId = K> + ?Sized,
    {
        self.with_engine("node_changed", |e| e.on_node_changed(host, node, property))
            .is_some()
    }

    /// See [`InheritedIcons::on_own_icons_changed`].
    pub fn on_own_icons_changed<H>(&self, host: &mut H, node: K) -> bool
    where
        H: IconTreeMut<NodeId = K> + ?Sized,
    {
        self.with_engine("own_icons_changed", |e| e.on_own_icons_changed(host, node))
            .is_some()
    }

    /// See [`InheritedIcons::on_child_inserted`].
    pub fn on_child_inserted<H>(&self, host: &mut H, parent: K, child: K, index: usize) -> bool
    where
        H: IconTreeMut<NodeId = K> + ?Sized,
    {
        self.with_engine("child_inserted", |e| {
            e.on_child_inserted(host, parent, child, index)
        })
        .is_some()
    }

    /// See [`InheritedIcons::on_child_removed`].
    pub fn on_child_removed<H>(&self, host: &mut H, parent: K, child: K, index: usize) -> bool
    where
        H: IconTreeMut<NodeId = K> + ?Sized,
    {
        self.with_engine("child_removed", |e| {
            e.on_child_removed(host, parent, child, index)
        })
        .is_some()
    }

    /// See [`InheritedIcons::on_child_moved`].
    pub fn on_child_moved<H>(
        &self,
        host: &mut H,
        old_parent: K,
        old_index: usize,
        new_parent: K,
        child: K,
        new_index: usize,
    ) -> bool
    where
        H: IconTreeMut<NodeId = K> + ?Sized,
    {
        self.with_engine("child_moved", |e| {
            e.on_child_moved(host, old_parent, old_index, new_parent, child, new_index)
        })
        .is_some()
    }

    /// See [`InheritedIcons::on_activated`].
    pub fn on_activated<H>(&self, host: &mut H, node: K) -> bool
    where
        H: IconTreeMut<NodeId = K> + ?Sized,
    {
        self.with_engine("activated", |e| e.on_activated(host, node))
            .is_some()
    }

    /// See [`InheritedIcons::on_deactivated`].
    pub fn on_deactivated<H>(&self, host: &mut H, node: K) -> bool
    where
        H: IconTreeMut<NodeId = K> + ?Sized,
    {
        self.with_engine("deactivated", |e| e.on_deactivated(host, node))
            .is_some()
    }

    /// See [`InheritedIcons::on_load_completed`].
    pub fn on_load_completed<H>(&self, host: &mut H, root: K) -> bool
    where
        H: IconTreeMut<NodeId = K> + ?Sized,
    {
        self.with_engine("load_completed", |e| e.on_load_completed(host, root))
            .is_some()
    }
}

impl<K: Copy + Eq + Hash + fmt::Debug> fmt::Debug for SharedInheritedIcons<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.inner.lock();
        match guard.try_borrow() {
            Ok(engine) => f.debug_tuple("SharedInheritedIcons").field(&*engine).finish(),
            Err(_) => f.write_str("SharedInheritedIcons(<busy>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon_set;
    use crate::overlay::IconOverlay;
    use crate::testing::TestTree;
    use crate::tree::IconTree;
    use std::sync::Arc;

    /// Forwards every refresh back into the shared engine, like a host whose
    /// repaint handler fires tree events.
    struct EchoingTree {
        tree: TestTree,
        engine: Arc<SharedInheritedIcons<usize>>,
        delivered: Vec<bool>,
    }

    impl IconTree for EchoingTree {
        type NodeId = usize;

        fn own_icons(&self, node: usize) -> &IconSet {
            self.tree.own_icons(node)
        }

        fn parent(&self, node: usize) -> Option<usize> {
            self.tree.parent(node)
        }

        fn children(&self, node: usize) -> &[usize] {
            self.tree.children(node)
        }
    }

    impl IconTreeMut for EchoingTree {
        fn set_overlay(&mut self, node: usize, slot: &str, overlay: IconOverlay) {
            self.tree.set_overlay(node, slot, overlay);
        }

        fn remove_overlay(&mut self, node: usize, slot: &str) {
            self.tree.remove_overlay(node, slot);
        }

        fn refresh(&mut self, node: usize) {
            self.tree.refresh(node);
            let engine = Arc::clone(&self.engine);
            let delivered = engine.on_own_icons_changed(&mut self.tree, node);
            self.delivered.push(delivered);
        }
    }

    #[test]
    fn test_shared_engine_processes_events() {
        let mut tree = TestTree::new();
        let root = tree.root();
        let leaf = tree.add_leaf(root, "leaf", &["fire"]);
        let shared = SharedInheritedIcons::new(InheritedIconsConfig::default());

        assert!(shared.on_activated(&mut tree, root));
        assert_eq!(shared.aggregated(root), Some(icon_set!["fire"]));

        tree.set_icons(leaf, &["water"]);
        assert!(shared.on_own_icons_changed(&mut tree, leaf));
        assert_eq!(shared.aggregated(root), Some(icon_set!["water"]));
        assert!(shared.stats().unwrap().aggregations > 0);
    }

    #[test]
    fn test_reentrant_events_are_dropped() {
        let mut inner = TestTree::new();
        let root = inner.root();
        inner.add_leaf(root, "leaf", &["fire"]);
        let engine = Arc::new(SharedInheritedIcons::new(InheritedIconsConfig::default()));
        let mut host = EchoingTree {
            tree: inner,
            engine: Arc::clone(&engine),
            delivered: Vec::new(),
        };

        assert!(engine.on_activated(&mut host, root));
        assert!(!host.delivered.is_empty());
        assert!(host.delivered.iter().all(|&d| !d));

        host.delivered.clear();
        assert!(engine.on_deactivated(&mut host, root));
        assert!(host.delivered.iter().all(|&d| !d));
        assert!(host.tree.overlay_icons(root).is_none());
    }

    #[test]
    fn test_into_inner() {
        let mut tree = TestTree::new();
        let root = tree.root();
        tree.add_leaf(root, "leaf", &["fire"]);
        let shared = SharedInheritedIcons::new(InheritedIconsConfig::default());
        shared.on_activated(&mut tree, root);

        let engine = shared.into_inner();
        assert_eq!(engine.aggregated(root), Some(&icon_set!["fire"]));
    }
}
