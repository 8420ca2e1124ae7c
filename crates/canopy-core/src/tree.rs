//! Host tree interface.
//!
//! The tree itself is owned by the host application. This crate only reads
//! node structure and icons through [`IconTree`], and writes overlays and
//! refresh requests through [`IconTreeMut`].
//!
//! Node identifiers must be stable for the lifetime of the loaded document:
//! they key the inherited-icon cache, so an id must never be reused for a
//! different node while the engine is active.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::icon::IconSet;
use crate::overlay::IconOverlay;

/// Read access to a host tree.
pub trait IconTree {
    /// Stable node identifier used as the cache key.
    type NodeId: Copy + Eq + Hash + fmt::Debug;

    /// The icons attached directly to `node`.
    fn own_icons(&self, node: Self::NodeId) -> &IconSet;

    /// The parent of `node`, or `None` for a root.
    fn parent(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    /// The structural children of `node`, in tree order.
    fn children(&self, node: Self::NodeId) -> &[Self::NodeId];

    /// Whether `node` is folded (its children are hidden in the view).
    fn is_folded(&self, _node: Self::NodeId) -> bool {
        false
    }

    /// Human-readable label for diagnostics.
    fn node_label(&self, node: Self::NodeId) -> String {
        format!("{node:?}")
    }
}

/// Write access to a host tree's presentation.
pub trait IconTreeMut: IconTree {
    /// Install `overlay` in the named slot of `node`, replacing any previous one.
    fn set_overlay(&mut self, node: Self::NodeId, slot: &str, overlay: IconOverlay);

    /// Remove the named overlay slot of `node`, if present.
    fn remove_overlay(&mut self, node: Self::NodeId, slot: &str);

    /// Ask the host to repaint `node`.
    fn refresh(&mut self, node: Self::NodeId);
}

/// Which children take part in aggregation and recursive passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildTraversal {
    /// Every structural child, whether or not its parent is folded.
    #[default]
    Structural,
    /// Children of folded nodes are skipped.
    Unfolded,
}

impl ChildTraversal {
    /// The children of `node` under this policy.
    pub fn children<T: IconTree + ?Sized>(self, tree: &T, node: T::NodeId) -> &[T::NodeId] {
        match self {
            Self::Unfolded if tree.is_folded(node) => &[],
            _ => tree.children(node),
        }
    }
}
