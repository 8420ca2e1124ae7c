//! Mind map document model.
//!
//! A [`MindMap`] is an arena of nodes with a single root. Each node carries a
//! text, the icons the user attached to it, a folded flag and a set of named
//! overlay slots. Removing a node removes its whole subtree.
//!
//! The map implements [`IconTree`] and [`IconTreeMut`], so it can be handed
//! straight to a [`canopy_core::InheritedIcons`] engine. Editing the map does
//! not notify the engine by itself; use [`crate::MapController`] for that.

use std::collections::HashMap;

use canopy_core::{Icon, IconOverlay, IconSet, IconTree, IconTreeMut};
use slotmap::{SlotMap, new_key_type};

use crate::error::{MapError, MapResult};

new_key_type! {
    /// Identifier of a node in a [`MindMap`].
    ///
    /// Ids stay valid while the node exists and are never handed out again
    /// after the node is removed.
    pub struct NodeId;
}

static NO_ICONS: IconSet = IconSet::new();

#[derive(Debug, Default)]
struct NodeData {
    text: String,
    icons: IconSet,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    folded: bool,
    overlays: HashMap<String, IconOverlay>,
    refreshes: usize,
}

impl NodeData {
    fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// An in-memory mind map.
#[derive(Debug)]
pub struct MindMap {
    nodes: SlotMap<NodeId, NodeData>,
    root: NodeId,
}

impl MindMap {
    /// Create a map holding only a root node.
    pub fn new(root_text: impl Into<String>) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::with_text(root_text));
        Self { nodes, root }
    }

    /// The root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Check if a node exists in the map.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> MapResult<&NodeData> {
        self.nodes.get(id).ok_or(MapError::InvalidNodeId)
    }

    fn node_mut(&mut self, id: NodeId) -> MapResult<&mut NodeData> {
        self.nodes.get_mut(id).ok_or(MapError::InvalidNodeId)
    }

    /// The node's text.
    pub fn text(&self, id: NodeId) -> MapResult<&str> {
        self.node(id).map(|d| d.text.as_str())
    }

    /// Replace the node's text.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> MapResult<()> {
        self.node_mut(id)?.text = text.into();
        Ok(())
    }

    /// The icons attached to the node.
    pub fn icons(&self, id: NodeId) -> MapResult<&IconSet> {
        self.node(id).map(|d| &d.icons)
    }

    /// Attach an icon. Returns false if the node already had it.
    pub fn add_icon(&mut self, id: NodeId, icon: Icon) -> MapResult<bool> {
        Ok(self.node_mut(id)?.icons.insert(icon))
    }

    /// Detach an icon. Returns false if the node did not have it.
    pub fn remove_icon(&mut self, id: NodeId, icon: &Icon) -> MapResult<bool> {
        Ok(self.node_mut(id)?.icons.remove(icon))
    }

    /// Replace all icons of the node. Returns true if the set changed.
    pub fn set_icons(&mut self, id: NodeId, icons: IconSet) -> MapResult<bool> {
        let data = self.node_mut(id)?;
        if data.icons == icons {
            return Ok(false);
        }
        data.icons = icons;
        Ok(true)
    }

    /// Whether the node is folded.
    pub fn folded(&self, id: NodeId) -> MapResult<bool> {
        self.node(id).map(|d| d.folded)
    }

    /// Fold or unfold the node. Returns true if the state changed.
    pub fn set_folded(&mut self, id: NodeId, folded: bool) -> MapResult<bool> {
        let data = self.node_mut(id)?;
        let changed = data.folded != folded;
        data.folded = folded;
        Ok(changed)
    }

    /// The parent of the node, `None` for the root.
    pub fn parent_of(&self, id: NodeId) -> MapResult<Option<NodeId>> {
        self.node(id).map(|d| d.parent)
    }

    /// The children of the node, in order.
    pub fn children_of(&self, id: NodeId) -> MapResult<&[NodeId]> {
        self.node(id).map(|d| d.children.as_slice())
    }

    /// Position of the node among its parent's children.
    pub fn index_of(&self, id: NodeId) -> MapResult<Option<usize>> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(None);
        };
        Ok(self
            .node(parent)?
            .children
            .iter()
            .position(|&child| child == id))
    }

    /// Append a new node below `parent`.
    pub fn add_child(&mut self, parent: NodeId, text: impl Into<String>) -> MapResult<NodeId> {
        let len = self.node(parent)?.children.len();
        self.insert_child(parent, len, text)
    }

    /// Insert a new node below `parent` at `index`.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        text: impl Into<String>,
    ) -> MapResult<NodeId> {
        let len = self.node(parent)?.children.len();
        if index > len {
            return Err(MapError::IndexOutOfBounds { index, len });
        }
        let mut data = NodeData::with_text(text);
        data.parent = Some(parent);
        let id = self.nodes.insert(data);
        self.node_mut(parent)?.children.insert(index, id);
        tracing::trace!(target: "canopy_map", ?id, ?parent, index, "node inserted");
        Ok(id)
    }

    /// Remove a node and its whole subtree.
    ///
    /// Returns the former parent and the node's former index. The root
    /// cannot be removed.
    #[tracing::instrument(skip(self), target = "canopy_map", level = "trace")]
    pub fn remove(&mut self, id: NodeId) -> MapResult<(NodeId, usize)> {
        let parent = self.node(id)?.parent.ok_or(MapError::RootRemoval)?;
        let descendants = self.descendants(id)?;
        tracing::trace!(target: "canopy_map", ?id, descendant_count = descendants.len(), "removing subtree");

        let siblings = &mut self.node_mut(parent)?.children;
        let index = siblings
            .iter()
            .position(|&child| child == id)
            .ok_or(MapError::InvalidNodeId)?;
        siblings.remove(index);

        for descendant in descendants {
            self.nodes.remove(descendant);
        }
        self.nodes.remove(id);
        Ok((parent, index))
    }

    /// Move a node below `new_parent` at `index`.
    ///
    /// `index` refers to the new parent's child list after the node has been
    /// detached. Returns the former parent and index.
    #[tracing::instrument(skip(self), target = "canopy_map", level = "trace")]
    pub fn move_node(
        &mut self,
        id: NodeId,
        new_parent: NodeId,
        index: usize,
    ) -> MapResult<(NodeId, usize)> {
        let old_parent = self.node(id)?.parent.ok_or(MapError::RootRemoval)?;
        self.node(new_parent)?;
        if self.is_ancestor_of(id, new_parent) {
            return Err(MapError::CircularParentage);
        }

        let old_index = self
            .node(old_parent)?
            .children
            .iter()
            .position(|&child| child == id)
            .ok_or(MapError::InvalidNodeId)?;
        let len = self.node(new_parent)?.children.len() - usize::from(old_parent == new_parent);
        if index > len {
            return Err(MapError::IndexOutOfBounds { index, len });
        }

        self.node_mut(old_parent)?.children.remove(old_index);
        self.node_mut(new_parent)?.children.insert(index, id);
        self.node_mut(id)?.parent = Some(new_parent);
        Ok((old_parent, old_index))
    }

    /// Check if `ancestor` is `id` or one of its ancestors.
    fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == ancestor {
                return true;
            }
            current = self.nodes.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    /// All descendants of the node, children before their parents.
    pub fn descendants(&self, id: NodeId) -> MapResult<Vec<NodeId>> {
        let mut result = Vec::new();
        let mut stack = vec![(id, false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                if current != id {
                    result.push(current);
                }
                continue;
            }
            stack.push((current, true));
            for &child in self.node(current)?.children.iter().rev() {
                stack.push((child, false));
            }
        }
        Ok(result)
    }

    /// The overlay installed in the named slot of the node.
    pub fn overlay(&self, id: NodeId, slot: &str) -> Option<&IconOverlay> {
        self.nodes.get(id)?.overlays.get(slot)
    }

    /// Number of refresh requests the node has received.
    pub fn refresh_count(&self, id: NodeId) -> usize {
        self.nodes.get(id).map_or(0, |d| d.refreshes)
    }

    /// Number of refresh requests across the whole map.
    pub fn total_refreshes(&self) -> usize {
        self.nodes.values().map(|d| d.refreshes).sum()
    }
}

impl Default for MindMap {
    fn default() -> Self {
        Self::new("")
    }
}

impl IconTree for MindMap {
    type NodeId = NodeId;

    fn own_icons(&self, node: NodeId) -> &IconSet {
        self.nodes.get(node).map_or(&NO_ICONS, |d| &d.icons)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|d| d.parent)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map_or(&[], |d| d.children.as_slice())
    }

    fn is_folded(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(|d| d.folded)
    }

    fn node_label(&self, node: NodeId) -> String {
        match self.nodes.get(node) {
            Some(d) if !d.text.is_empty() => d.text.clone(),
            _ => format!("{node:?}"),
        }
    }
}

impl IconTreeMut for MindMap {
    fn set_overlay(&mut self, node: NodeId, slot: &str, overlay: IconOverlay) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.overlays.insert(slot.to_string(), overlay);
        }
    }

    fn remove_overlay(&mut self, node: NodeId, slot: &str) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.overlays.remove(slot);
        }
    }

    fn refresh(&mut self, node: NodeId) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.refreshes += 1;
        }
    }
}
