//! Editing front-end that keeps inherited icons in sync.
//!
//! [`MapController`] owns a [`MindMap`] and an [`InheritedIcons`] engine.
//! Every edit is applied to the map first and then reported to the engine
//! as the matching tree event, the way an editor's undoable actions fire
//! change notifications after the model has been updated.

use canopy_core::{
    Icon, IconSet, IconTreeDebug, InheritedIcons, InheritedIconsConfig, NodeProperty,
};

use crate::error::{MapError, MapResult};
use crate::map::{MindMap, NodeId};
use crate::outline::Outline;

/// A mind map wired to an inherited-icons engine.
#[derive(Debug)]
pub struct MapController {
    map: MindMap,
    engine: InheritedIcons<NodeId>,
}

impl MapController {
    /// Wrap `map`. No scope is active yet.
    pub fn new(map: MindMap, config: InheritedIconsConfig) -> Self {
        Self {
            map,
            engine: InheritedIcons::new(config),
        }
    }

    /// Build a map from `outline`, restore its activation markers and run
    /// the load pass.
    pub fn from_outline(outline: &Outline, config: InheritedIconsConfig) -> MapResult<Self> {
        let (map, marked) = MindMap::from_outline(outline)?;
        let mut controller = Self::new(map, config);
        let root = controller.map.root();
        controller.complete_load(root, &marked);
        Ok(controller)
    }

    /// The map.
    pub fn map(&self) -> &MindMap {
        &self.map
    }

    /// The engine.
    pub fn engine(&self) -> &InheritedIcons<NodeId> {
        &self.engine
    }

    /// Mutable access to the engine, e.g. to reset its counters.
    pub fn engine_mut(&mut self) -> &mut InheritedIcons<NodeId> {
        &mut self.engine
    }

    /// Split into the map and the engine.
    pub fn into_parts(self) -> (MindMap, InheritedIcons<NodeId>) {
        (self.map, self.engine)
    }

    /// The cached inherited set of `node`.
    pub fn inherited(&self, node: NodeId) -> Option<&IconSet> {
        self.engine.aggregated(node)
    }

    fn ensure(&self, node: NodeId) -> MapResult<()> {
        if self.map.contains(node) {
            Ok(())
        } else {
            Err(MapError::InvalidNodeId)
        }
    }

    /// Switch the feature on for `node` and its subtree.
    pub fn activate(&mut self, node: NodeId) -> MapResult<()> {
        self.ensure(node)?;
        self.engine.on_activated(&mut self.map, node);
        Ok(())
    }

    /// Switch the feature off for `node`.
    pub fn deactivate(&mut self, node: NodeId) -> MapResult<()> {
        self.ensure(node)?;
        self.engine.on_deactivated(&mut self.map, node);
        Ok(())
    }

    /// Append a new node below `parent`.
    pub fn add_child(&mut self, parent: NodeId, text: impl Into<String>) -> MapResult<NodeId> {
        let index = self.map.children_of(parent)?.len();
        self.insert_child(parent, index, text)
    }

    /// Insert a new node below `parent` at `index`.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        text: impl Into<String>,
    ) -> MapResult<NodeId> {
        let child = self.map.insert_child(parent, index, text)?;
        self.engine
            .on_child_inserted(&mut self.map, parent, child, index);
        Ok(child)
    }

    /// Remove `node` and its subtree.
    pub fn remove(&mut self, node: NodeId) -> MapResult<()> {
        let (parent, index) = self.map.remove(node)?;
        self.engine
            .on_child_removed(&mut self.map, parent, node, index);
        Ok(())
    }

    /// Move `node` below `new_parent` at `index`.
    pub fn move_node(&mut self, node: NodeId, new_parent: NodeId, index: usize) -> MapResult<()> {
        let (old_parent, old_index) = self.map.move_node(node, new_parent, index)?;
        self.engine
            .on_child_moved(&mut self.map, old_parent, old_index, new_parent, node, index);
        Ok(())
    }

    /// Attach an icon to `node`.
    pub fn add_icon(&mut self, node: NodeId, icon: impl Into<Icon>) -> MapResult<()> {
        if self.map.add_icon(node, icon.into())? {
            self.engine.on_own_icons_changed(&mut self.map, node);
        }
        Ok(())
    }

    /// Detach an icon from `node`.
    pub fn remove_icon(&mut self, node: NodeId, icon: impl Into<Icon>) -> MapResult<()> {
        if self.map.remove_icon(node, &icon.into())? {
            self.engine.on_own_icons_changed(&mut self.map, node);
        }
        Ok(())
    }

    /// Replace all icons of `node`.
    pub fn set_icons(&mut self, node: NodeId, icons: IconSet) -> MapResult<()> {
        if self.map.set_icons(node, icons)? {
            self.engine.on_own_icons_changed(&mut self.map, node);
        }
        Ok(())
    }

    /// Replace the text of `node`.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> MapResult<()> {
        self.map.set_text(node, text)?;
        self.engine
            .on_node_changed(&mut self.map, node, NodeProperty::Other);
        Ok(())
    }

    /// Fold or unfold `node`.
    pub fn set_folded(&mut self, node: NodeId, folded: bool) -> MapResult<()> {
        if self.map.set_folded(node, folded)? {
            self.engine
                .on_node_changed(&mut self.map, node, NodeProperty::Folded);
        }
        Ok(())
    }

    /// Paste or import `outline` below `parent` at `index`.
    ///
    /// The nodes are created without per-node events. Activation markers in
    /// the outline are restored, then the loaded subtree is computed once.
    pub fn load_outline(
        &mut self,
        parent: NodeId,
        index: usize,
        outline: &Outline,
    ) -> MapResult<NodeId> {
        let (top, marked) = self.map.insert_outline(parent, index, outline)?;
        self.complete_load(top, &marked);
        Ok(top)
    }

    fn complete_load(&mut self, top: NodeId, marked: &[NodeId]) {
        for &node in marked {
            self.engine.restore_activation(node);
        }
        if self.engine.is_active(&self.map, top) {
            self.engine.on_load_completed(&mut self.map, top);
            return;
        }
        // `marked` is in pre-order, so outer markers come first.
        for &node in marked {
            let nested = self
                .map
                .parent_of(node)
                .ok()
                .flatten()
                .is_some_and(|parent| self.engine.is_active(&self.map, parent));
            if !nested {
                self.engine.on_load_completed(&mut self.map, node);
            }
        }
    }

    /// Export the subtree of `node`, marking activation roots.
    pub fn to_outline(&self, node: NodeId) -> MapResult<Outline> {
        let roots: Vec<NodeId> = self.engine.activation_roots().collect();
        self.map.to_outline(node, &|id| roots.contains(&id))
    }

    /// Render the whole map with own and inherited icons.
    pub fn debug_tree(&self) -> String {
        IconTreeDebug::new().format_subtree(&self.map, self.engine.cache(), self.map.root())
    }
}

impl Default for MapController {
    fn default() -> Self {
        Self::new(MindMap::default(), InheritedIconsConfig::default())
    }
}
