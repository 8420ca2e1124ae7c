//! Minimal host tree used by unit tests.

use std::collections::HashMap;

use crate::icon::{Icon, IconSet};
use crate::overlay::IconOverlay;
use crate::tree::{IconTree, IconTreeMut};

#[derive(Default)]
struct TestNode {
    label: String,
    parent: Option<usize>,
    children: Vec<usize>,
    icons: IconSet,
    folded: bool,
    overlays: HashMap<String, IconOverlay>,
    refreshes: usize,
}

/// Vec-backed tree keyed by index. Node 0 is the root.
pub(crate) struct TestTree {
    nodes: Vec<TestNode>,
}

impl TestTree {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![TestNode {
                label: "root".to_string(),
                ..Default::default()
            }],
        }
    }

    pub(crate) fn root(&self) -> usize {
        0
    }

    pub(crate) fn add_child(&mut self, parent: usize, label: &str) -> usize {
        self.add_leaf(parent, label, &[])
    }

    pub(crate) fn add_leaf(&mut self, parent: usize, label: &str, icons: &[&str]) -> usize {
        let id = self.nodes.len();
        self.nodes.push(TestNode {
            label: label.to_string(),
            parent: Some(parent),
            icons: icons.iter().copied().map(Icon::new).collect(),
            ..Default::default()
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub(crate) fn set_icons(&mut self, node: usize, icons: &[&str]) {
        self.nodes[node].icons = icons.iter().copied().map(Icon::new).collect();
    }

    pub(crate) fn set_folded(&mut self, node: usize, folded: bool) {
        self.nodes[node].folded = folded;
    }

    /// Unlink `node` from its parent. Returns the old parent and index.
    pub(crate) fn detach(&mut self, node: usize) -> (usize, usize) {
        let parent = self.nodes[node].parent.take().unwrap();
        let index = self.nodes[parent]
            .children
            .iter()
            .position(|&c| c == node)
            .unwrap();
        self.nodes[parent].children.remove(index);
        (parent, index)
    }

    pub(crate) fn attach(&mut self, node: usize, parent: usize, index: usize) {
        self.nodes[node].parent = Some(parent);
        self.nodes[parent].children.insert(index, node);
    }

    /// Make `child` also appear under `parent` without rewiring its parent.
    pub(crate) fn link_unchecked(&mut self, parent: usize, child: usize) {
        self.nodes[parent].children.push(child);
    }

    pub(crate) fn overlay(&self, node: usize, slot: &str) -> Option<&IconOverlay> {
        self.nodes[node].overlays.get(slot)
    }

    pub(crate) fn overlay_icons(&self, node: usize) -> Option<IconSet> {
        self.overlay(node, crate::config::DEFAULT_OVERLAY_SLOT)
            .map(IconOverlay::to_icon_set)
    }

    pub(crate) fn refresh_count(&self, node: usize) -> usize {
        self.nodes[node].refreshes
    }

    pub(crate) fn total_refreshes(&self) -> usize {
        self.nodes.iter().map(|n| n.refreshes).sum()
    }
}

impl IconTree for TestTree {
    type NodeId = usize;

    fn own_icons(&self, node: usize) -> &IconSet {
        &self.nodes[node].icons
    }

    fn parent(&self, node: usize) -> Option<usize> {
        self.nodes[node].parent
    }

    fn children(&self, node: usize) -> &[usize] {
        &self.nodes[node].children
    }

    fn is_folded(&self, node: usize) -> bool {
        self.nodes[node].folded
    }

    fn node_label(&self, node: usize) -> String {
        self.nodes[node].label.clone()
    }
}

impl IconTreeMut for TestTree {
    fn set_overlay(&mut self, node: usize, slot: &str, overlay: IconOverlay) {
        self.nodes[node].overlays.insert(slot.to_string(), overlay);
    }

    fn remove_overlay(&mut self, node: usize, slot: &str) {
        self.nodes[node].overlays.remove(slot);
    }

    fn refresh(&mut self, node: usize) {
        self.nodes[node].refreshes += 1;
    }
}
