//! JSON outline documents.
//!
//! An outline is a nested node description:
//!
//! ```json
//! {
//!   "text": "Project",
//!   "inherited_icons": true,
//!   "children": [
//!     { "text": "Risks", "icons": ["flag-red"] },
//!     { "text": "Ideas", "folded": true, "children": [{ "text": "x", "icons": ["idea"] }] }
//!   ]
//! }
//! ```
//!
//! `inherited_icons` marks a node on which the feature was switched on when
//! the document was saved. All fields are optional.

use std::path::Path;

use canopy_core::{Icon, IconSet};
use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};
use crate::map::{MindMap, NodeId};

/// One node of an outline document, with its subtree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Outline {
    /// Node text.
    pub text: String,
    /// Icons attached to the node.
    #[serde(skip_serializing_if = "IconSet::is_empty")]
    pub icons: IconSet,
    /// Whether the node is folded.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub folded: bool,
    /// Whether the node is an activation root.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub inherited_icons: bool,
    /// Child nodes, in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Outline>,
}

impl Outline {
    /// Create a node with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Add icons by name.
    pub fn with_icons<I, S>(mut self, icons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.icons.extend(icons.into_iter().map(Icon::new));
        self
    }

    /// Set the folded flag.
    pub fn folded(mut self, folded: bool) -> Self {
        self.folded = folded;
        self
    }

    /// Mark the node as an activation root.
    pub fn with_inherited_icons(mut self) -> Self {
        self.inherited_icons = true;
        self
    }

    /// Append a child.
    pub fn with_child(mut self, child: Outline) -> Self {
        self.children.push(child);
        self
    }

    /// Parse an outline from JSON.
    pub fn from_json_str(text: &str) -> MapResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read an outline from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> MapResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(target: "canopy_map", path = %path.display(), "loading outline");
        Self::from_json_str(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> MapResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of nodes in this outline, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Outline::node_count).sum::<usize>()
    }
}

impl MindMap {
    /// Build a map whose root is the top node of `outline`.
    ///
    /// Returns the map and the nodes carrying the activation marker, in
    /// pre-order.
    pub fn from_outline(outline: &Outline) -> MapResult<(Self, Vec<NodeId>)> {
        let mut map = MindMap::new(outline.text.clone());
        let root = map.root();
        let mut marked = Vec::new();
        map.fill_node(root, outline, &mut marked)?;
        Ok((map, marked))
    }

    /// Insert `outline` below `parent` at `index`.
    ///
    /// Returns the new subtree's top node and the marked nodes, in pre-order.
    pub fn insert_outline(
        &mut self,
        parent: NodeId,
        index: usize,
        outline: &Outline,
    ) -> MapResult<(NodeId, Vec<NodeId>)> {
        let top = self.insert_child(parent, index, outline.text.clone())?;
        let mut marked = Vec::new();
        self.fill_node(top, outline, &mut marked)?;
        tracing::debug!(target: "canopy_map", ?top, nodes = outline.node_count(), "outline inserted");
        Ok((top, marked))
    }

    fn fill_node(
        &mut self,
        id: NodeId,
        outline: &Outline,
        marked: &mut Vec<NodeId>,
    ) -> MapResult<()> {
        if outline.inherited_icons {
            marked.push(id);
        }
        self.set_icons(id, outline.icons.clone())?;
        self.set_folded(id, outline.folded)?;
        for child in &outline.children {
            let child_id = self.add_child(id, child.text.clone())?;
            self.fill_node(child_id, child, marked)?;
        }
        Ok(())
    }

    /// Export the subtree of `id` as an outline.
    ///
    /// `is_marked` decides which nodes get the activation marker.
    pub fn to_outline(&self, id: NodeId, is_marked: &dyn Fn(NodeId) -> bool) -> MapResult<Outline> {
        let mut outline = Outline::new(self.text(id)?);
        outline.icons = self.icons(id)?.clone();
        outline.folded = self.folded(id)?;
        outline.inherited_icons = is_marked(id);
        for &child in self.children_of(id)? {
            outline.children.push(self.to_outline(child, is_marked)?);
        }
        Ok(outline)
    }
}
