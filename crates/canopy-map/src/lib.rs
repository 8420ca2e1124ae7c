//! Mind map document model for `canopy-core`.
//!
//! This crate provides a small editable mind map that implements the
//! [`canopy_core::IconTree`] host interface, plus a controller that forwards
//! every edit to an [`canopy_core::InheritedIcons`] engine.
//!
//! - [`MindMap`] - arena-backed node tree with icons, folding and overlays
//! - [`MapController`] - applies edits and reports them as tree events
//! - [`Outline`] - JSON documents that can be loaded into a map
//!
//! # Example
//!
//! ```
//! use canopy_map::MapController;
//!
//! let mut controller = MapController::default();
//! let root = controller.map().root();
//! let topic = controller.add_child(root, "Topic").unwrap();
//! let detail = controller.add_child(topic, "Detail").unwrap();
//! controller.activate(root).unwrap();
//!
//! controller.add_icon(detail, "idea").unwrap();
//! assert_eq!(controller.inherited(root).unwrap().to_string(), "{idea}");
//! ```

mod controller;
mod error;
mod map;
mod outline;

pub use controller::MapController;
pub use error::{MapError, MapResult};
pub use map::{MindMap, NodeId};
pub use outline::Outline;
