//! Inherited icon sets for outline and mind-map trees.
//!
//! For every node of a host-owned tree, this crate maintains the set of icons
//! attached anywhere below the node, minus the icons attached to the node
//! itself, and keeps it consistent as the tree is edited. The set is shown as
//! a small overlay badge on the node, so a collapsed branch still tells the
//! user which icons it hides.
//!
//! - **Icon model**: [`Icon`] and [`IconSet`]
//! - **Host interface**: [`IconTree`] and [`IconTreeMut`]
//! - **Cache store**: [`IconCache`]
//! - **Aggregation**: [`aggregate`] plus the traversal primitives on
//!   [`InheritedIcons`]
//! - **Propagation**: the `on_*` event handlers of [`InheritedIcons`]
//! - **Visual sync**: [`OverlayStyle`], [`IconOverlay`]
//! - **Lifecycle**: activation, deactivation and document loads
//!
//! # Example
//!
//! ```ignore
//! use canopy_core::{InheritedIcons, InheritedIconsConfig};
//!
//! let mut engine = InheritedIcons::new(InheritedIconsConfig::default());
//!
//! // Switch the feature on for the whole document.
//! engine.on_activated(&mut tree, tree.root());
//!
//! // Forward tree edits as they happen.
//! let leaf = tree.add_child(parent, "leaf");
//! engine.on_child_inserted(&mut tree, parent, leaf, 0);
//! tree.add_icon(leaf, Icon::new("idea"));
//! engine.on_own_icons_changed(&mut tree, leaf);
//! ```
//!
//! The engine is single-threaded and synchronous: each call recomputes what
//! the event affects and returns. Use [`SharedInheritedIcons`] when events
//! may come from several threads.

pub mod aggregate;
mod cache;
pub mod config;
mod engine;
mod error;
pub mod icon;
mod lifecycle;
pub mod logging;
pub mod overlay;
pub mod propagate;
mod shared;
pub mod tree;

#[cfg(test)]
mod testing;

pub use aggregate::aggregate;
pub use cache::IconCache;
pub use config::{DEFAULT_OVERLAY_SLOT, InheritedIconsConfig, PropagationPolicy};
pub use engine::{InheritedIcons, PropagationStats};
pub use error::{Error, Result};
pub use icon::{Icon, IconSet};
pub use logging::{IconTreeDebug, PerfSpan, TreeFormatOptions, TreeStyle};
pub use overlay::{IconOverlay, OverlayAction, OverlayStyle, ScaledIcon, SyncMode};
pub use propagate::NodeProperty;
pub use shared::SharedInheritedIcons;
pub use tree::{ChildTraversal, IconTree, IconTreeMut};
